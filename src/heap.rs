//! The cons-cell heap: a fixed-capacity arena of cells with one allocation
//! primitive and one explicit collection entry point.
//!
//! Cells are addressed by index into a `Vec`, never by raw pointer, which
//! keeps the whole heap safe-Rust: no unsafe aliasing to reason about, at
//! the cost of a `Vec` lookup per access. `car` holds either nothing, an
//! inline [`Number`][crate::value::Number], or another cell's index; `cdr`
//! holds either nothing or another cell's index, never a bare number.

use log::{debug, trace};
use std::collections::HashSet;

use crate::error::{MiniLangError, Result};

/// A handle to a cell slot in the heap. Never dereferenced directly;
/// always resolved through [`Heap::car`]/[`Heap::cdr`] or similar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellIndex(u32);

impl CellIndex {
    fn new(idx: usize) -> Self {
        CellIndex(idx as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CellIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The contents of a cell's `car` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Neither a number nor a cell reference (an empty cell, or a `cdr`
    /// pointing at nothing, i.e. the end of a list).
    Empty,
    /// An inline integer. Never independently heap-allocated or swept.
    Number(i64),
    /// A reference to another cell.
    Cell(CellIndex),
}

impl Slot {
    pub fn as_cell(self) -> Option<CellIndex> {
        match self {
            Slot::Cell(idx) => Some(idx),
            _ => None,
        }
    }

    pub fn as_number(self) -> Option<i64> {
        match self {
            Slot::Number(n) => Some(n),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Cell {
    car: Slot,
    cdr: Option<CellIndex>,
    allocated: bool,
    mark: bool,
}

impl Cell {
    fn empty() -> Self {
        Cell {
            car: Slot::Empty,
            cdr: None,
            allocated: false,
            mark: false,
        }
    }
}

/// A fixed-capacity pool of cons cells with a precise mark-and-sweep
/// collector.
#[derive(Debug)]
pub struct Heap {
    cells: Vec<Cell>,
    capacity: usize,
    collecting: bool,
}

impl Heap {
    /// Builds an empty heap able to hold at most `capacity` live cells.
    pub fn new(capacity: usize) -> Self {
        Heap {
            cells: (0..capacity).map(|_| Cell::empty()).collect(),
            capacity,
            collecting: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn count_allocated(&self) -> usize {
        self.cells.iter().filter(|c| c.allocated).count()
    }

    pub fn has_space(&self) -> bool {
        self.count_allocated() < self.capacity
    }

    /// Returns a freshly cleared, allocated cell's index. Triggers a
    /// collection using `roots` if the heap is full. `roots` must include
    /// every in-flight cell from the current operation, not just the name
    /// table's bindings, or a collection mid-construction could free a cell
    /// before it's attached anywhere.
    pub fn alloc(&mut self, roots: &[CellIndex]) -> Result<CellIndex> {
        if let Some(idx) = self.find_available() {
            trace!("alloc: reused free slot {idx}");
            return Ok(idx);
        }

        debug!(
            "alloc: heap full ({}/{}), collecting",
            self.count_allocated(),
            self.capacity
        );
        self.collect(roots)?;

        self.find_available().ok_or(MiniLangError::OutOfMemory)
    }

    fn find_available(&mut self) -> Option<CellIndex> {
        // Deterministic first-fit scan in index order: what gets allocated
        // and freed must not depend on scan order for a fixed root set.
        for (i, cell) in self.cells.iter_mut().enumerate() {
            if !cell.allocated {
                cell.car = Slot::Empty;
                cell.cdr = None;
                cell.mark = false;
                cell.allocated = true;
                return Some(CellIndex::new(i));
            }
        }
        None
    }

    pub fn car(&self, idx: CellIndex) -> Slot {
        self.cells[idx.index()].car
    }

    pub fn cdr(&self, idx: CellIndex) -> Option<CellIndex> {
        self.cells[idx.index()].cdr
    }

    /// Writes both slots of an already-allocated cell. Used right after
    /// `alloc` returns, by `cons` and by sequence materialization.
    pub fn set(&mut self, idx: CellIndex, car: Slot, cdr: Option<CellIndex>) {
        let cell = &mut self.cells[idx.index()];
        debug_assert!(cell.allocated, "set on a non-allocated cell {idx}");
        cell.car = car;
        cell.cdr = cdr;
    }

    /// Runs a full mark-and-sweep collection rooted at `roots`. Returns the
    /// number of cells freed. Fails only on reentrant invocation.
    pub fn collect(&mut self, roots: &[CellIndex]) -> Result<usize> {
        if self.collecting {
            return Err(MiniLangError::ReentrantCollection);
        }
        self.collecting = true;
        let before = self.count_allocated();

        #[cfg(feature = "pedantic-debug-assertions")]
        for &root in roots {
            debug_assert!(
                self.cells[root.index()].allocated,
                "root {root} passed to collect() is not an allocated cell"
            );
        }

        for cell in &mut self.cells {
            cell.mark = false;
        }

        let mut worklist: Vec<CellIndex> = roots.to_vec();
        while let Some(idx) = worklist.pop() {
            let cell = &mut self.cells[idx.index()];
            if cell.mark {
                continue;
            }
            cell.mark = true;
            if let Slot::Cell(child) = cell.car {
                worklist.push(child);
            }
            if let Some(child) = cell.cdr {
                worklist.push(child);
            }
        }

        let mut freed = 0usize;
        for cell in &mut self.cells {
            if cell.allocated && !cell.mark {
                cell.allocated = false;
                cell.car = Slot::Empty;
                cell.cdr = None;
                freed += 1;
            }
            cell.mark = false;
        }

        self.collecting = false;
        let after = self.count_allocated();
        debug!("collect: freed {freed} cells ({before} -> {after} allocated)");
        Ok(freed)
    }

    /// Computes the set of cells transitively reachable from `roots`,
    /// without mutating the heap. Used by tests to check the
    /// precise-accounting invariant without relying on `collect`'s
    /// side effects.
    pub fn reachable_from(&self, roots: &[CellIndex]) -> HashSet<CellIndex> {
        let mut seen = HashSet::new();
        let mut worklist: Vec<CellIndex> = roots.to_vec();
        while let Some(idx) = worklist.pop() {
            if !seen.insert(idx) {
                continue;
            }
            let cell = &self.cells[idx.index()];
            if let Slot::Cell(child) = cell.car {
                worklist.push(child);
            }
            if let Some(child) = cell.cdr {
                worklist.push(child);
            }
        }
        seen
    }

    #[cfg(test)]
    pub(crate) fn is_allocated(&self, idx: CellIndex) -> bool {
        self.cells[idx.index()].allocated
    }

    #[cfg(test)]
    pub(crate) fn all_marks_clear(&self) -> bool {
        self.cells.iter().all(|c| !c.mark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alloc_cons(heap: &mut Heap, car: Slot, cdr: Option<CellIndex>, roots: &[CellIndex]) -> CellIndex {
        let idx = heap.alloc(roots).expect("alloc should succeed");
        heap.set(idx, car, cdr);
        idx
    }

    #[test]
    fn alloc_fails_when_full_and_nothing_reclaimable() {
        let mut heap = Heap::new(2);
        let a = alloc_cons(&mut heap, Slot::Number(1), None, &[]);
        let b = alloc_cons(&mut heap, Slot::Number(2), Some(a), &[a]);
        let err = heap.alloc(&[b]).unwrap_err();
        assert_eq!(err, MiniLangError::OutOfMemory);
    }

    #[test]
    fn collect_reclaims_unrooted_cells() {
        let mut heap = Heap::new(2);
        let a = alloc_cons(&mut heap, Slot::Number(1), None, &[]);
        let _b = alloc_cons(&mut heap, Slot::Number(2), Some(a), &[a]);
        // Nothing is rooted now.
        let freed = heap.collect(&[]).unwrap();
        assert_eq!(freed, 2);
        assert_eq!(heap.count_allocated(), 0);
    }

    #[test]
    fn collect_is_idempotent() {
        let mut heap = Heap::new(3);
        let a = alloc_cons(&mut heap, Slot::Number(1), None, &[]);
        heap.collect(&[a]).unwrap();
        let before = heap.count_allocated();
        let freed_second = heap.collect(&[a]).unwrap();
        assert_eq!(freed_second, 0);
        assert_eq!(heap.count_allocated(), before);
    }

    #[test]
    fn collect_resets_all_marks() {
        let mut heap = Heap::new(3);
        let a = alloc_cons(&mut heap, Slot::Number(1), None, &[]);
        heap.collect(&[a]).unwrap();
        assert!(heap.all_marks_clear());
    }

    #[test]
    fn cyclic_structure_is_not_freed_while_rooted() {
        let mut heap = Heap::new(2);
        let a = heap.alloc(&[]).unwrap();
        let b = heap.alloc(&[a]).unwrap();
        // Make a cycle: a.cdr = b, b.cdr = a.
        heap.set(a, Slot::Number(1), Some(b));
        heap.set(b, Slot::Number(2), Some(a));
        let freed = heap.collect(&[a]).unwrap();
        assert_eq!(freed, 0);
        assert!(heap.is_allocated(a));
        assert!(heap.is_allocated(b));
    }

    #[test]
    fn cyclic_structure_is_freed_once_unrooted() {
        let mut heap = Heap::new(2);
        let a = heap.alloc(&[]).unwrap();
        let b = heap.alloc(&[a]).unwrap();
        heap.set(a, Slot::Number(1), Some(b));
        heap.set(b, Slot::Number(2), Some(a));
        let freed = heap.collect(&[]).unwrap();
        assert_eq!(freed, 2);
    }

    #[test]
    fn reentrant_collect_is_rejected() {
        let mut heap = Heap::new(1);
        heap.collecting = true;
        let err = heap.collect(&[]).unwrap_err();
        assert_eq!(err, MiniLangError::ReentrantCollection);
    }
}
