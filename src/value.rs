//! The value model: [`Number`], [`List`], and [`Sequence`], anchored in the
//! cons-cell heap rather than duplicated as native Rust collections.

use crate::error::Result;
use crate::heap::{CellIndex, Heap, Slot};

/// An immutable integer. Never itself heap-allocated: it only ever lives
/// inline inside a cell's `car` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Number(pub i64);

/// A user-facing list value. Its identity is a single head cell, or no cell
/// at all for the empty list. The alternative — a sentinel cell with both
/// slots nil — is not used here because it would force an allocation for
/// every `[]` literal even though nothing is ever stored in it.
///
/// A nested empty list (an element that is itself `[]`) is represented
/// without a cell of its own too: the enclosing cell's `car` slot is
/// [`Slot::Empty`], which [`slot_to_value`] reads back as an empty `List`
/// rather than as a Number. That's what makes [`Slot`]'s three-way split
/// (`Empty` / `Number` / `Cell`) unambiguous in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct List {
    head: Option<CellIndex>,
}

impl List {
    pub fn empty() -> Self {
        List { head: None }
    }

    pub fn from_head(head: CellIndex) -> Self {
        List { head: Some(head) }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn head(&self) -> Option<CellIndex> {
        self.head
    }

    /// Every cell transitively reachable from this list's head, for use as
    /// GC roots or for counting cells in tests.
    pub fn cells(&self, heap: &Heap) -> std::collections::HashSet<CellIndex> {
        match self.head {
            Some(h) => heap.reachable_from(&[h]),
            None => std::collections::HashSet::new(),
        }
    }
}

/// A fully-evaluated MiniLang value: the result of evaluating any
/// expression. Procedures are looked up directly in the
/// [`crate::env::FuncTable`] by name and never flow through this type —
/// the grammar has no expression form that produces a procedure value, so
/// `NameTable` entries are always `Number` or `List` in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Number(i64),
    List(List),
}

impl Value {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<List> {
        match self {
            Value::List(l) => Some(*l),
            Value::Number(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::List(_) => "List",
        }
    }
}

/// Converts an already-evaluated value into the `Slot` it occupies when
/// placed into a cell's `car`.
pub fn value_to_slot(v: Value) -> Slot {
    match v {
        Value::Number(n) => Slot::Number(n),
        Value::List(l) => match l.head() {
            Some(idx) => Slot::Cell(idx),
            None => Slot::Empty,
        },
    }
}

/// The inverse of [`value_to_slot`]: reads a `car` slot back as a value.
pub fn slot_to_value(s: Slot) -> Value {
    match s {
        Slot::Empty => Value::List(List::empty()),
        Slot::Number(n) => Value::Number(n),
        Slot::Cell(idx) => Value::List(List::from_head(idx)),
    }
}

/// Binds a linear run of already-evaluated elements to a chain of cells.
/// Every element costs exactly one `cons`.
pub struct Sequence;

impl Sequence {
    /// Builds the cell chain for a list literal's elements, left-to-right.
    /// `extra_roots` must contain every cell that must survive a collection
    /// triggered mid-construction but isn't yet reachable from the name
    /// table.
    pub fn materialize(heap: &mut Heap, elements: &[Value], extra_roots: &[CellIndex]) -> Result<List> {
        let mut tail: Option<CellIndex> = None;
        let mut in_flight: Vec<CellIndex> = Vec::new();

        for elem in elements.iter().rev() {
            let mut roots: Vec<CellIndex> = extra_roots.to_vec();
            roots.extend(in_flight.iter().copied());
            if let Some(t) = tail {
                roots.push(t);
            }

            let idx = heap.alloc(&roots)?;
            heap.set(idx, value_to_slot(*elem), tail);
            in_flight.push(idx);
            tail = Some(idx);
        }

        Ok(match tail {
            Some(head) => List::from_head(head),
            None => List::empty(),
        })
    }
}
