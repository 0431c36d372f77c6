//! Root discovery & the GC driver glue.
//!
//! Roots are every value bound in the current name table, plus whatever the
//! currently-evaluating expression has registered as in-flight. The
//! in-flight half lives on [`crate::eval::EvalCtx`] itself, since it is
//! inherently tied to "the operation currently running"; this module only
//! knows how to read roots out of a [`NameTable`].

use crate::env::NameTable;
use crate::heap::CellIndex;
use crate::value::Value;

/// Every cell a name table's bindings point at directly. The mark phase
/// (see [`crate::heap::Heap::collect`]) walks from these transitively, so
/// only the immediate head of each bound list needs to be listed here.
///
/// `exclude` names the variable an `assign` statement is about to
/// overwrite, if any: its *current* value must not keep its old cells
/// alive while the new right-hand side is being evaluated, since assignment
/// is about to make them unreachable regardless of outcome. If the
/// right-hand side reads that same name, [`crate::eval::EvalCtx::remember`]
/// re-roots whatever it reads for the duration of the statement, so a
/// genuine self-reference like `x := x + 1` is unaffected.
pub fn name_table_roots(names: &NameTable, exclude: Option<&str>) -> Vec<CellIndex> {
    names
        .iter()
        .filter(|(name, _)| Some(*name) != exclude)
        .filter_map(|(_, v)| match v {
            Value::List(list) => list.head(),
            Value::Number(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::List;

    #[test]
    fn numbers_contribute_no_roots() {
        let mut names = NameTable::new();
        names.set("x", Value::Number(42));
        assert!(name_table_roots(&names, None).is_empty());
    }

    #[test]
    fn empty_lists_contribute_no_roots() {
        let mut names = NameTable::new();
        names.set("x", Value::List(List::empty()));
        assert!(name_table_roots(&names, None).is_empty());
    }

    #[test]
    fn excluded_name_does_not_contribute_a_root() {
        let mut heap = crate::heap::Heap::new(4);
        let idx = heap.alloc(&[]).unwrap();
        let mut names = NameTable::new();
        names.set("x", Value::List(List::from_head(idx)));
        assert!(name_table_roots(&names, Some("x")).is_empty());
        assert_eq!(name_table_roots(&names, Some("y")), vec![idx]);
    }
}
