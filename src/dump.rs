//! The final-state dump: a symbol-table listing and a function-table
//! summary, printed once evaluation finishes. A `Display` impl rather than
//! direct prints, so it can be captured by tests instead of only ever going
//! to stdout.

use std::fmt;

use crate::env::{FuncTable, NameTable};
use crate::heap::Heap;
use crate::value::{slot_to_value, List, Value};

/// A snapshot of a finished run's name table and function table, ready to
/// render. Borrows nothing: by the time a program is done, its `Heap`,
/// `NameTable`, and `FuncTable` are otherwise about to be dropped anyway.
pub struct Dump<'a> {
    names: &'a NameTable,
    funcs: &'a FuncTable,
    heap: &'a Heap,
}

impl<'a> Dump<'a> {
    pub fn new(names: &'a NameTable, funcs: &'a FuncTable, heap: &'a Heap) -> Self {
        Dump { names, funcs, heap }
    }
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dump of Symbol Table")?;
        let mut names: Vec<_> = self.names.iter().collect();
        names.sort_by_key(|(k, _)| k.to_string());
        for (name, value) in names {
            write!(f, "  {name} -> ")?;
            write_value(f, self.heap, *value)?;
            writeln!(f)?;
        }

        writeln!(f, "Function Table")?;
        let mut funcs: Vec<_> = self.funcs.iter().map(|(k, _)| k).collect();
        funcs.sort();
        for name in funcs {
            writeln!(f, "  {name}")?;
        }

        Ok(())
    }
}

/// Numbers print as themselves; Lists print as a bracketed, comma-separated
/// sequence of integers, with nested Lists rendered the same way,
/// recursively.
fn write_value(f: &mut fmt::Formatter<'_>, heap: &Heap, value: Value) -> fmt::Result {
    match value {
        Value::Number(n) => write!(f, "{n}"),
        Value::List(list) => write_list(f, heap, list),
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, heap: &Heap, list: List) -> fmt::Result {
    write!(f, "[")?;
    let mut cursor = list.head();
    let mut first = true;
    while let Some(idx) = cursor {
        if !first {
            write!(f, ", ")?;
        }
        first = false;
        write_value(f, heap, slot_to_value(heap.car(idx)))?;
        cursor = heap.cdr(idx);
    }
    write!(f, "]")
}
