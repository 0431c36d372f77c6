//! Top-level wiring: owns the heap, name table, function table, and
//! configuration for one run, and drives a parsed [`Program`] to
//! completion.

use crate::ast::Program;
use crate::config::Config;
use crate::dump::Dump;
use crate::env::{FuncTable, NameTable};
use crate::error::Result;
use crate::eval::EvalCtx;
use crate::exec::exec_stmt_list;
use crate::heap::Heap;
use crate::roots::name_table_roots;

/// One interpreter run: a heap of the configured capacity, an initially
/// empty name table and function table, and the configuration that governs
/// scoping and `intp` semantics for this run.
pub struct Interpreter {
    heap: Heap,
    names: NameTable,
    funcs: FuncTable,
    config: Config,
}

impl Interpreter {
    pub fn new(config: Config) -> Self {
        Interpreter {
            heap: Heap::new(config.heap_capacity),
            names: NameTable::new(),
            funcs: FuncTable::new(),
            config,
        }
    }

    /// Runs `program`'s top-level statements to completion. On success, the
    /// interpreter's name table and function table hold the program's final
    /// state, ready for [`Interpreter::dump`].
    pub fn run(&mut self, program: &Program) -> Result<()> {
        let mut ctx = EvalCtx::new(&mut self.heap, &mut self.names, &mut self.funcs, &self.config);
        exec_stmt_list(&mut ctx, &program.0)
    }

    /// Renders the final symbol-table and function-table dump.
    pub fn dump(&self) -> Dump<'_> {
        Dump::new(&self.names, &self.funcs, &self.heap)
    }

    /// Runs an explicit collection rooted at the current name table,
    /// independent of whether a later allocation would have triggered one
    /// on its own.
    pub fn collect(&mut self) -> Result<usize> {
        let roots = name_table_roots(&self.names, None);
        self.heap.collect(&roots)
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn names(&self) -> &NameTable {
        &self.names
    }

    pub fn funcs(&self) -> &FuncTable {
        &self.funcs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, Stmt, StmtList};

    #[test]
    fn running_an_assignment_binds_the_name() {
        let mut interp = Interpreter::new(Config::new(16));
        let program = Program(StmtList::new(vec![Stmt::Assign {
            name: "x".to_string(),
            rhs: Expr::Number(7),
        }]));
        interp.run(&program).unwrap();
        assert_eq!(interp.names().get("x").unwrap().as_number(), Some(7));
    }
}
