//! The typed error hierarchy for the interpreter.
//!
//! Every fallible operation in this crate returns a [`MiniLangError`] instead
//! of panicking. Panics are reserved for this crate's own internal
//! invariants (a [`crate::heap::CellIndex`] produced by the heap itself
//! turning out to be out of bounds), never for anything a user program can
//! trigger.

use thiserror::Error;

/// A single line/column position in the source text, used by [`MiniLangError::Parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourcePos {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for SourcePos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Every error kind this interpreter can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MiniLangError {
    /// Malformed input, reported with the offending token and its position.
    #[error("parse error at {pos}: {message}")]
    Parse { message: String, pos: SourcePos },

    /// An identifier was used without ever being bound in the name table.
    #[error("unbound name: {0}")]
    UnboundName(String),

    /// A call named a procedure that isn't in the function table.
    #[error("unbound procedure: {0}")]
    UnboundProcedure(String),

    /// A call site passed the wrong number of arguments.
    #[error("arity mismatch calling {name}: expected {expected}, got {actual}")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// An operation received a value of the wrong kind (e.g. `car` on a Number).
    #[error("type error: {0}")]
    TypeError(String),

    /// `car`/`cdr` or similar was applied to the empty list.
    #[error("car/cdr applied to the empty list")]
    EmptyList,

    /// A procedure body finished without ever assigning to `return`.
    #[error("procedure {0} did not assign to `return`")]
    MissingReturn(String),

    /// The heap was exhausted and a collection reclaimed nothing.
    #[error("out of memory: heap exhausted and collection reclaimed no cells")]
    OutOfMemory,

    /// `collect` was invoked while a collection was already underway.
    #[error("garbage collector invoked reentrantly")]
    ReentrantCollection,
}

pub type Result<T> = std::result::Result<T, MiniLangError>;
