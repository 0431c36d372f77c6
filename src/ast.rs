//! AST node shapes produced by the parser: two plain recursive enums,
//! `Expr` and `Stmt`, rather than a class-per-node hierarchy or a
//! bump-allocated, index-based arena — idiomatic and sufficiently fast for
//! a grammar this small.

/// Any expression: arithmetic, an identifier, a list literal, `||`
/// concatenation, or a call. An `expr` and a `list` are folded into one
/// enum because every evaluation context (`assign`'s rhs, a call argument,
/// an operand) accepts either.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A `NUMBER` literal.
    Number(i64),
    /// An `IDENT` reference.
    Ident(String),
    Plus(Box<Expr>, Box<Expr>),
    Minus(Box<Expr>, Box<Expr>),
    Times(Box<Expr>, Box<Expr>),
    /// `[ e1, e2, ... ]` or `[]`.
    ListLit(Vec<Expr>),
    /// `lhs || rhs`.
    Concat(Box<Expr>, Box<Expr>),
    Call(FunCall),
}

/// `name(arg1, ..., argn)`. Dispatch between a built-in and a user
/// procedure happens at evaluation time, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct FunCall {
    pub name: String,
    pub args: Vec<Expr>,
}

/// A single statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `IDENT ':=' element`.
    Assign { name: String, rhs: Expr },
    /// `'if' expr 'then' stmt_list 'else' stmt_list 'fi'`.
    If {
        cond: Expr,
        then_body: StmtList,
        else_body: StmtList,
    },
    /// `'while' expr 'do' stmt_list 'od'`.
    While { cond: Expr, body: StmtList },
    /// `'define' IDENT 'proc' '(' param_list ')' stmt_list 'end'`.
    Define { name: String, proc: Proc },
}

/// A procedure's formal parameters and body, as written at its `define`
/// site. [`crate::env::Procedure`] is the runtime counterpart installed
/// into the [`crate::env::FuncTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct Proc {
    pub params: Vec<String>,
    pub body: StmtList,
}

/// An ordered sequence of statements, executed top to bottom.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StmtList(pub Vec<Stmt>);

impl StmtList {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        StmtList(stmts)
    }
}

/// A whole parsed program: just its top-level statement list.
#[derive(Debug, Clone, PartialEq)]
pub struct Program(pub StmtList);
