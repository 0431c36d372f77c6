//! Built-in list operations: `car`, `cdr`, `cons`, `nullp`, `listp`, `intp`,
//! and `||` concatenation.
//!
//! Dispatch is a fixed table keyed by identifier; see [`BuiltIn::lookup`].

use crate::ast::Expr;
use crate::config::IntpMode;
use crate::error::{MiniLangError, Result};
use crate::eval::{eval_expr, EvalCtx};
use crate::heap::CellIndex;
use crate::value::{slot_to_value, value_to_slot, List, Sequence, Value};

/// The six reserved built-in names. An identifier matching one of these
/// always dispatches here rather than to the [`crate::env::FuncTable`],
/// regardless of whether a same-named procedure was also defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltIn {
    Car,
    Cdr,
    Cons,
    Nullp,
    Listp,
    Intp,
}

impl BuiltIn {
    pub fn lookup(name: &str) -> Option<BuiltIn> {
        Some(match name {
            "car" => BuiltIn::Car,
            "cdr" => BuiltIn::Cdr,
            "cons" => BuiltIn::Cons,
            "nullp" => BuiltIn::Nullp,
            "listp" => BuiltIn::Listp,
            "intp" => BuiltIn::Intp,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            BuiltIn::Car => "car",
            BuiltIn::Cdr => "cdr",
            BuiltIn::Cons => "cons",
            BuiltIn::Nullp => "nullp",
            BuiltIn::Listp => "listp",
            BuiltIn::Intp => "intp",
        }
    }

    fn expect_arity(self, args: &[Expr], n: usize) -> Result<()> {
        if args.len() != n {
            return Err(MiniLangError::ArityMismatch {
                name: self.name().to_string(),
                expected: n,
                actual: args.len(),
            });
        }
        Ok(())
    }

    pub fn eval(self, ctx: &mut EvalCtx, args: &[Expr]) -> Result<Value> {
        match self {
            BuiltIn::Car => {
                self.expect_arity(args, 1)?;
                car(ctx, &args[0])
            }
            BuiltIn::Cdr => {
                self.expect_arity(args, 1)?;
                cdr(ctx, &args[0])
            }
            BuiltIn::Cons => {
                self.expect_arity(args, 2)?;
                cons(ctx, &args[0], &args[1])
            }
            BuiltIn::Nullp => {
                self.expect_arity(args, 1)?;
                nullp(ctx, &args[0])
            }
            BuiltIn::Listp => {
                self.expect_arity(args, 1)?;
                listp(ctx, &args[0])
            }
            BuiltIn::Intp => {
                self.expect_arity(args, 1)?;
                intp(ctx, &args[0])
            }
        }
    }
}

fn eval_to_list(ctx: &mut EvalCtx, expr: &Expr, op: &str) -> Result<List> {
    match eval_expr(ctx, expr)? {
        Value::List(l) => Ok(l),
        Value::Number(_) => Err(MiniLangError::TypeError(format!("{op} requires a List argument"))),
    }
}

/// `car(L)`.
fn car(ctx: &mut EvalCtx, arg: &Expr) -> Result<Value> {
    let list = eval_to_list(ctx, arg, "car")?;
    let head = list.head().ok_or(MiniLangError::EmptyList)?;
    let value = slot_to_value(ctx.heap.car(head));
    ctx.remember(value);
    Ok(value)
}

/// `cdr(L)`. Does not allocate; returns the empty list if `L`
/// is already empty.
fn cdr(ctx: &mut EvalCtx, arg: &Expr) -> Result<Value> {
    let list = eval_to_list(ctx, arg, "cdr")?;
    let value = match list.head() {
        Some(head) => match ctx.heap.cdr(head) {
            Some(tail) => Value::List(List::from_head(tail)),
            None => Value::List(List::empty()),
        },
        None => Value::List(List::empty()),
    };
    ctx.remember(value);
    Ok(value)
}

/// `cons(x, y)`. `y` must be a List; `x` may be anything.
fn cons(ctx: &mut EvalCtx, x: &Expr, y: &Expr) -> Result<Value> {
    let x_val = eval_expr(ctx, x)?;
    ctx.remember(x_val);
    let y_list = eval_to_list(ctx, y, "cons")?;
    ctx.remember(Value::List(y_list));

    let roots = ctx.roots();
    let idx = ctx.heap.alloc(&roots)?;
    ctx.heap.set(idx, value_to_slot(x_val), y_list.head());

    let value = Value::List(List::from_head(idx));
    ctx.remember(value);
    Ok(value)
}

/// `nullp(v)`.
fn nullp(ctx: &mut EvalCtx, arg: &Expr) -> Result<Value> {
    let is_empty_list = matches!(eval_expr(ctx, arg)?, Value::List(l) if l.is_empty());
    Ok(Value::Number(is_empty_list as i64))
}

/// `listp(v)`.
fn listp(ctx: &mut EvalCtx, arg: &Expr) -> Result<Value> {
    let is_list = matches!(eval_expr(ctx, arg)?, Value::List(_));
    Ok(Value::Number(is_list as i64))
}

/// `intp(v)`. Defaults to "evaluates to an integer";
/// [`IntpMode::SyntacticNumberLiteral`] instead treats `intp` as purely
/// syntactic, true only for a literal NUMBER token.
fn intp(ctx: &mut EvalCtx, arg: &Expr) -> Result<Value> {
    let is_int = match ctx.config.intp_mode {
        IntpMode::EvaluatesToInteger => matches!(eval_expr(ctx, arg)?, Value::Number(_)),
        IntpMode::SyntacticNumberLiteral => matches!(arg, Expr::Number(_)),
    };
    Ok(Value::Number(is_int as i64))
}

/// `lhs || rhs` list concatenation. Both sides must evaluate to Lists. We
/// flatten into a fresh chain of N+M cells rather than nesting a single new
/// cell over the two operands: flattening keeps `car`/`cdr` on the result
/// behaving exactly like any other flat list, with no special-casing for a
/// concatenation node, at the cost of copying both operands' elements.
pub fn concat(ctx: &mut EvalCtx, lhs: &Expr, rhs: &Expr) -> Result<Value> {
    let lhs_list = eval_to_list(ctx, lhs, "||")?;
    ctx.remember(Value::List(lhs_list));
    let rhs_list = eval_to_list(ctx, rhs, "||")?;
    ctx.remember(Value::List(rhs_list));

    let mut elements = list_elements(ctx.heap, lhs_list);
    elements.extend(list_elements(ctx.heap, rhs_list));

    let roots = ctx.roots();
    let list = Sequence::materialize(ctx.heap, &elements, &roots)?;
    Ok(Value::List(list))
}

/// Reads off a list's elements (shallow: nested lists are returned as
/// `Value::List`, not recursively flattened) by walking its cell chain.
fn list_elements(heap: &crate::heap::Heap, list: List) -> Vec<Value> {
    let mut elements = Vec::new();
    let mut cursor: Option<CellIndex> = list.head();
    while let Some(idx) = cursor {
        elements.push(slot_to_value(heap.car(idx)));
        cursor = heap.cdr(idx);
    }
    elements
}
