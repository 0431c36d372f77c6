//! The statement evaluator: `assign`, `if`, `while`, `define`, and running a
//! [`StmtList`] top to bottom.

use log::trace;

use crate::ast::{Expr, Proc, Stmt, StmtList};
use crate::env::Procedure;
use crate::error::{MiniLangError, Result};
use crate::eval::{eval_expr, EvalCtx};
use crate::value::Value;

/// Runs every statement in `stmts` in order against `ctx`. The in-flight
/// root set is cleared after each top-level statement: once a statement
/// finishes, anything it allocated that didn't end up bound to a name, or
/// returned, is fair game for the next collection.
pub fn exec_stmt_list(ctx: &mut EvalCtx, stmts: &StmtList) -> Result<()> {
    for stmt in &stmts.0 {
        exec_stmt(ctx, stmt)?;
        ctx.clear_in_flight();
    }
    Ok(())
}

fn exec_stmt(ctx: &mut EvalCtx, stmt: &Stmt) -> Result<()> {
    match stmt {
        Stmt::Assign { name, rhs } => {
            ctx.begin_assign(name);
            let value = eval_expr(ctx, rhs)?;
            ctx.end_assign();
            trace!("assign {name} := {value:?}");
            ctx.names.set(name.clone(), value);
        }

        Stmt::If {
            cond,
            then_body,
            else_body,
        } => {
            if eval_condition(ctx, cond)? > 0 {
                exec_stmt_list(ctx, then_body)?;
            } else {
                exec_stmt_list(ctx, else_body)?;
            }
        }

        Stmt::While { cond, body } => {
            while eval_condition(ctx, cond)? > 0 {
                exec_stmt_list(ctx, body)?;
            }
        }

        Stmt::Define { name, proc } => {
            let Proc { params, body } = proc.clone();
            ctx.funcs.define(name.clone(), Procedure::new(params, body));
        }
    }
    Ok(())
}

/// `if`/`while` conditions must reduce to an integer; the branch/loop runs
/// while that integer is strictly positive.
fn eval_condition(ctx: &mut EvalCtx, cond: &Expr) -> Result<i64> {
    match eval_expr(ctx, cond)? {
        Value::Number(n) => Ok(n),
        Value::List(_) => Err(MiniLangError::TypeError(format!(
            "condition must evaluate to a Number, found a List ({cond:?})"
        ))),
    }
}
