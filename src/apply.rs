//! Procedure application: parameter binding, the reserved `return` binding,
//! and the static/dynamic scoping split.

use crate::env::{NameTable, Procedure, RETURN_SYMBOL};
use crate::error::{MiniLangError, Result};
use crate::eval::EvalCtx;
use crate::exec::exec_stmt_list;
use crate::config::ScopePolicy;
use crate::value::Value;

/// Calls `proc` with already-evaluated `args`, passed by value: Lists are
/// shared through their cell chain, never copied. `proc_name` is only used
/// for error messages.
pub fn call(ctx: &mut EvalCtx, proc: &Procedure, args: Vec<Value>, proc_name: &str) -> Result<Value> {
    match ctx.config.scope_policy {
        ScopePolicy::Static => call_static(ctx, proc, args, proc_name),
        ScopePolicy::Dynamic => call_dynamic(ctx, proc, args, proc_name),
    }
}

/// The callee's scope starts empty: it sees only its own parameters.
/// Discarded after reading `return` — any List the callee produced but
/// didn't return becomes garbage at the next collection.
///
/// A fresh, empty `NameTable` means the callee can't *see* the caller's
/// bindings, but every list live in an enclosing scope must still survive a
/// collection triggered while the callee is on the stack — so the caller's
/// current root set is snapshotted and carried into the callee's context as
/// inherited roots, independent of (and in addition to) whatever the callee
/// itself allocates.
fn call_static(ctx: &mut EvalCtx, proc: &Procedure, args: Vec<Value>, proc_name: &str) -> Result<Value> {
    let caller_roots = ctx.roots();

    let mut callee_names = NameTable::new();
    for (param, arg) in proc.params.iter().zip(args) {
        callee_names.set(param.clone(), arg);
    }

    let mut callee_ctx =
        EvalCtx::new(&mut *ctx.heap, &mut callee_names, &mut *ctx.funcs, ctx.config).with_inherited_roots(caller_roots);
    exec_stmt_list(&mut callee_ctx, &proc.body)?;

    callee_names
        .get(RETURN_SYMBOL)
        .ok_or_else(|| MiniLangError::MissingReturn(proc_name.to_string()))
}

/// The callee executes directly in the caller's name table: parameter
/// bindings overwrite any caller locals of the same name, and anything the
/// body assigns is visible to the caller once the call returns.
fn call_dynamic(ctx: &mut EvalCtx, proc: &Procedure, args: Vec<Value>, proc_name: &str) -> Result<Value> {
    for (param, arg) in proc.params.iter().zip(args) {
        ctx.names.set(param.clone(), arg);
    }

    exec_stmt_list(ctx, &proc.body)?;

    ctx.names
        .get(RETURN_SYMBOL)
        .ok_or_else(|| MiniLangError::MissingReturn(proc_name.to_string()))
}
