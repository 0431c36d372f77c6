//! The expression evaluator: arithmetic, identifiers, list literals,
//! concatenation, and function-call dispatch.

use log::trace;

use crate::apply;
use crate::ast::{Expr, FunCall};
use crate::builtins;
use crate::config::Config;
use crate::env::{FuncTable, NameTable};
use crate::error::{MiniLangError, Result};
use crate::heap::{CellIndex, Heap};
use crate::roots::name_table_roots;
use crate::value::{Sequence, Value};

/// Everything a single evaluation step needs: the heap, the current name
/// table, the (immutable, for the duration of one call) function table, the
/// run's configuration, and the in-flight root set.
pub struct EvalCtx<'a> {
    pub heap: &'a mut Heap,
    pub names: &'a mut NameTable,
    pub funcs: &'a mut FuncTable,
    pub config: &'a Config,
    /// Cells produced by the current statement that aren't (yet) reachable
    /// from `names` — e.g. the head of a list literal still being built, or
    /// the result of a nested call that hasn't been assigned anywhere yet.
    /// Cleared by the statement evaluator once the statement finishes.
    extra_roots: Vec<CellIndex>,
    /// Roots carried in from an enclosing call frame, for the entire
    /// duration of a nested call. Under static scoping the callee's
    /// `names` is a fresh, empty `NameTable` that can't see the caller's
    /// bindings, but a collection triggered while the callee is running
    /// must still treat every list live in an enclosing scope as rooted —
    /// visibility and root discovery are different concerns. Unlike
    /// `extra_roots`, this is never cleared by `clear_in_flight`: it has to
    /// survive every statement of the callee's body, not just one.
    inherited_roots: Vec<CellIndex>,
    /// The name an in-progress `assign` is about to overwrite, if any. See
    /// [`crate::roots::name_table_roots`] for why this has to be excluded
    /// rather than just left in the name table during rhs evaluation.
    assign_target: Option<String>,
}

impl<'a> EvalCtx<'a> {
    pub fn new(heap: &'a mut Heap, names: &'a mut NameTable, funcs: &'a mut FuncTable, config: &'a Config) -> Self {
        EvalCtx {
            heap,
            names,
            funcs,
            config,
            extra_roots: Vec::new(),
            inherited_roots: Vec::new(),
            assign_target: None,
        }
    }

    /// Seeds the roots inherited from the enclosing call frame. Used when
    /// entering a static-scoped callee, whose `names` starts empty and so
    /// would otherwise lose every outer list the moment this context is
    /// built.
    pub fn with_inherited_roots(mut self, roots: Vec<CellIndex>) -> Self {
        self.inherited_roots = roots;
        self
    }

    /// The full root set to pass to [`crate::heap::Heap::alloc`] or
    /// [`crate::heap::Heap::collect`] right now.
    pub fn roots(&self) -> Vec<CellIndex> {
        let mut roots = name_table_roots(self.names, self.assign_target.as_deref());
        roots.extend(self.extra_roots.iter().copied());
        roots.extend(self.inherited_roots.iter().copied());
        roots
    }

    /// Marks `name` as about to be overwritten by the `assign` statement
    /// currently evaluating its right-hand side, so the old value's cells
    /// don't get rooted while the new right-hand side is being evaluated.
    pub fn begin_assign(&mut self, name: &str) {
        self.assign_target = Some(name.to_string());
    }

    /// Clears the pending-assign marker once the new value has been bound.
    pub fn end_assign(&mut self) {
        self.assign_target = None;
    }

    /// Registers a value's head cell (if it has one) as in-flight, so a
    /// collection triggered by a later allocation in the same statement
    /// won't free it before it's either assigned to a name or consumed by
    /// the operation building it.
    pub fn remember(&mut self, value: Value) {
        if let Value::List(list) = value {
            if let Some(head) = list.head() {
                self.extra_roots.push(head);
            }
        }
    }

    /// Drops the in-flight root set. Called by the statement evaluator once
    /// a statement finishes.
    pub fn clear_in_flight(&mut self) {
        self.extra_roots.clear();
    }
}

/// Evaluates an expression to a fully-evaluated value.
pub fn eval_expr(ctx: &mut EvalCtx, expr: &Expr) -> Result<Value> {
    let value = match expr {
        Expr::Number(n) => Value::Number(*n),

        Expr::Ident(name) => ctx
            .names
            .get(name)
            .ok_or_else(|| MiniLangError::UnboundName(name.clone()))?,

        Expr::Plus(lhs, rhs) => Value::Number(eval_arith(ctx, lhs)?.wrapping_add(eval_arith(ctx, rhs)?)),
        Expr::Minus(lhs, rhs) => Value::Number(eval_arith(ctx, lhs)?.wrapping_sub(eval_arith(ctx, rhs)?)),
        Expr::Times(lhs, rhs) => Value::Number(eval_arith(ctx, lhs)?.wrapping_mul(eval_arith(ctx, rhs)?)),

        Expr::ListLit(elements) => {
            let mut values = Vec::with_capacity(elements.len());
            for e in elements {
                let v = eval_expr(ctx, e)?;
                ctx.remember(v);
                values.push(v);
            }
            let roots = ctx.roots();
            let list = Sequence::materialize(ctx.heap, &values, &roots)?;
            Value::List(list)
        }

        Expr::Concat(lhs, rhs) => builtins::concat(ctx, lhs, rhs)?,

        Expr::Call(call) => eval_call(ctx, call)?,
    };

    trace!("eval {expr:?} -> {value:?}");
    ctx.remember(value);
    Ok(value)
}

fn eval_call(ctx: &mut EvalCtx, call: &FunCall) -> Result<Value> {
    if let Some(builtin) = builtins::BuiltIn::lookup(&call.name) {
        return builtin.eval(ctx, &call.args);
    }

    let proc = ctx
        .funcs
        .get(&call.name)
        .cloned()
        .ok_or_else(|| MiniLangError::UnboundProcedure(call.name.clone()))?;

    if proc.params.len() != call.args.len() {
        return Err(MiniLangError::ArityMismatch {
            name: call.name.clone(),
            expected: proc.params.len(),
            actual: call.args.len(),
        });
    }

    let mut arg_values = Vec::with_capacity(call.args.len());
    for arg in &call.args {
        let v = eval_expr(ctx, arg)?;
        ctx.remember(v);
        arg_values.push(v);
    }

    apply::call(ctx, &proc, arg_values, &call.name)
}

/// Evaluates `expr` and requires it to reduce to an integer. Values are
/// always fully evaluated at assignment time, so an identifier bound to a
/// value that's itself an unevaluated expression never occurs here — a
/// single [`eval_expr`] call always suffices, no transitive re-evaluation
/// loop needed.
fn eval_arith(ctx: &mut EvalCtx, expr: &Expr) -> Result<i64> {
    match eval_expr(ctx, expr)? {
        Value::Number(n) => Ok(n),
        Value::List(_) => Err(MiniLangError::TypeError(format!(
            "expected a Number in arithmetic, found a List ({expr:?})"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use crate::config::Config;
    use crate::interpreter::Interpreter;
    use crate::parser;

    fn eval_to_number(src: &str) -> i64 {
        let program = parser::parse(&format!("result := {src}")).unwrap();
        let mut interp = Interpreter::new(Config::new(16));
        interp.run(&program).unwrap();
        interp.names().get("result").unwrap().as_number().unwrap()
    }

    #[test_case("1 + 2", 3)]
    #[test_case("2 * 3 + 4", 10)]
    #[test_case("2 + 3 * 4", 14)]
    #[test_case("(2 + 3) * 4", 20)]
    #[test_case("10 - 3 - 2", 5)]
    #[test_case("0 - 5", -5)]
    fn arithmetic_precedence_and_associativity(src: &str, expected: i64) {
        assert_eq!(eval_to_number(src), expected);
    }

    #[test_case(i64::MAX, 1, i64::MIN)]
    #[test_case(i64::MIN, -1, i64::MAX)]
    fn addition_wraps_on_overflow(a: i64, b: i64, expected: i64) {
        // Negative literals aren't in the grammar; build them with `0 - n`.
        // `i64::MIN`'s magnitude doesn't fit back into an i64 NUMBER token,
        // so it needs an extra subtraction to stay representable.
        fn literal(n: i64) -> String {
            if n == i64::MIN {
                format!("(0 - {} - 1)", i64::MAX)
            } else if n < 0 {
                format!("(0 - {})", n.unsigned_abs())
            } else {
                n.to_string()
            }
        }
        assert_eq!(eval_to_number(&format!("{} + {}", literal(a), literal(b))), expected);
    }
}
