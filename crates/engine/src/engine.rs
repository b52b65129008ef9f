//! Expression evaluation.
//!
//! Entry point: [`evaluate`] with an [`EvaluationContext`]. The context carries
//! the lexical scope explicitly, so expression nodes are never re-parented and
//! the same tree can be evaluated under any number of scopes.

use indexmap::IndexMap;
use jsiq_types::{Item, QueryError, Sequence};

use crate::ast::*;
use crate::collections::CollectionRegistry;
use crate::config::{EngineOptions, UnboundVariablePolicy};
use crate::flwor;
use crate::functions::FunctionRegistry;
use crate::operators;
use crate::scope::{Binding, CONTEXT_ITEM, Scope};

pub struct EvaluationContext<'e> {
    pub functions: &'e FunctionRegistry,
    pub collections: &'e CollectionRegistry,
    pub options: &'e EngineOptions,
    pub scope: Scope,
}

impl<'e> EvaluationContext<'e> {
    pub fn new(
        functions: &'e FunctionRegistry,
        collections: &'e CollectionRegistry,
        options: &'e EngineOptions,
    ) -> Self {
        Self {
            functions,
            collections,
            options,
            scope: Scope::new(),
        }
    }

    pub fn with_scope(&self, scope: Scope) -> Self {
        Self {
            functions: self.functions,
            collections: self.collections,
            options: self.options,
            scope,
        }
    }

    /// Context whose `$$` is `value`, shadowing any enclosing context item.
    pub fn with_context(&self, value: Sequence) -> Self {
        self.with_scope(self.scope.with_context_item(value))
    }

    pub fn with_context_item(&self, item: Item) -> Self {
        self.with_context(Sequence::from_item(item))
    }
}

pub fn evaluate(expr: &Expr, ctx: &EvaluationContext<'_>) -> Result<Sequence, QueryError> {
    match expr {
        Expr::Atomic(value) => Ok(value.clone()),
        Expr::Empty => Ok(Sequence::new()),
        Expr::Multi(exprs) => {
            let mut seq = Sequence::new();
            for e in exprs {
                seq.append(evaluate(e, ctx)?);
            }
            Ok(seq)
        }
        Expr::Object(pairs) => evaluate_object(pairs, ctx),
        Expr::Array(members) => evaluate_array(members, ctx),

        Expr::Lookup { base, name } => {
            let objects = evaluate(base, ctx)?;
            let key = evaluate(name, ctx)?.string()?;
            Ok(objects.lookup(&key))
        }
        Expr::Index { base, index } => {
            let arrays = evaluate(base, ctx)?;
            let position = evaluate(index, ctx)?.number()?;
            Ok(arrays.index(position))
        }
        Expr::Unbox(base) => Ok(evaluate(base, ctx)?.unbox()),

        Expr::Unary { op, operand } => {
            let value = evaluate(operand, ctx)?.number()?;
            Ok(Sequence::from_item(match op {
                UnaryOp::Plus => value,
                UnaryOp::Minus => -value,
            }))
        }
        Expr::Binary { left, op, right } => evaluate_binary(left, *op, right, ctx),
        Expr::Not(operand) => Ok(Sequence::from_item(!evaluate(operand, ctx)?.boolean())),
        Expr::Boolean(operand) => Ok(Sequence::from_item(evaluate(operand, ctx)?.boolean())),
        Expr::Range { start, end } => {
            let start = evaluate(start, ctx)?;
            let end = evaluate(end, ctx)?;
            operators::evaluate_range(&start, &end)
        }

        Expr::Predicate { base, predicate } => evaluate_predicate(base, predicate, ctx),
        Expr::SimpleMap { base, mapping } => {
            let items = evaluate(base, ctx)?;
            let mut result = Sequence::new();
            for item in items {
                result.append(evaluate(mapping, &ctx.with_context_item(item))?);
            }
            Ok(result)
        }
        Expr::Context => match ctx.scope.lookup(CONTEXT_ITEM) {
            Some(binding) => resolve_binding(binding, ctx),
            None => Ok(Sequence::new()),
        },
        Expr::VarRef(name) => evaluate_variable(name, ctx),

        Expr::If {
            condition,
            then_expr,
            else_expr,
        } => {
            if evaluate(condition, ctx)?.boolean() {
                evaluate(then_expr, ctx)
            } else {
                evaluate(else_expr, ctx)
            }
        }
        Expr::Switch {
            operand,
            cases,
            default,
        } => evaluate_switch(operand, cases, default, ctx),

        Expr::Invoke { name, args } => evaluate_invoke(name, args, ctx),
        Expr::Collection(name) => {
            let name = evaluate(name, ctx)?.string()?;
            Ok(ctx.collections.get(&name)?.clone())
        }

        Expr::Flowr(clauses) => flwor::evaluate_flowr(clauses, ctx),
    }
}

/// Produces the current value of a binding. Deferred bindings are evaluated
/// afresh under the scope they captured.
pub fn resolve_binding(
    binding: &Binding,
    ctx: &EvaluationContext<'_>,
) -> Result<Sequence, QueryError> {
    match binding {
        Binding::Value(value) => Ok(value.clone()),
        Binding::Deferred { expr, scope } => evaluate(expr, &ctx.with_scope(scope.clone())),
    }
}

fn evaluate_variable(name: &str, ctx: &EvaluationContext<'_>) -> Result<Sequence, QueryError> {
    if let Some(binding) = ctx.scope.lookup(name) {
        return resolve_binding(binding, ctx);
    }
    match ctx.options.unbound_variables {
        UnboundVariablePolicy::Error => Err(QueryError::UnboundVariable {
            name: name.to_string(),
        }),
        UnboundVariablePolicy::Zero => Ok(Sequence::from_item(0.0)),
    }
}

fn evaluate_object(
    pairs: &[(Expr, Expr)],
    ctx: &EvaluationContext<'_>,
) -> Result<Sequence, QueryError> {
    let mut map = IndexMap::with_capacity(pairs.len());
    for (name, value) in pairs {
        let value = evaluate(value, ctx)?.collapse();
        let key = evaluate(name, ctx)?.string()?;
        map.insert(key, value);
    }
    Ok(Sequence::from_item(Item::Object(map)))
}

/// Every member expression contributes all of its items, so `[ (1, 2) ]`
/// and `[ 1, 2 ]` build the same array while `[ [1, 2] ]` nests.
fn evaluate_array(members: &[Expr], ctx: &EvaluationContext<'_>) -> Result<Sequence, QueryError> {
    let mut items = Vec::new();
    for member in members {
        items.extend(evaluate(member, ctx)?.into_items());
    }
    Ok(Sequence::from_item(Item::Array(items)))
}

fn evaluate_binary(
    left: &Expr,
    op: BinaryOp,
    right: &Expr,
    ctx: &EvaluationContext<'_>,
) -> Result<Sequence, QueryError> {
    match op {
        BinaryOp::And => {
            let result = evaluate(left, ctx)?.boolean() && evaluate(right, ctx)?.boolean();
            Ok(Sequence::from_item(result))
        }
        BinaryOp::Or => {
            let result = evaluate(left, ctx)?.boolean() || evaluate(right, ctx)?.boolean();
            Ok(Sequence::from_item(result))
        }
        BinaryOp::Concat => {
            let l = evaluate(left, ctx)?;
            let r = evaluate(right, ctx)?;
            operators::evaluate_concat(&l, &r)
        }
        _ if op.is_arithmetic() => {
            let l = evaluate(left, ctx)?;
            let r = evaluate(right, ctx)?;
            operators::evaluate_arithmetic(op, &l, &r)
        }
        _ => {
            let l = evaluate(left, ctx)?;
            let r = evaluate(right, ctx)?;
            operators::evaluate_comparison(op, &l, &r)
        }
    }
}

/// Filters `base` by `predicate`.
///
/// The predicate is first evaluated in the enclosing scope, where `$$` is
/// whatever context item surrounds the filter. If it yields a number, that
/// number selects a 1-based position. Only a numeric coercion failure moves
/// on to boolean filtering, where the predicate is evaluated once per item
/// with `$$` bound to that item.
fn evaluate_predicate(
    base: &Expr,
    predicate: &Expr,
    ctx: &EvaluationContext<'_>,
) -> Result<Sequence, QueryError> {
    let items = evaluate(base, ctx)?;

    match evaluate(predicate, ctx).and_then(|value| value.number()) {
        Ok(position) => {
            if position.fract() != 0.0 || position < 1.0 {
                return Ok(Sequence::new());
            }
            return Ok(items.at(position as usize - 1));
        }
        Err(err) if err.is_not_numeric() => {}
        Err(err) => return Err(err),
    }

    let mut kept = Sequence::new();
    for item in items.iter() {
        if evaluate(predicate, &ctx.with_context_item(item.clone()))?.boolean() {
            kept.push(item.clone());
        }
    }
    Ok(kept)
}

fn evaluate_switch(
    operand: &Expr,
    cases: &[(Expr, Expr)],
    default: &Expr,
    ctx: &EvaluationContext<'_>,
) -> Result<Sequence, QueryError> {
    let value = evaluate(operand, ctx)?.atomize()?;
    for (condition, result) in cases {
        if evaluate(condition, ctx)?.atomize()? == value {
            return evaluate(result, ctx);
        }
    }
    evaluate(default, ctx)
}

fn evaluate_invoke(
    name: &str,
    args: &[Expr],
    ctx: &EvaluationContext<'_>,
) -> Result<Sequence, QueryError> {
    let function = ctx
        .functions
        .get(name)
        .ok_or_else(|| QueryError::UnknownFunction {
            name: name.to_string(),
        })?;
    let values = args
        .iter()
        .map(|arg| evaluate(arg, ctx))
        .collect::<Result<Vec<_>, _>>()?;
    function(values)
}
