//! FLWOR pipelines.
//!
//! Each clause maps a list of tuple scopes to a new list. The first clause is
//! seeded with a single tuple: the scope the flowr itself is evaluated in, so
//! nested pipelines see the variables of the enclosing one.

use std::cmp::Ordering;

use indexmap::IndexMap;
use jsiq_types::{Atomic, GroupKey, Item, QueryError, Sequence};

use crate::ast::{Clause, Expr, ForBinding, Grouping, OrderSpec};
use crate::config::EngineOptions;
use crate::engine::{EvaluationContext, evaluate, resolve_binding};
use crate::scope::{Binding, Bindings, Scope};

pub fn evaluate_flowr(
    clauses: &[Clause],
    ctx: &EvaluationContext<'_>,
) -> Result<Sequence, QueryError> {
    let seed = ctx.scope.clone();
    let mut tuples = vec![seed.clone()];

    for clause in clauses {
        tuples = match clause {
            Clause::For(bindings) => apply_for(bindings, tuples, ctx)?,
            Clause::Let { name, value } => apply_let(name, value, tuples)?,
            Clause::Where(condition) => apply_where(condition, tuples, ctx)?,
            Clause::OrderBy(specs) => apply_order_by(specs, tuples, ctx)?,
            Clause::GroupBy(groupings) => apply_group_by(groupings, tuples, &seed, ctx)?,
            Clause::Return(expr) => return apply_return(expr, &tuples, ctx),
        };
        log::trace!("{} clause produced {} tuples", clause.name(), tuples.len());
    }

    log::warn!("FLWOR expression has no return clause, producing the empty sequence");
    Ok(Sequence::new())
}

/// Expands every tuple through the generators of one `for` statement.
///
/// Generators run left to right inside each incoming tuple, so a later
/// source may refer to variables bound by an earlier one.
fn apply_for(
    generators: &[ForBinding],
    tuples: Vec<Scope>,
    ctx: &EvaluationContext<'_>,
) -> Result<Vec<Scope>, QueryError> {
    let mut output = Vec::new();
    for tuple in tuples {
        let mut expanded = vec![tuple];
        for generator in generators {
            let mut next = Vec::new();
            for scope in &expanded {
                expand_generator(generator, scope, ctx, &mut next)?;
            }
            expanded = next;
        }
        output.extend(expanded);
    }
    Ok(output)
}

fn expand_generator(
    generator: &ForBinding,
    scope: &Scope,
    ctx: &EvaluationContext<'_>,
    output: &mut Vec<Scope>,
) -> Result<(), QueryError> {
    let values = evaluate(&generator.source, &ctx.with_scope(scope.clone()))?;

    if values.is_empty() {
        if generator.allow_empty {
            output.push(bind_iteration(generator, scope, Item::Null, 0)?);
        }
        return Ok(());
    }

    for (i, item) in values.into_iter().enumerate() {
        output.push(bind_iteration(generator, scope, item, i + 1)?);
    }
    Ok(())
}

fn bind_iteration(
    generator: &ForBinding,
    scope: &Scope,
    item: Item,
    position: usize,
) -> Result<Scope, QueryError> {
    let mut bindings = Bindings::new();
    bindings.insert(
        generator.name.as_str(),
        Binding::Value(Sequence::from_item(item)),
    )?;
    if let Some(position_name) = &generator.position {
        bindings.insert(
            position_name.as_str(),
            Binding::Value(Sequence::from_item(position)),
        )?;
    }
    Ok(scope.descendant(bindings))
}

/// The bound expression captures the incoming tuple, so it sees the tuple's
/// variables but never the name it is being bound to.
fn apply_let(
    name: &str,
    value: &std::rc::Rc<Expr>,
    tuples: Vec<Scope>,
) -> Result<Vec<Scope>, QueryError> {
    tuples
        .into_iter()
        .map(|tuple| {
            let binding = Binding::Deferred {
                expr: value.clone(),
                scope: tuple.clone(),
            };
            tuple.bind(name, binding)
        })
        .collect()
}

fn apply_where(
    condition: &Expr,
    tuples: Vec<Scope>,
    ctx: &EvaluationContext<'_>,
) -> Result<Vec<Scope>, QueryError> {
    let mut kept = Vec::with_capacity(tuples.len());
    for tuple in tuples {
        if evaluate(condition, &ctx.with_scope(tuple.clone()))?.boolean() {
            kept.push(tuple);
        }
    }
    Ok(kept)
}

/// Stable sort on the atomized keys of every tuple.
///
/// Keys are computed once per tuple. The first pair that cannot be ordered
/// fails the whole clause.
fn apply_order_by(
    specs: &[OrderSpec],
    tuples: Vec<Scope>,
    ctx: &EvaluationContext<'_>,
) -> Result<Vec<Scope>, QueryError> {
    let mut keyed = Vec::with_capacity(tuples.len());
    for tuple in tuples {
        let tuple_ctx = ctx.with_scope(tuple.clone());
        let keys = specs
            .iter()
            .map(|spec| evaluate(&spec.key, &tuple_ctx)?.atomize())
            .collect::<Result<Vec<_>, _>>()?;
        keyed.push((keys, tuple));
    }

    let mut failure = None;
    keyed.sort_by(|(a, _), (b, _)| match compare_keys(specs, a, b, ctx.options) {
        Ok(ordering) => ordering,
        Err(err) => {
            failure.get_or_insert(err);
            Ordering::Equal
        }
    });
    if let Some(err) = failure {
        return Err(err);
    }

    Ok(keyed.into_iter().map(|(_, tuple)| tuple).collect())
}

fn compare_keys(
    specs: &[OrderSpec],
    left: &[Atomic],
    right: &[Atomic],
    options: &EngineOptions,
) -> Result<Ordering, QueryError> {
    for ((spec, a), b) in specs.iter().zip(left).zip(right) {
        let empty_least = spec.empty_least.unwrap_or(options.empty_least_by_default);
        // Null placement ignores the sort direction.
        let ordering = match (a, b) {
            (Atomic::Null, Atomic::Null) => Ordering::Equal,
            (Atomic::Null, _) if empty_least => Ordering::Less,
            (Atomic::Null, _) => Ordering::Greater,
            (_, Atomic::Null) if empty_least => Ordering::Greater,
            (_, Atomic::Null) => Ordering::Less,
            _ => {
                let ordering = a.compare(b).ok_or_else(|| QueryError::comparison(a, b))?;
                if spec.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            }
        };
        if ordering != Ordering::Equal {
            return Ok(ordering);
        }
    }
    Ok(Ordering::Equal)
}

/// Partitions tuples by their grouping keys, in first-seen key order.
///
/// Every variable bound by the pipeline so far becomes the concatenation of
/// its values across the group; each grouping variable is bound to its key.
fn apply_group_by(
    groupings: &[Grouping],
    tuples: Vec<Scope>,
    seed: &Scope,
    ctx: &EvaluationContext<'_>,
) -> Result<Vec<Scope>, QueryError> {
    let mut groups: IndexMap<GroupKey, Vec<Scope>> = IndexMap::new();
    for tuple in tuples {
        let tuple_ctx = ctx.with_scope(tuple.clone());
        let parts = groupings
            .iter()
            .map(|grouping| evaluate(&grouping.key, &tuple_ctx)?.atomize())
            .collect::<Result<Vec<_>, _>>()?;
        groups
            .entry(GroupKey::new(parts))
            .or_default()
            .push(tuple.flattened_until(seed));
    }
    log::debug!("group by formed {} groups", groups.len());

    let mut output = Vec::with_capacity(groups.len());
    for (key, members) in groups {
        let Some(first) = members.first() else {
            continue;
        };

        let mut bindings = Bindings::new();
        for name in first.keys() {
            let mut aggregate = Sequence::new();
            for member in &members {
                if let Some(binding) = member.lookup(name) {
                    aggregate.append(resolve_binding(binding, ctx)?);
                }
            }
            bindings.insert(name, Binding::Value(aggregate))?;
        }

        for (grouping, part) in groupings.iter().zip(key.parts()) {
            let value = Sequence::from_item(Item::from(part.clone()));
            bindings.insert(grouping.name.as_str(), Binding::Value(value))?;
        }

        output.push(seed.descendant(bindings));
    }
    Ok(output)
}

fn apply_return(
    expr: &Expr,
    tuples: &[Scope],
    ctx: &EvaluationContext<'_>,
) -> Result<Sequence, QueryError> {
    let mut result = Sequence::new();
    for tuple in tuples {
        result.append(evaluate(expr, &ctx.with_scope(tuple.clone()))?);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::*;
    use crate::collections::CollectionRegistry;
    use crate::functions::FunctionRegistry;
    use serde_json::json;

    fn run(expr: &Expr) -> Result<Sequence, QueryError> {
        let functions = FunctionRegistry::default();
        let collections = CollectionRegistry::new();
        let options = EngineOptions::default();
        let ctx = EvaluationContext::new(&functions, &collections, &options);
        evaluate(expr, &ctx)
    }

    fn n(value: f64) -> Expr {
        atomic(value)
    }

    fn s(value: &str) -> Expr {
        atomic(value)
    }

    #[test]
    fn test_for_return() {
        let expr = flowr(vec![
            for_clause(vec![for_binding("x", false, None, range(n(1.0), n(3.0)))]),
            return_clause(mul(varref("x"), n(10.0))),
        ]);
        assert_eq!(run(&expr).unwrap().to_json(), json!([10, 20, 30]));
    }

    #[test]
    fn test_for_positional_variable() {
        let expr = flowr(vec![
            for_clause(vec![for_binding(
                "x",
                false,
                Some("i"),
                multi(vec![s("a"), s("b")]),
            )]),
            return_clause(array(vec![varref("i"), varref("x")])),
        ]);
        assert_eq!(run(&expr).unwrap().to_json(), json!([[1, "a"], [2, "b"]]));
    }

    #[test]
    fn test_dependent_generators() {
        // for $x in (1, 2), $y in (1 to $x) return [$x, $y]
        let expr = flowr(vec![
            for_clause(vec![
                for_binding("x", false, None, multi(vec![n(1.0), n(2.0)])),
                for_binding("y", false, None, range(n(1.0), varref("x"))),
            ]),
            return_clause(array(vec![varref("x"), varref("y")])),
        ]);
        assert_eq!(
            run(&expr).unwrap().to_json(),
            json!([[1, 1], [2, 1], [2, 2]])
        );
    }

    #[test]
    fn test_allowing_empty() {
        let expr = flowr(vec![
            for_clause(vec![for_binding("x", true, Some("i"), empty())]),
            return_clause(array(vec![varref("x"), varref("i")])),
        ]);
        assert_eq!(run(&expr).unwrap().to_json(), json!([null, 0]));

        let expr = flowr(vec![
            for_clause(vec![for_binding("x", false, None, empty())]),
            return_clause(varref("x")),
        ]);
        assert!(run(&expr).unwrap().is_empty());
    }

    #[test]
    fn test_let_and_where() {
        let expr = flowr(vec![
            for_clause(vec![for_binding("x", false, None, range(n(1.0), n(6.0)))]),
            let_clause("double", mul(varref("x"), n(2.0))),
            where_clause(gt(varref("double"), n(6.0))),
            return_clause(varref("double")),
        ]);
        assert_eq!(run(&expr).unwrap().to_json(), json!([8, 10, 12]));
    }

    #[test]
    fn test_let_shadowing_sees_previous_value() {
        let expr = flowr(vec![
            let_clause("x", n(1.0)),
            let_clause("x", plus(varref("x"), n(1.0))),
            return_clause(varref("x")),
        ]);
        assert_eq!(run(&expr).unwrap().to_json(), json!(2));
    }

    #[test]
    fn test_order_by_descending_with_tiebreak() {
        let pairs = vec![
            object(vec![(s("a"), n(1.0)), (s("b"), s("x"))]),
            object(vec![(s("a"), n(2.0)), (s("b"), s("y"))]),
            object(vec![(s("a"), n(1.0)), (s("b"), s("z"))]),
        ];
        let expr = flowr(vec![
            for_clause(vec![for_binding("p", false, None, multi(pairs))]),
            orderby_clause(vec![orderby_comparison(
                lookup(varref("p"), s("a")),
                false,
                None,
            )]),
            return_clause(lookup(varref("p"), s("b"))),
        ]);
        assert_eq!(run(&expr).unwrap().to_json(), json!(["y", "x", "z"]));
    }

    #[test]
    fn test_order_by_empty_placement_ignores_direction() {
        let values = multi(vec![n(2.0), atomic(Item::Null), n(1.0)]);
        for ascending in [true, false] {
            let expr = flowr(vec![
                for_clause(vec![for_binding("x", false, None, values.clone())]),
                orderby_clause(vec![orderby_comparison(varref("x"), ascending, Some(false))]),
                return_clause(varref("x")),
            ]);
            let result = run(&expr).unwrap().to_json();
            assert_eq!(result[2], json!(null), "ascending = {}", ascending);
        }
    }

    #[test]
    fn test_order_by_mixed_types_fails() {
        let expr = flowr(vec![
            for_clause(vec![for_binding(
                "x",
                false,
                None,
                multi(vec![n(1.0), s("a")]),
            )]),
            orderby_clause(vec![orderby_comparison(varref("x"), true, None)]),
            return_clause(varref("x")),
        ]);
        assert!(matches!(
            run(&expr).unwrap_err(),
            QueryError::Comparison { .. }
        ));
    }

    #[test]
    fn test_group_by_aggregates_other_variables() {
        let expr = flowr(vec![
            for_clause(vec![for_binding("x", false, None, range(n(1.0), n(6.0)))]),
            group_by_clause(vec![grouping("parity", modulo(varref("x"), n(2.0)))]),
            return_clause(object(vec![
                (s("parity"), varref("parity")),
                (s("members"), varref("x")),
            ])),
        ]);
        assert_eq!(
            run(&expr).unwrap().to_json(),
            json!([
                { "parity": 1, "members": [1, 3, 5] },
                { "parity": 0, "members": [2, 4, 6] }
            ])
        );
    }

    #[test]
    fn test_group_by_keeps_outer_variables_unaggregated() {
        let inner = flowr(vec![
            for_clause(vec![for_binding("x", false, None, range(n(1.0), n(4.0)))]),
            group_by_clause(vec![grouping("k", gt(varref("x"), n(2.0)))]),
            return_clause(array(vec![varref("k"), varref("outer")])),
        ]);
        let expr = flowr(vec![let_clause("outer", s("o")), return_clause(inner)]);
        assert_eq!(
            run(&expr).unwrap().to_json(),
            json!([[false, "o"], [true, "o"]])
        );
    }

    #[test]
    fn test_group_by_over_nothing() {
        let expr = flowr(vec![
            for_clause(vec![for_binding("x", false, None, empty())]),
            group_by_clause(vec![grouping("k", varref("x"))]),
            return_clause(varref("k")),
        ]);
        assert!(run(&expr).unwrap().is_empty());
    }

    #[test]
    fn test_flowr_without_return_is_empty() {
        let expr = flowr(vec![let_clause("x", n(1.0))]);
        assert!(run(&expr).unwrap().is_empty());
    }
}
