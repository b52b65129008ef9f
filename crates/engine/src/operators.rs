//! Coercion-driven operators shared by the evaluator.

use std::cmp::Ordering;

use jsiq_types::{Item, QueryError, Sequence};

use crate::ast::BinaryOp;

/// Applies an arithmetic operator with IEEE semantics after numeric coercion
/// of both operands.
pub(crate) fn evaluate_arithmetic(
    op: BinaryOp,
    left: &Sequence,
    right: &Sequence,
) -> Result<Sequence, QueryError> {
    let a = left.number()?;
    let b = right.number()?;
    let result = match op {
        BinaryOp::Plus => a + b,
        BinaryOp::Minus => a - b,
        BinaryOp::Multiply => a * b,
        BinaryOp::Divide => checked_division(a, b, a / b)?,
        BinaryOp::Modulo => checked_division(a, b, a % b)?,
        _ => unreachable!("{:?} is not an arithmetic operator", op),
    };
    Ok(Sequence::from_item(result))
}

fn checked_division(dividend: f64, divisor: f64, result: f64) -> Result<f64, QueryError> {
    if result.is_finite() {
        Ok(result)
    } else {
        Err(QueryError::Division { dividend, divisor })
    }
}

/// Compares two singleton values with native equality and ordering.
///
/// There is no cross-type coercion: values of different types are unequal
/// and unordered, so every ordering operator yields false for them.
pub(crate) fn evaluate_comparison(
    op: BinaryOp,
    left: &Sequence,
    right: &Sequence,
) -> Result<Sequence, QueryError> {
    let a = left.single()?;
    let b = right.single()?;
    let result = match op {
        BinaryOp::Equals => a == b,
        BinaryOp::NotEquals => a != b,
        BinaryOp::LessThan => compare_items(&a, &b) == Some(Ordering::Less),
        BinaryOp::LessThanOrEqual => matches!(
            compare_items(&a, &b),
            Some(Ordering::Less | Ordering::Equal)
        ),
        BinaryOp::GreaterThan => compare_items(&a, &b) == Some(Ordering::Greater),
        BinaryOp::GreaterThanOrEqual => matches!(
            compare_items(&a, &b),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        _ => unreachable!("{:?} is not a comparison operator", op),
    };
    Ok(Sequence::from_item(result))
}

fn compare_items(a: &Item, b: &Item) -> Option<Ordering> {
    match (a, b) {
        (Item::Date(x), Item::Date(y)) => Some(x.cmp(y)),
        _ => a.atomize()?.compare(&b.atomize()?),
    }
}

/// Concatenates the string forms of both operands.
pub(crate) fn evaluate_concat(left: &Sequence, right: &Sequence) -> Result<Sequence, QueryError> {
    let mut joined = left.string()?;
    joined.push_str(&right.string()?);
    Ok(Sequence::from_item(joined))
}

/// Largest magnitude at which consecutive integers are distinct `f64` values.
const MAX_RANGE_BOUND: f64 = 9_007_199_254_740_992.0;

/// Every integer between the two bounds inclusive, ascending whatever their
/// order.
///
/// An empty bound yields the empty sequence. Bounds beyond +/-2^53 fail.
pub(crate) fn evaluate_range(start: &Sequence, end: &Sequence) -> Result<Sequence, QueryError> {
    if start.is_empty() || end.is_empty() {
        return Ok(Sequence::new());
    }
    let a = start.number()?;
    let b = end.number()?;
    if a.abs() > MAX_RANGE_BOUND || b.abs() > MAX_RANGE_BOUND {
        return Err(QueryError::Range { start: a, end: b });
    }
    let (low, high) = if a <= b { (a, b) } else { (b, a) };

    let first = low.ceil() as i64;
    let last = high.floor() as i64;
    Ok((first..=last).map(|n| Item::Number(n as f64)).collect())
}
