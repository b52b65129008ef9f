//! Construction API for expression trees.
//!
//! One factory per expression and clause kind. A parser builds queries by
//! calling these with already-built children; hosts can use them directly.
//!
//! ```ignore
//! use jsiq_engine::builder::*;
//!
//! // for $x in 1 to 3 return $x * 2
//! let query = flowr(vec![
//!     for_clause(vec![for_binding("x", false, None, range(atomic(1.0), atomic(3.0)))]),
//!     return_clause(mul(varref("x"), atomic(2.0))),
//! ]);
//! ```

use std::rc::Rc;

use jsiq_types::{Item, Sequence};

use crate::ast::*;

pub fn atomic(value: impl Into<Item>) -> Expr {
    Expr::Atomic(Sequence::from_item(value))
}

pub fn empty() -> Expr {
    Expr::Empty
}

pub fn multi(exprs: Vec<Expr>) -> Expr {
    Expr::Multi(exprs)
}

pub fn object(pairs: Vec<(Expr, Expr)>) -> Expr {
    Expr::Object(pairs)
}

pub fn array(members: Vec<Expr>) -> Expr {
    Expr::Array(members)
}

pub fn lookup(base: Expr, name: Expr) -> Expr {
    Expr::Lookup {
        base: Box::new(base),
        name: Box::new(name),
    }
}

pub fn index(base: Expr, index: Expr) -> Expr {
    Expr::Index {
        base: Box::new(base),
        index: Box::new(index),
    }
}

pub fn unbox(base: Expr) -> Expr {
    Expr::Unbox(Box::new(base))
}

fn unary(op: UnaryOp, operand: Expr) -> Expr {
    Expr::Unary {
        op,
        operand: Box::new(operand),
    }
}

pub fn unary_plus(operand: Expr) -> Expr {
    unary(UnaryOp::Plus, operand)
}

pub fn unary_minus(operand: Expr) -> Expr {
    unary(UnaryOp::Minus, operand)
}

pub fn range(start: Expr, end: Expr) -> Expr {
    Expr::Range {
        start: Box::new(start),
        end: Box::new(end),
    }
}

fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
    Expr::Binary {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

pub fn plus(left: Expr, right: Expr) -> Expr {
    binary(left, BinaryOp::Plus, right)
}

pub fn minus(left: Expr, right: Expr) -> Expr {
    binary(left, BinaryOp::Minus, right)
}

pub fn mul(left: Expr, right: Expr) -> Expr {
    binary(left, BinaryOp::Multiply, right)
}

pub fn div(left: Expr, right: Expr) -> Expr {
    binary(left, BinaryOp::Divide, right)
}

pub fn modulo(left: Expr, right: Expr) -> Expr {
    binary(left, BinaryOp::Modulo, right)
}

/// String concatenation (`||`).
pub fn concat(left: Expr, right: Expr) -> Expr {
    binary(left, BinaryOp::Concat, right)
}

pub fn eq(left: Expr, right: Expr) -> Expr {
    binary(left, BinaryOp::Equals, right)
}

pub fn ne(left: Expr, right: Expr) -> Expr {
    binary(left, BinaryOp::NotEquals, right)
}

pub fn lt(left: Expr, right: Expr) -> Expr {
    binary(left, BinaryOp::LessThan, right)
}

pub fn le(left: Expr, right: Expr) -> Expr {
    binary(left, BinaryOp::LessThanOrEqual, right)
}

pub fn gt(left: Expr, right: Expr) -> Expr {
    binary(left, BinaryOp::GreaterThan, right)
}

pub fn ge(left: Expr, right: Expr) -> Expr {
    binary(left, BinaryOp::GreaterThanOrEqual, right)
}

pub fn and(left: Expr, right: Expr) -> Expr {
    binary(left, BinaryOp::And, right)
}

pub fn or(left: Expr, right: Expr) -> Expr {
    binary(left, BinaryOp::Or, right)
}

pub fn not(operand: Expr) -> Expr {
    Expr::Not(Box::new(operand))
}

pub fn boolean(operand: Expr) -> Expr {
    Expr::Boolean(Box::new(operand))
}

pub fn predicate(base: Expr, predicate: Expr) -> Expr {
    Expr::Predicate {
        base: Box::new(base),
        predicate: Box::new(predicate),
    }
}

/// `base ! mapping`: evaluates `mapping` once per item of `base`.
pub fn simple_map(base: Expr, mapping: Expr) -> Expr {
    Expr::SimpleMap {
        base: Box::new(base),
        mapping: Box::new(mapping),
    }
}

pub fn context() -> Expr {
    Expr::Context
}

pub fn varref(name: impl Into<String>) -> Expr {
    Expr::VarRef(name.into())
}

pub fn ifclause(condition: Expr, then_expr: Expr, else_expr: Expr) -> Expr {
    Expr::If {
        condition: Box::new(condition),
        then_expr: Box::new(then_expr),
        else_expr: Box::new(else_expr),
    }
}

pub fn switchclause(operand: Expr, cases: Vec<(Expr, Expr)>, default: Expr) -> Expr {
    Expr::Switch {
        operand: Box::new(operand),
        cases,
        default: Box::new(default),
    }
}

pub fn invoke(name: impl Into<String>, args: Vec<Expr>) -> Expr {
    Expr::Invoke {
        name: name.into(),
        args,
    }
}

pub fn collection(name: Expr) -> Expr {
    Expr::Collection(Box::new(name))
}

pub fn flowr(clauses: Vec<Clause>) -> Expr {
    Expr::Flowr(clauses)
}

pub fn let_clause(name: impl Into<String>, value: Expr) -> Clause {
    Clause::Let {
        name: name.into(),
        value: Rc::new(value),
    }
}

/// One generator of a `for` statement.
pub fn for_binding(
    name: impl Into<String>,
    allow_empty: bool,
    position: Option<&str>,
    source: Expr,
) -> ForBinding {
    ForBinding {
        name: name.into(),
        allow_empty,
        position: position.map(str::to_string),
        source,
    }
}

pub fn for_clause(generators: Vec<ForBinding>) -> Clause {
    Clause::For(generators)
}

pub fn where_clause(condition: Expr) -> Clause {
    Clause::Where(condition)
}

pub fn orderby_clause(specs: Vec<OrderSpec>) -> Clause {
    Clause::OrderBy(specs)
}

/// `empty_least` of `None` uses the engine's configured default.
pub fn orderby_comparison(key: Expr, ascending: bool, empty_least: Option<bool>) -> OrderSpec {
    OrderSpec {
        key,
        ascending,
        empty_least,
    }
}

pub fn grouping(name: impl Into<String>, key: Expr) -> Grouping {
    Grouping {
        name: name.into(),
        key,
    }
}

pub fn group_by_clause(groupings: Vec<Grouping>) -> Clause {
    Clause::GroupBy(groupings)
}

pub fn return_clause(expr: Expr) -> Clause {
    Clause::Return(expr)
}
