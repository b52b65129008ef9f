//! Expression tree evaluated by the engine.
//!
//! Nodes are immutable once built; the lexical scope is supplied at
//! evaluation time, so one node can be evaluated under many scopes (once per
//! FLWOR tuple, once per predicate item).

use std::rc::Rc;

use jsiq_types::Sequence;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A fixed value, independent of scope.
    Atomic(Sequence),
    Empty,
    /// Comma-separated sequence construction.
    Multi(Vec<Expr>),
    Object(Vec<(Expr, Expr)>),
    Array(Vec<Expr>),

    Lookup {
        base: Box<Expr>,
        name: Box<Expr>,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Unbox(Box<Expr>),

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Not(Box<Expr>),
    Boolean(Box<Expr>),
    Range {
        start: Box<Expr>,
        end: Box<Expr>,
    },

    Predicate {
        base: Box<Expr>,
        predicate: Box<Expr>,
    },
    SimpleMap {
        base: Box<Expr>,
        mapping: Box<Expr>,
    },
    /// The context item `$$`.
    Context,
    VarRef(String),

    If {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    Switch {
        operand: Box<Expr>,
        cases: Vec<(Expr, Expr)>,
        default: Box<Expr>,
    },

    Invoke {
        name: String,
        args: Vec<Expr>,
    },
    Collection(Box<Expr>),

    Flowr(Vec<Clause>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Concat,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
}

impl BinaryOp {
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Plus
                | BinaryOp::Minus
                | BinaryOp::Multiply
                | BinaryOp::Divide
                | BinaryOp::Modulo
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Equals
                | BinaryOp::NotEquals
                | BinaryOp::LessThan
                | BinaryOp::LessThanOrEqual
                | BinaryOp::GreaterThan
                | BinaryOp::GreaterThanOrEqual
        )
    }
}

/// One stage of a FLWOR pipeline, transforming a list of tuple scopes.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Binds `name` per tuple to a deferred evaluation of `value`.
    Let { name: String, value: Rc<Expr> },
    /// Generators of one `for` statement, applied left to right per tuple.
    For(Vec<ForBinding>),
    Where(Expr),
    OrderBy(Vec<OrderSpec>),
    GroupBy(Vec<Grouping>),
    Return(Expr),
}

impl Clause {
    pub fn name(&self) -> &'static str {
        match self {
            Clause::Let { .. } => "let",
            Clause::For(_) => "for",
            Clause::Where(_) => "where",
            Clause::OrderBy(_) => "order by",
            Clause::GroupBy(_) => "group by",
            Clause::Return(_) => "return",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForBinding {
    pub name: String,
    /// Outer-join semantics: an empty source still yields one tuple with the
    /// variable bound to null.
    pub allow_empty: bool,
    pub position: Option<String>,
    pub source: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderSpec {
    pub key: Expr,
    pub ascending: bool,
    /// `None` defers to the engine's configured default.
    pub empty_least: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grouping {
    pub name: String,
    pub key: Expr,
}
