//! JSONiq-style query evaluation over JSON-like data.
//!
//! This crate is the public surface: the data model from `jsiq-types` and
//! the evaluator from `jsiq-engine`. A parser builds query trees through
//! [`builder`] and hands them to an [`Engine`].
//!
//! # Example
//!
//! ```ignore
//! use jsiq::{Engine, builder::*};
//!
//! let mut engine = Engine::new();
//! engine.register_json_collection("captains", captains_json)?;
//!
//! // for $c in collection("captains") where $c.century eq 24 return $c.name
//! let query = flowr(vec![
//!     for_clause(vec![for_binding("c", false, None, collection(atomic("captains")))]),
//!     where_clause(eq(lookup(varref("c"), atomic("century")), atomic(24.0))),
//!     return_clause(lookup(varref("c"), atomic("name"))),
//! ]);
//! let names = engine.evaluate_json(&query)?;
//! ```

pub use jsiq_engine::{
    BinaryOp, Binding, Bindings, CONTEXT_ITEM, Clause, CollectionRegistry, Engine, EngineOptions,
    EvaluationContext, Expr, ForBinding, Function, FunctionRegistry, Grouping, OrderSpec, Scope,
    UnaryOp, UnboundVariablePolicy, builder, evaluate,
};
pub use jsiq_types::{Atomic, GroupKey, Item, QueryError, Sequence};
