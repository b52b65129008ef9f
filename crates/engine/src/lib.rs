//! Evaluation engine for JSONiq-style queries.
//!
//! Queries are trees of [`Expr`] nodes built through [`builder`] and evaluated
//! by an [`Engine`], which owns the function and collection registries.
//!
//! # Key Types
//!
//! - [`Expr`] / [`Clause`]: expression tree and FLWOR clauses
//! - [`Scope`]: persistent chain of variable bindings
//! - [`EvaluationContext`]: scope plus registries threaded through evaluation
//! - [`Engine`]: session object holding registries and [`EngineOptions`]
//!
//! # Example
//!
//! ```ignore
//! use jsiq_engine::{Engine, builder::*};
//!
//! let mut engine = Engine::new();
//! engine.register_collection("nums", vec![1, 2, 3]);
//! let query = invoke("sum", vec![collection(atomic("nums"))]);
//! assert_eq!(engine.evaluate_json(&query)?, serde_json::json!(6));
//! ```

pub mod ast;
pub mod builder;
pub mod collections;
pub mod config;
pub mod engine;
pub mod flwor;
pub mod functions;
mod operators;
pub mod runtime;
pub mod scope;

pub use ast::{BinaryOp, Clause, Expr, ForBinding, Grouping, OrderSpec, UnaryOp};
pub use collections::CollectionRegistry;
pub use config::{EngineOptions, UnboundVariablePolicy};
pub use engine::{EvaluationContext, evaluate};
pub use functions::{Function, FunctionRegistry};
pub use runtime::Engine;
pub use scope::{Binding, Bindings, CONTEXT_ITEM, Scope};

pub use jsiq_types::{Atomic, GroupKey, Item, QueryError, Sequence};
