//! The `Engine` session object owning registries and options.

use jsiq_types::{Item, QueryError, Sequence};
use serde_json::Value;

use crate::ast::Expr;
use crate::collections::CollectionRegistry;
use crate::config::EngineOptions;
use crate::engine::{EvaluationContext, evaluate};
use crate::functions::FunctionRegistry;

/// Evaluates expression trees against its own function and collection
/// tables.
///
/// Engines are independent: registering a function or collection on one
/// never affects another.
#[derive(Debug, Default)]
pub struct Engine {
    functions: FunctionRegistry,
    collections: CollectionRegistry,
    options: EngineOptions,
}

impl Engine {
    /// Creates an engine with the built-in functions and default options.
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> Self {
        log::debug!("Creating engine with options {:?}", options);
        Self {
            functions: FunctionRegistry::default(),
            collections: CollectionRegistry::new(),
            options,
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn collections(&self) -> &CollectionRegistry {
        &self.collections
    }

    /// Registers a host function over native JSON values.
    ///
    /// Arguments arrive collapsed (null, the single item, or an array) and the
    /// returned value becomes a one-item sequence.
    pub fn register_function<F>(&mut self, name: &str, func: F)
    where
        F: Fn(Vec<Value>) -> Result<Value, String> + 'static,
    {
        self.functions.register_native(name, func);
    }

    /// Registers a function that receives and returns whole sequences.
    pub fn register_sequence_function<F>(&mut self, name: &str, func: F)
    where
        F: Fn(Vec<Sequence>) -> Result<Sequence, QueryError> + 'static,
    {
        self.functions.register(name, func);
    }

    pub fn register_collection<I>(&mut self, name: &str, items: I)
    where
        I: IntoIterator,
        I::Item: Into<Item>,
    {
        self.collections.register(name, items);
    }

    /// Registers a JSON array as a collection. Fails with
    /// `QueryError::InvalidCollection` for any other JSON value.
    pub fn register_json_collection(&mut self, name: &str, value: Value) -> Result<(), QueryError> {
        self.collections.register_json(name, value)
    }

    /// Evaluates `expr` in an empty root scope.
    pub fn evaluate(&self, expr: &Expr) -> Result<Sequence, QueryError> {
        let ctx = EvaluationContext::new(&self.functions, &self.collections, &self.options);
        evaluate(expr, &ctx)
    }

    /// Evaluates `expr` and collapses the result to a JSON value.
    pub fn evaluate_json(&self, expr: &Expr) -> Result<Value, QueryError> {
        self.evaluate(expr).map(|result| result.to_json())
    }
}
