#![allow(dead_code)]

pub mod fixtures;

use jsiq::builder::{atomic, collection, lookup, varref};
use jsiq::{Engine, Expr, QueryError};
use serde_json::Value;

/// Installs a test logger once per test binary.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// An engine with the `captains` and `movies` collections registered.
pub fn star_trek_engine() -> Engine {
    init_logging();
    let mut engine = Engine::new();
    engine
        .register_json_collection("captains", fixtures::captains())
        .expect("captains fixture is an array");
    engine
        .register_json_collection("movies", fixtures::movies())
        .expect("movies fixture is an array");
    engine
}

/// Evaluates `expr` on a fresh engine and returns the collapsed JSON value.
pub fn eval(expr: &Expr) -> Result<Value, QueryError> {
    init_logging();
    Engine::new().evaluate_json(expr)
}

pub fn n(value: f64) -> Expr {
    atomic(value)
}

pub fn s(value: &str) -> Expr {
    atomic(value)
}

/// `$name.key`
pub fn field(name: &str, key: &str) -> Expr {
    lookup(varref(name), atomic(key))
}

pub fn coll(name: &str) -> Expr {
    collection(atomic(name))
}
