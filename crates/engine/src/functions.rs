//! Function registry consulted by `invoke` expressions, and the built-ins
//! every engine starts with.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use jsiq_types::{Item, QueryError, Sequence};
use serde_json::Value;

/// A callable operating on whole sequences.
pub type Function = Rc<dyn Fn(Vec<Sequence>) -> Result<Sequence, QueryError>>;

pub struct FunctionRegistry {
    functions: HashMap<String, Function>,
}

impl FunctionRegistry {
    /// Creates a registry with no functions, not even the built-ins.
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Registers a sequence-level function, replacing any previous one.
    pub fn register<F>(&mut self, name: &str, func: F)
    where
        F: Fn(Vec<Sequence>) -> Result<Sequence, QueryError> + 'static,
    {
        log::debug!("Registering function '{}'", name);
        self.functions.insert(name.to_string(), Rc::new(func));
    }

    /// Registers a host function working on plain JSON values.
    ///
    /// Each argument is collapsed to its native value (null, the single item,
    /// or an array of items) and the returned value is wrapped back into a
    /// one-item sequence. An `Err` becomes `QueryError::Function`.
    pub fn register_native<F>(&mut self, name: &str, func: F)
    where
        F: Fn(Vec<Value>) -> Result<Value, String> + 'static,
    {
        let function = name.to_string();
        self.register(name, move |args| {
            let values = args.iter().map(Sequence::to_json).collect();
            func(values)
                .map(|value| Sequence::from_item(Item::from(value)))
                .map_err(|message| QueryError::function(function.as_str(), message))
        });
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}

impl Default for FunctionRegistry {
    /// Creates a registry populated with the built-in functions.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("count", fn_count);
        registry.register("empty", fn_empty);
        registry.register("exists", fn_exists);
        registry.register("sum", fn_sum);
        registry.register("avg", fn_avg);
        registry
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.functions.keys().collect();
        names.sort();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}

fn single_argument(name: &str, mut args: Vec<Sequence>) -> Result<Sequence, QueryError> {
    if args.len() != 1 {
        return Err(QueryError::function(name, "Expected 1 argument"));
    }
    Ok(args.remove(0))
}

fn fn_count(args: Vec<Sequence>) -> Result<Sequence, QueryError> {
    let seq = single_argument("count", args)?;
    Ok(Sequence::from_item(seq.len()))
}

fn fn_empty(args: Vec<Sequence>) -> Result<Sequence, QueryError> {
    let seq = single_argument("empty", args)?;
    Ok(Sequence::from_item(seq.is_empty()))
}

fn fn_exists(args: Vec<Sequence>) -> Result<Sequence, QueryError> {
    let seq = single_argument("exists", args)?;
    Ok(Sequence::from_item(!seq.is_empty()))
}

fn numbers(seq: &Sequence) -> Result<Vec<f64>, QueryError> {
    seq.iter()
        .map(|item| {
            item.to_number()
                .ok_or_else(|| QueryError::not_numeric(item.to_string()))
        })
        .collect()
}

fn fn_sum(args: Vec<Sequence>) -> Result<Sequence, QueryError> {
    let seq = single_argument("sum", args)?;
    Ok(Sequence::from_item(numbers(&seq)?.iter().sum::<f64>()))
}

fn fn_avg(args: Vec<Sequence>) -> Result<Sequence, QueryError> {
    let seq = single_argument("avg", args)?;
    if seq.is_empty() {
        return Ok(Sequence::new());
    }
    let values = numbers(&seq)?;
    let total: f64 = values.iter().sum();
    Ok(Sequence::from_item(total / values.len() as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn numbers_seq(values: &[f64]) -> Sequence {
        values.iter().copied().map(Item::from).collect()
    }

    fn call(registry: &FunctionRegistry, name: &str, args: Vec<Sequence>) -> Result<Sequence, QueryError> {
        let func = registry.get(name).expect("function registered");
        func(args)
    }

    #[test]
    fn test_builtins_are_registered_by_default() {
        let registry = FunctionRegistry::default();
        for name in ["count", "empty", "exists", "sum", "avg"] {
            assert!(registry.contains(name), "missing {}", name);
        }
        assert!(!FunctionRegistry::new().contains("count"));
    }

    #[test]
    fn test_count() {
        let registry = FunctionRegistry::default();
        let result = call(&registry, "count", vec![numbers_seq(&[1.0, 2.0, 3.0])]).unwrap();
        assert_eq!(result.to_json(), json!(3));
        let result = call(&registry, "count", vec![Sequence::new()]).unwrap();
        assert_eq!(result.to_json(), json!(0));
    }

    #[test]
    fn test_count_checks_arity() {
        let registry = FunctionRegistry::default();
        let err = call(&registry, "count", vec![]).unwrap_err();
        assert!(matches!(err, QueryError::Function { .. }));
    }

    #[test]
    fn test_sum_and_avg() {
        let registry = FunctionRegistry::default();
        let seq = numbers_seq(&[1.0, 2.0, 6.0]);
        assert_eq!(call(&registry, "sum", vec![seq.clone()]).unwrap().to_json(), json!(9));
        assert_eq!(call(&registry, "avg", vec![seq]).unwrap().to_json(), json!(3));
        assert!(call(&registry, "avg", vec![Sequence::new()]).unwrap().is_empty());
        assert_eq!(call(&registry, "sum", vec![Sequence::new()]).unwrap().to_json(), json!(0));
    }

    #[test]
    fn test_sum_rejects_non_numbers() {
        let registry = FunctionRegistry::default();
        let seq: Sequence = vec![Item::from(1), Item::from("x")].into();
        assert!(call(&registry, "sum", vec![seq]).unwrap_err().is_not_numeric());
    }

    #[test]
    fn test_native_functions_see_collapsed_values() {
        let mut registry = FunctionRegistry::new();
        registry.register_native("describe", |args| Ok(json!(args)));
        let args = vec![
            Sequence::new(),
            Sequence::from_item("one"),
            numbers_seq(&[1.0, 2.0]),
        ];
        let result = call(&registry, "describe", args).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.to_json(), json!([null, "one", [1, 2]]));
    }

    #[test]
    fn test_native_errors_name_the_function() {
        let mut registry = FunctionRegistry::new();
        registry.register_native("fail", |_| Err("boom".to_string()));
        let err = call(&registry, "fail", vec![]).unwrap_err();
        assert_eq!(
            err,
            QueryError::Function {
                function: "fail".to_string(),
                message: "boom".to_string()
            }
        );
    }
}
