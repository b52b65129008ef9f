//! Named collections supplying input data to `collection(...)` expressions.

use std::collections::HashMap;

use jsiq_types::{Item, QueryError, Sequence};
use serde_json::Value;

#[derive(Debug, Default)]
pub struct CollectionRegistry {
    collections: HashMap<String, Sequence>,
}

impl CollectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a snapshot of `items` under `name`, replacing any previous one.
    pub fn register<I>(&mut self, name: &str, items: I)
    where
        I: IntoIterator,
        I::Item: Into<Item>,
    {
        let seq: Sequence = items.into_iter().map(Into::into).collect();
        log::debug!("Registering collection '{}' with {} items", name, seq.len());
        self.collections.insert(name.to_string(), seq);
    }

    /// Registers a JSON array as a collection; any other value is rejected.
    pub fn register_json(&mut self, name: &str, value: Value) -> Result<(), QueryError> {
        match value {
            Value::Array(items) => {
                self.register(name, items);
                Ok(())
            }
            _ => Err(QueryError::InvalidCollection {
                name: name.to_string(),
            }),
        }
    }

    pub fn get(&self, name: &str) -> Result<&Sequence, QueryError> {
        self.collections
            .get(name)
            .ok_or_else(|| QueryError::UnknownCollection {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }
}
