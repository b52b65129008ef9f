//! Engine options.

use serde::{Deserialize, Serialize};

/// What a reference to an unbound variable evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnboundVariablePolicy {
    /// Fail with `QueryError::UnboundVariable`.
    #[default]
    Error,
    /// Evaluate to the number `0`, as older query hosts did.
    Zero,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineOptions {
    pub unbound_variables: UnboundVariablePolicy,
    /// Placement of null order-by keys when a comparator does not say
    /// `empty least` or `empty greatest`.
    pub empty_least_by_default: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            unbound_variables: UnboundVariablePolicy::Error,
            empty_least_by_default: true,
        }
    }
}

impl EngineOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
