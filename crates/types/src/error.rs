use thiserror::Error;

/// Failure of a query evaluation.
///
/// Every error aborts the whole evaluation; there is no per-item recovery.
/// Offending values are carried as JSON text so hosts can present them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Cannot convert a sequence of {count} items to a single value")]
    MultipleItems { count: usize },

    #[error("Cannot atomize {found}")]
    NotAtomic { found: String },

    #[error("Cannot convert {found} to a number")]
    NotNumeric { found: String },

    #[error("Failed comparing {left} with {right}")]
    Comparison { left: String, right: String },

    #[error("Division of {dividend} by {divisor} is not finite")]
    Division { dividend: f64, divisor: f64 },

    #[error("Range from {start} to {end} exceeds the exact integer limit")]
    Range { start: f64, end: f64 },

    #[error("Function '{name}' does not exist")]
    UnknownFunction { name: String },

    #[error("Collection '{name}' does not exist")]
    UnknownCollection { name: String },

    #[error("Collection '{name}' must be an array")]
    InvalidCollection { name: String },

    #[error("Variable '{name}' is not bound")]
    UnboundVariable { name: String },

    #[error("Invalid binding for '{name}': {reason}")]
    InvalidScopeBinding { name: String, reason: String },

    #[error("Function '{function}' error: {message}")]
    Function { function: String, message: String },
}

impl QueryError {
    pub fn not_atomic(found: impl Into<String>) -> Self {
        Self::NotAtomic {
            found: found.into(),
        }
    }

    pub fn not_numeric(found: impl Into<String>) -> Self {
        Self::NotNumeric {
            found: found.into(),
        }
    }

    pub fn comparison(left: impl ToString, right: impl ToString) -> Self {
        Self::Comparison {
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    pub fn function(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Function {
            function: function.into(),
            message: message.into(),
        }
    }

    pub fn invalid_binding(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidScopeBinding {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Whether this is the numeric coercion failure, the one error a
    /// positional predicate probe is allowed to recover from.
    pub fn is_not_numeric(&self) -> bool {
        matches!(self, Self::NotNumeric { .. })
    }
}
