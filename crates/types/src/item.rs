use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::{Number, Value};

use crate::atomic::Atomic;

/// Largest magnitude at which every integer is exactly representable as `f64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// One value held in a [`Sequence`](crate::Sequence).
///
/// An array is a single structured item; it is never spliced into the
/// surrounding sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Object(IndexMap<String, Item>),
    Array(Vec<Item>),
    Date(DateTime<Utc>),
}

impl Item {
    pub fn type_name(&self) -> &'static str {
        match self {
            Item::Null => "null",
            Item::Boolean(_) => "boolean",
            Item::Number(_) => "number",
            Item::String(_) => "string",
            Item::Object(_) => "object",
            Item::Array(_) => "array",
            Item::Date(_) => "date",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Item::Null)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Item::Array(_))
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Item::Object(_) | Item::Array(_))
    }

    pub fn as_array(&self) -> Option<&[Item]> {
        match self {
            Item::Array(members) => Some(members),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Item>> {
        match self {
            Item::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Item::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Item::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Truthiness of a lone item: `0`, NaN, `""`, `null` and `false` are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Item::Null => false,
            Item::Boolean(b) => *b,
            Item::Number(n) => *n != 0.0 && !n.is_nan(),
            Item::String(s) => !s.is_empty(),
            Item::Object(_) | Item::Array(_) | Item::Date(_) => true,
        }
    }

    /// Finite numeric value of a scalar; numeric strings are parsed.
    pub fn to_number(&self) -> Option<f64> {
        let n = match self {
            Item::Number(n) => *n,
            Item::String(s) => s.trim().parse::<f64>().ok()?,
            Item::Date(d) => d.timestamp_millis() as f64,
            _ => return None,
        };
        n.is_finite().then_some(n)
    }

    /// String form of a scalar. Objects and arrays have none.
    pub fn to_string_value(&self) -> Option<String> {
        match self {
            Item::Null => Some("null".to_string()),
            Item::Boolean(b) => Some(b.to_string()),
            Item::Number(n) => Some(format_number(*n)),
            Item::String(s) => Some(s.clone()),
            Item::Date(d) => Some(d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Item::Object(_) | Item::Array(_) => None,
        }
    }

    pub fn atomize(&self) -> Option<Atomic> {
        match self {
            Item::Null => Some(Atomic::Null),
            Item::Boolean(b) => Some(Atomic::Boolean(*b)),
            Item::Number(n) => Some(Atomic::Number(*n)),
            Item::String(s) => Some(Atomic::String(s.clone())),
            Item::Date(d) => Some(Atomic::Number(d.timestamp_millis() as f64)),
            Item::Object(_) | Item::Array(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Item::Null => Value::Null,
            Item::Boolean(b) => Value::Bool(*b),
            Item::Number(n) => number_to_json(*n),
            Item::String(s) => Value::String(s.clone()),
            Item::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Item::Array(members) => Value::Array(members.iter().map(Item::to_json).collect()),
            Item::Date(d) => Value::String(d.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Renders a number the way query results print it: integral values carry no
/// fractional part.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Number(n) if !n.is_finite() => write!(f, "{}", format_number(*n)),
            _ => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<Value> for Item {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Item::Null,
            Value::Bool(b) => Item::Boolean(b),
            Value::Number(n) => Item::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Item::String(s),
            Value::Array(members) => Item::Array(members.into_iter().map(Item::from).collect()),
            Value::Object(map) => {
                Item::Object(map.into_iter().map(|(k, v)| (k, Item::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Item {
    fn from(b: bool) -> Self {
        Item::Boolean(b)
    }
}

impl From<f64> for Item {
    fn from(n: f64) -> Self {
        Item::Number(n)
    }
}

impl From<i64> for Item {
    fn from(n: i64) -> Self {
        Item::Number(n as f64)
    }
}

impl From<i32> for Item {
    fn from(n: i32) -> Self {
        Item::Number(f64::from(n))
    }
}

impl From<usize> for Item {
    fn from(n: usize) -> Self {
        Item::Number(n as f64)
    }
}

impl From<&str> for Item {
    fn from(s: &str) -> Self {
        Item::String(s.to_string())
    }
}

impl From<String> for Item {
    fn from(s: String) -> Self {
        Item::String(s)
    }
}

impl From<DateTime<Utc>> for Item {
    fn from(d: DateTime<Utc>) -> Self {
        Item::Date(d)
    }
}

impl From<Vec<Item>> for Item {
    fn from(members: Vec<Item>) -> Self {
        Item::Array(members)
    }
}
