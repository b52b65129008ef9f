use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::item::{Item, format_number};

/// A scalar produced by atomization.
///
/// Dates never appear here: they atomize to their epoch-millisecond instant.
#[derive(Debug, Clone, PartialEq)]
pub enum Atomic {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
}

impl Atomic {
    pub fn type_name(&self) -> &'static str {
        match self {
            Atomic::Null => "null",
            Atomic::Boolean(_) => "boolean",
            Atomic::Number(_) => "number",
            Atomic::String(_) => "string",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Atomic::Null)
    }

    /// Native ordering between two scalars of the same type.
    ///
    /// Returns `None` when the pair cannot be related: mixed types, or a NaN.
    pub fn compare(&self, other: &Atomic) -> Option<Ordering> {
        match (self, other) {
            (Atomic::Null, Atomic::Null) => Some(Ordering::Equal),
            (Atomic::Boolean(a), Atomic::Boolean(b)) => a.partial_cmp(b),
            (Atomic::Number(a), Atomic::Number(b)) => a.partial_cmp(b),
            (Atomic::String(a), Atomic::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Display for Atomic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atomic::Null => write!(f, "null"),
            Atomic::Boolean(b) => write!(f, "{}", b),
            Atomic::Number(n) => write!(f, "{}", format_number(*n)),
            Atomic::String(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<Atomic> for Item {
    fn from(atomic: Atomic) -> Self {
        match atomic {
            Atomic::Null => Item::Null,
            Atomic::Boolean(b) => Item::Boolean(b),
            Atomic::Number(n) => Item::Number(n),
            Atomic::String(s) => Item::String(s),
        }
    }
}

impl From<bool> for Atomic {
    fn from(b: bool) -> Self {
        Atomic::Boolean(b)
    }
}

impl From<f64> for Atomic {
    fn from(n: f64) -> Self {
        Atomic::Number(n)
    }
}

impl From<&str> for Atomic {
    fn from(s: &str) -> Self {
        Atomic::String(s.to_string())
    }
}

impl From<String> for Atomic {
    fn from(s: String) -> Self {
        Atomic::String(s)
    }
}

/// Composite group-by key compared structurally.
///
/// Unlike `Atomic`'s native equality, keys treat NaN as equal to NaN and
/// `-0` as equal to `0`, so every tuple lands in exactly one partition.
#[derive(Debug, Clone)]
pub struct GroupKey(Vec<Atomic>);

impl GroupKey {
    pub fn new(parts: Vec<Atomic>) -> Self {
        Self(parts)
    }

    pub fn parts(&self) -> &[Atomic] {
        &self.0
    }
}

fn number_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0.0f64.to_bits()
    } else {
        n.to_bits()
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self.0.iter().zip(&other.0).all(|pair| match pair {
                (Atomic::Number(a), Atomic::Number(b)) => number_bits(*a) == number_bits(*b),
                (a, b) => a == b,
            })
    }
}

impl Eq for GroupKey {}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.len().hash(state);
        for part in &self.0 {
            std::mem::discriminant(part).hash(state);
            match part {
                Atomic::Null => {}
                Atomic::Boolean(b) => b.hash(state),
                Atomic::Number(n) => number_bits(*n).hash(state),
                Atomic::String(s) => s.hash(state),
            }
        }
    }
}
