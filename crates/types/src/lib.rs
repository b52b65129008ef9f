//! Data model for the jsiq query engine.
//!
//! - [`Item`]: one JSON-like value (null, boolean, number, string, object, array, date)
//! - [`Sequence`]: a flat, ordered list of items; the value every expression produces
//! - [`Atomic`]: the scalar an item atomizes to
//! - [`GroupKey`]: structural composite key used by `group by`
//! - [`QueryError`]: everything that can abort an evaluation

mod atomic;
mod error;
mod item;
mod sequence;

pub use atomic::{Atomic, GroupKey};
pub use error::QueryError;
pub use item::Item;
pub use sequence::Sequence;
