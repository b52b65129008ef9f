use std::fmt;

use serde_json::Value;

use crate::atomic::Atomic;
use crate::error::QueryError;
use crate::item::Item;

/// An ordered, flat list of items: the universal runtime value.
///
/// Flatness is structural: a `Sequence` is never an `Item`, so appending one
/// sequence to another always splices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequence {
    items: Vec<Item>,
}

impl Sequence {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn from_item(item: impl Into<Item>) -> Self {
        Self {
            items: vec![item.into()],
        }
    }

    pub fn from_items(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn push(&mut self, item: impl Into<Item>) {
        self.items.push(item.into());
    }

    /// Splices every item of `other` onto the end of this sequence.
    pub fn append(&mut self, other: Sequence) {
        self.items.extend(other.items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    /// Item at a 0-based position, or the empty sequence when out of bounds.
    pub fn at(&self, index: usize) -> Sequence {
        match self.items.get(index) {
            Some(item) => Sequence::from_item(item.clone()),
            None => Sequence::new(),
        }
    }

    /// Projects `key` out of every object.
    ///
    /// Null items stay null; items without the key, including scalars and
    /// arrays, are dropped.
    pub fn lookup(&self, key: &str) -> Sequence {
        self.items
            .iter()
            .filter_map(|item| match item {
                Item::Null => Some(Item::Null),
                Item::Object(map) => map.get(key).cloned(),
                _ => None,
            })
            .collect()
    }

    /// 1-based member access broadcast over every array item.
    pub fn index(&self, position: f64) -> Sequence {
        if position.fract() != 0.0 || position < 1.0 {
            return Sequence::new();
        }
        let offset = position as usize - 1;
        self.items
            .iter()
            .filter_map(Item::as_array)
            .filter_map(|members| members.get(offset).cloned())
            .collect()
    }

    /// Concatenates the members of every array item, dropping everything else.
    pub fn unbox(&self) -> Sequence {
        self.items
            .iter()
            .filter_map(Item::as_array)
            .flat_map(|members| members.iter().cloned())
            .collect()
    }

    /// The sole item; `null` for the empty sequence.
    pub fn single(&self) -> Result<Item, QueryError> {
        match self.items.as_slice() {
            [] => Ok(Item::Null),
            [item] => Ok(item.clone()),
            items => Err(QueryError::MultipleItems { count: items.len() }),
        }
    }

    /// Effective boolean value.
    pub fn boolean(&self) -> bool {
        match self.items.as_slice() {
            [] => false,
            [item] => item.is_truthy(),
            _ => true,
        }
    }

    pub fn string(&self) -> Result<String, QueryError> {
        match self.items.as_slice() {
            [] => Ok(String::new()),
            [item] => item
                .to_string_value()
                .ok_or_else(|| QueryError::not_atomic(item.to_string())),
            _ => Err(QueryError::not_atomic(self.to_string())),
        }
    }

    pub fn number(&self) -> Result<f64, QueryError> {
        match self.items.as_slice() {
            [item] => item
                .to_number()
                .ok_or_else(|| QueryError::not_numeric(item.to_string())),
            _ => Err(QueryError::not_numeric(self.to_string())),
        }
    }

    /// Reduces an empty or singleton scalar sequence to its atomic value.
    pub fn atomize(&self) -> Result<Atomic, QueryError> {
        match self.items.as_slice() {
            [] => Ok(Atomic::Null),
            [item] => item
                .atomize()
                .ok_or_else(|| QueryError::not_atomic(item.to_string())),
            _ => Err(QueryError::not_atomic(self.to_string())),
        }
    }

    /// Collapses to a single item: `null` if empty, the item if singleton,
    /// otherwise an array of all items.
    pub fn collapse(self) -> Item {
        let mut items = self.items;
        match items.len() {
            0 => Item::Null,
            1 => items.remove(0),
            _ => Item::Array(items),
        }
    }

    /// Native JSON form, collapsed the same way as [`Sequence::collapse`].
    pub fn to_json(&self) -> Value {
        match self.items.as_slice() {
            [] => Value::Null,
            [item] => item.to_json(),
            items => Value::Array(items.iter().map(Item::to_json).collect()),
        }
    }
}

impl FromIterator<Item> for Sequence {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Sequence {
    type Item = Item;
    type IntoIter = std::vec::IntoIter<Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl From<Item> for Sequence {
    fn from(item: Item) -> Self {
        Self::from_item(item)
    }
}

impl From<Vec<Item>> for Sequence {
    fn from(items: Vec<Item>) -> Self {
        Self::from_items(items)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.items.as_slice() {
            [] => write!(f, "()"),
            [item] => write!(f, "{}", item),
            items => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}
