//! Lexical scopes as a persistent chain of binding frames.
//!
//! A scope is never mutated after creation. Binding a variable creates a
//! descendant frame pointing at its parent, so tuples of a FLWOR pipeline can
//! share their common ancestry while each sees its own values.

use std::rc::Rc;

use indexmap::IndexMap;
use jsiq_types::{QueryError, Sequence};

use crate::ast::Expr;

/// Reserved name of the context item bound by predicates and simple maps.
pub const CONTEXT_ITEM: &str = "$$";

/// What a name is bound to.
#[derive(Debug, Clone)]
pub enum Binding {
    /// An already computed value.
    Value(Sequence),
    /// An expression re-evaluated under `scope` on every reference.
    Deferred { expr: Rc<Expr>, scope: Scope },
}

/// Local bindings of one frame, validated on insertion.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    locals: IndexMap<String, Binding>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, binding: Binding) -> Result<(), QueryError> {
        let name = name.into();
        if name.is_empty() {
            return Err(QueryError::invalid_binding(name, "variable names cannot be empty"));
        }
        if name == CONTEXT_ITEM {
            return Err(QueryError::invalid_binding(
                name,
                "the context item cannot be bound explicitly",
            ));
        }
        self.locals.insert(name, binding);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.locals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locals.is_empty()
    }
}

#[derive(Debug)]
struct Frame {
    parent: Scope,
    locals: IndexMap<String, Binding>,
}

/// Handle to a frame in the scope chain. Cloning is cheap.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    frame: Option<Rc<Frame>>,
}

impl Scope {
    /// An empty root scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// A child scope holding `bindings`, shadowing same-named parent bindings.
    pub fn descendant(&self, bindings: Bindings) -> Scope {
        self.with_locals(bindings.locals)
    }

    /// Shorthand for a descendant with a single binding.
    pub fn bind(&self, name: impl Into<String>, binding: Binding) -> Result<Scope, QueryError> {
        let mut bindings = Bindings::new();
        bindings.insert(name, binding)?;
        Ok(self.descendant(bindings))
    }

    pub(crate) fn with_context_item(&self, value: Sequence) -> Scope {
        let mut locals = IndexMap::with_capacity(1);
        locals.insert(CONTEXT_ITEM.to_string(), Binding::Value(value));
        self.with_locals(locals)
    }

    fn with_locals(&self, locals: IndexMap<String, Binding>) -> Scope {
        Scope {
            frame: Some(Rc::new(Frame {
                parent: self.clone(),
                locals,
            })),
        }
    }

    pub fn parent(&self) -> Option<&Scope> {
        self.frame.as_ref().map(|frame| &frame.parent)
    }

    /// Resolves `name`, walking towards the root; the nearest binding wins.
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        let mut current = self;
        while let Some(frame) = &current.frame {
            if let Some(binding) = frame.locals.get(name) {
                return Some(binding);
            }
            current = &frame.parent;
        }
        None
    }

    /// Names bound directly in this frame, in binding order.
    pub fn keys(&self) -> Vec<&str> {
        match &self.frame {
            Some(frame) => frame.locals.keys().map(String::as_str).collect(),
            None => Vec::new(),
        }
    }

    /// The chain from the root to this scope, inclusive.
    pub fn hierarchy(&self) -> Vec<Scope> {
        let mut chain = vec![self.clone()];
        let mut current = self;
        while let Some(parent) = current.parent() {
            chain.push(parent.clone());
            current = parent;
        }
        chain.reverse();
        chain
    }

    /// Merges the whole chain into one root-level frame.
    pub fn flattened(&self) -> Scope {
        self.flattened_until(&Scope::new())
    }

    /// Merges every frame below `ancestor` into a single frame whose parent is
    /// `ancestor`. Deeper bindings win over shallower ones.
    ///
    /// If `ancestor` is not on the chain the whole chain is merged.
    pub fn flattened_until(&self, ancestor: &Scope) -> Scope {
        let mut frames = Vec::new();
        let mut current = self;
        while let Some(frame) = &current.frame {
            if current.is_same(ancestor) {
                break;
            }
            frames.push(frame);
            current = &frame.parent;
        }

        let mut merged = IndexMap::new();
        for frame in frames.into_iter().rev() {
            for (name, binding) in &frame.locals {
                merged.insert(name.clone(), binding.clone());
            }
        }
        ancestor.with_locals(merged)
    }

    /// Whether both handles point at the same frame.
    pub fn is_same(&self, other: &Scope) -> bool {
        match (&self.frame, &other.frame) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    pub fn depth(&self) -> usize {
        self.hierarchy().len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsiq_types::Item;

    fn value(n: i32) -> Binding {
        Binding::Value(Sequence::from_item(n))
    }

    fn number_of(scope: &Scope, name: &str) -> Option<f64> {
        match scope.lookup(name)? {
            Binding::Value(seq) => seq.number().ok(),
            Binding::Deferred { .. } => None,
        }
    }

    #[test]
    fn test_lookup_walks_up_and_shadows() {
        let root = Scope::new().bind("x", value(1)).unwrap();
        let child = root.bind("y", value(2)).unwrap();
        let shadow = child.bind("x", value(3)).unwrap();

        assert_eq!(number_of(&child, "x"), Some(1.0));
        assert_eq!(number_of(&child, "y"), Some(2.0));
        assert_eq!(number_of(&shadow, "x"), Some(3.0));
        assert_eq!(number_of(&root, "y"), None);
    }

    #[test]
    fn test_siblings_do_not_see_each_other() {
        let root = Scope::new().bind("x", value(1)).unwrap();
        let left = root.bind("l", value(2)).unwrap();
        let right = root.bind("r", value(3)).unwrap();
        assert!(left.lookup("r").is_none());
        assert!(right.lookup("l").is_none());
    }

    #[test]
    fn test_hierarchy_is_root_first() {
        let a = Scope::new().bind("a", value(1)).unwrap();
        let b = a.bind("b", value(2)).unwrap();
        let chain = b.hierarchy();
        assert_eq!(chain.len(), 3);
        assert!(chain[0].keys().is_empty());
        assert_eq!(chain[1].keys(), vec!["a"]);
        assert_eq!(chain[2].keys(), vec!["b"]);
        assert_eq!(b.depth(), 2);
    }

    #[test]
    fn test_flattened_merges_with_deepest_winning() {
        let scope = Scope::new()
            .bind("a", value(1))
            .unwrap()
            .bind("b", value(2))
            .unwrap()
            .bind("a", value(3))
            .unwrap();
        let flat = scope.flattened();
        let mut keys = flat.keys();
        keys.sort();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(number_of(&flat, "a"), Some(3.0));
        assert_eq!(flat.depth(), 1);
    }

    #[test]
    fn test_flattened_until_stops_at_ancestor() {
        let outer = Scope::new().bind("outer", value(1)).unwrap();
        let tuple = outer
            .bind("x", value(2))
            .unwrap()
            .bind("y", value(3))
            .unwrap();
        let flat = tuple.flattened_until(&outer);
        let mut keys = flat.keys();
        keys.sort();
        assert_eq!(keys, vec!["x", "y"]);
        assert!(flat.parent().is_some_and(|p| p.is_same(&outer)));
        assert_eq!(number_of(&flat, "outer"), Some(1.0));
    }

    #[test]
    fn test_reserved_and_empty_names_are_rejected() {
        let err = Scope::new().bind(CONTEXT_ITEM, value(1)).unwrap_err();
        assert!(matches!(err, QueryError::InvalidScopeBinding { .. }));
        let err = Scope::new().bind("", value(1)).unwrap_err();
        assert!(matches!(err, QueryError::InvalidScopeBinding { .. }));
    }

    #[test]
    fn test_context_item_binding() {
        let scope = Scope::new().with_context_item(Sequence::from_item(Item::from("ctx")));
        assert!(matches!(scope.lookup(CONTEXT_ITEM), Some(Binding::Value(_))));
    }
}
