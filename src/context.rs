//! Hierarchical, typed context store
//!
//! Every traversal level gets its own [`Context`], chained to the
//! context of the enclosing level. A context maps entry *kinds*
//! (Rust types) to values: at most one entry per type per context.
//! Entries are moved into the store and moved back out on removal;
//! they are never copied between levels.
//!
//! Lookups come in two flavors: [`Context::get`] inspects only the
//! receiving context, while [`Context::lookup`] walks the parent
//! chain so any descendant can see state installed by an ancestor.
//! Mutation (`set`/`remove`) only ever touches the receiving context,
//! which is what keeps sibling subtrees isolated from each other.
//!
//! The root of every chain is the program-level context, created once
//! per run; every other context lives for exactly one traversal step.

use fxhash::FxHashMap;
use std::any::{Any, TypeId};

/// A level-scoped, parent-linked, typed key-value store
#[derive(Default)]
pub struct Context<'a> {
    parent: Option<&'a Context<'a>>,
    entries: FxHashMap<TypeId, Box<dyn Any>>,
}

impl<'a> Context<'a> {
    /// Create a root context (no parent)
    pub fn new() -> Self {
        Self {
            parent: None,
            entries: FxHashMap::default(),
        }
    }

    /// Create a child context chained to `self`
    pub fn child(&self) -> Context<'_> {
        Context {
            parent: Some(self),
            entries: FxHashMap::default(),
        }
    }

    /// True for the program-level context at the top of the chain
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Walk parent pointers up to the root context
    pub fn root(&self) -> &Context<'a> {
        let mut current = self;
        while let Some(parent) = current.parent {
            current = parent;
        }
        current
    }

    /// Number of parent hops between this context and the root
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let Some(parent) = current.parent {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Store an entry under its own type, overwriting any existing
    /// entry of that type in this context
    pub fn set<T: Any>(&mut self, value: T) {
        self.entries.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Entry of type `T` in this context only, if present
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<T>())
    }

    /// Mutable entry of type `T` in this context only, if present
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.entries
            .get_mut(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_mut::<T>())
    }

    /// Remove the entry of type `T` from this context, transferring
    /// ownership back to the caller. Absent entries yield `None`.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.entries
            .remove(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    /// Nearest entry of type `T`, walking from this context up the
    /// parent chain
    pub fn lookup<T: Any>(&self) -> Option<&T> {
        let mut current = self;
        loop {
            if let Some(value) = current.get::<T>() {
                return Some(value);
            }
            match current.parent {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }
}
