//! Host-owned binding containers shared with compiled code.
//!
//! Namespaces and closure cells are handles into storage the host mutates
//! freely after extraction. The bridge hands these handles to the backend so
//! generated code re-reads them on every call.

use std::sync::{Arc, RwLock};

use dashmap::DashMap;

use crate::val::Val;

/// Live, shared namespace (the defining scope's globals, or the process
/// builtins).
///
/// Cloning a `Namespace` clones the handle, not the bindings: every clone
/// observes the same storage, so a rebinding performed by the host after
/// unit extraction is visible to every later compiled call.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    slots: Arc<DashMap<String, Val>>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a namespace from initial bindings.
    pub fn from_bindings<I, K>(bindings: I) -> Self
    where
        I: IntoIterator<Item = (K, Val)>,
        K: Into<String>,
    {
        let ns = Self::new();
        for (name, val) in bindings {
            ns.set(name, val);
        }
        ns
    }

    pub fn get(&self, name: &str) -> Option<Val> {
        self.slots.get(name).map(|entry| entry.value().clone())
    }

    pub fn set(&self, name: impl Into<String>, val: Val) {
        self.slots.insert(name.into(), val);
    }

    pub fn remove(&self, name: &str) -> Option<Val> {
        self.slots.remove(name).map(|(_, val)| val)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Looks up `name` here first, then in the fallback namespace. This is
    /// the globals-then-builtins chain compiled code must follow.
    pub fn resolve(&self, fallback: &Namespace, name: &str) -> Option<Val> {
        self.get(name).or_else(|| fallback.get(name))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether two handles share the same underlying storage.
    pub fn shares_storage_with(&self, other: &Namespace) -> bool {
        Arc::ptr_eq(&self.slots, &other.slots)
    }
}

/// Shared mutable single-slot box implementing variable capture across
/// nested scopes.
///
/// The current value is read at call time, never cached at extraction time.
#[derive(Debug, Clone, Default)]
pub struct ClosureCell {
    slot: Arc<RwLock<Val>>,
}

impl ClosureCell {
    pub fn new(val: Val) -> Self {
        Self {
            slot: Arc::new(RwLock::new(val)),
        }
    }

    pub fn get(&self) -> Val {
        self.slot.read().unwrap().clone()
    }

    pub fn set(&self, val: Val) {
        *self.slot.write().unwrap() = val;
    }

    /// Whether two handles point at the same slot.
    pub fn shares_slot_with(&self, other: &ClosureCell) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}
