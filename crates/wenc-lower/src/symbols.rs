//! Symbol table
//!
//! Tracks every binding the lowerer has declared, with its coarse type tag.
//! Lookups are by name; iteration preserves declaration order so diagnostics
//! and tests stay deterministic.

use crate::ir::Type;
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct SymbolTable {
    by_name: FxHashMap<String, Type>,
    order: Vec<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding. Re-registering updates the type tag in place and
    /// keeps the original declaration position.
    pub fn insert(&mut self, name: &str, ty: Type) {
        if self.by_name.insert(name.to_string(), ty).is_none() {
            self.order.push(name.to_string());
        }
    }

    pub fn get(&self, name: &str) -> Option<Type> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// True if `name` is bound and tagged as a function.
    pub fn is_function(&self, name: &str) -> bool {
        self.get(name) == Some(Type::Function)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
