//! Chained name → type scopes.
//!
//! An `Env` is a cheap handle to one scope. Cloning it shares the scope;
//! `child()` opens a new scope whose lookups fall back to the parent.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::ast::types::Type;

#[derive(Debug, Clone, Default)]
pub struct Env(Rc<Scope>);

#[derive(Debug, Default)]
struct Scope {
    bindings: RefCell<HashMap<String, Type>>,
    parent: Option<Env>,
}

impl Env {
    pub fn new() -> Self {
        Env::default()
    }

    pub fn child(&self) -> Env {
        Env(Rc::new(Scope {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(self.clone()),
        }))
    }

    /// Looks `name` up in this scope, then in each ancestor.
    pub fn get(&self, name: &str) -> Option<Type> {
        if let Some(ty) = self.0.bindings.borrow().get(name) {
            return Some(ty.clone());
        }

        self.0.parent.as_ref().and_then(|parent| parent.get(name))
    }

    /// Binds `name` in this scope only.
    pub fn set(&self, name: &str, ty: Type) {
        self.0.bindings.borrow_mut().insert(name.to_string(), ty);
    }

    pub fn has_local(&self, name: &str) -> bool {
        self.0.bindings.borrow().contains_key(name)
    }
}
