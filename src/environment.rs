use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::trace;

use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;

/// Shared handle to a scope. Closures and blocks may hold the same parent.
pub type EnvRef = Rc<RefCell<Environment>>;

/// One lexical scope: bindings plus an optional link to the enclosing scope.
/// The global scope is the only one without a parent.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Wrap into a shareable handle.
    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    /// Bind (or rebind) `name` in this scope.
    pub fn define(&mut self, name: &str, value: Value) {
        trace!("define '{}'", name);
        self.values.insert(name.to_string(), value);
    }

    /// Look `name` up, walking outward until found.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(undefined(name))
        }
    }

    /// Assign to an existing binding, walking outward until found.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined(name))
        }
    }
}

/// The scope exactly `distance` links outward from `env`.
///
/// The resolver only records distances that exist, so running off the chain
/// means the tree and the resolution map disagree.
pub fn ancestor(env: &EnvRef, distance: usize) -> Option<EnvRef> {
    let mut current: EnvRef = Rc::clone(env);

    for _ in 0..distance {
        let next: EnvRef = current.borrow().enclosing.clone()?;
        current = next;
    }

    Some(current)
}

/// Read `name` from the scope `distance` hops out.
pub fn get_at(env: &EnvRef, distance: usize, name: &Token) -> Result<Value> {
    let scope: EnvRef = ancestor(env, distance).ok_or_else(|| undefined(name))?;
    let value: Option<Value> = scope.borrow().values.get(&name.lexeme).cloned();

    value.ok_or_else(|| undefined(name))
}

/// Like [`get_at`] for names that never appear in source (`this`, `super`).
pub fn get_named_at(env: &EnvRef, distance: usize, name: &str) -> Option<Value> {
    let scope: EnvRef = ancestor(env, distance)?;
    let value: Option<Value> = scope.borrow().values.get(name).cloned();

    value
}

/// Write `name` in the scope `distance` hops out.
pub fn assign_at(env: &EnvRef, distance: usize, name: &Token, value: Value) -> Result<()> {
    let scope: EnvRef = ancestor(env, distance).ok_or_else(|| undefined(name))?;
    scope.borrow_mut().define(&name.lexeme, value);

    Ok(())
}

fn undefined(name: &Token) -> LoxError {
    LoxError::runtime(name.line, format!("Undefined variable '{}'.", name.lexeme))
}
