use crate::language::ast::Identifier;
use crate::runtime::{
    error::{RuntimeError, RuntimeResult},
    value::Value,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

struct Scope {
    bindings: HashMap<String, Value>,
    enclosing: Option<Environment>,
}

/// A lexical scope and the chain of scopes enclosing it.
///
/// Cloning an `Environment` shares the scope rather than copying its
/// bindings: a write through one handle is seen through every other handle,
/// which is what lets closures observe later mutations of captured variables.
/// The enclosing link is set at construction and never changes.
#[derive(Clone)]
pub struct Environment {
    scope: Rc<RefCell<Scope>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Creates a root (global) environment.
    pub fn new() -> Self {
        Self::from_scope(None)
    }

    pub fn with_enclosing(enclosing: &Environment) -> Self {
        Self::from_scope(Some(enclosing.clone()))
    }

    fn from_scope(enclosing: Option<Environment>) -> Self {
        Self {
            scope: Rc::new(RefCell::new(Scope {
                bindings: HashMap::new(),
                enclosing,
            })),
        }
    }

    /// Binds `name` in this scope only, replacing any existing local binding.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.scope.borrow_mut().bindings.insert(name.into(), value);
    }

    pub fn get(&self, name: &Identifier) -> RuntimeResult<Value> {
        let scope = self.scope.borrow();
        if let Some(value) = scope.bindings.get(&name.name) {
            return Ok(value.clone());
        }
        match &scope.enclosing {
            Some(enclosing) => enclosing.get(name),
            None => Err(undefined(name)),
        }
    }

    /// Overwrites the binding in the nearest scope that owns `name`.
    /// Never creates a binding.
    pub fn assign(&self, name: &Identifier, value: Value) -> RuntimeResult<()> {
        let mut scope = self.scope.borrow_mut();
        if let Some(slot) = scope.bindings.get_mut(&name.name) {
            *slot = value;
            return Ok(());
        }
        match &scope.enclosing {
            Some(enclosing) => enclosing.assign(name, value),
            None => Err(undefined(name)),
        }
    }

    pub fn enclosing(&self) -> Option<Environment> {
        self.scope.borrow().enclosing.clone()
    }

    pub fn is_global(&self) -> bool {
        self.scope.borrow().enclosing.is_none()
    }

    pub fn contains_local(&self, name: &str) -> bool {
        self.scope.borrow().bindings.contains_key(name)
    }

    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.scope, &other.scope)
    }
}

fn undefined(name: &Identifier) -> RuntimeError {
    RuntimeError::UndefinedVariable {
        name: name.name.clone(),
        span: name.span,
    }
}

// Bindings may hold functions whose closure is this very scope, so only
// names and depth are printed.
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.scope.borrow();
        let mut names: Vec<&String> = scope.bindings.keys().collect();
        names.sort();
        let mut depth = 0;
        let mut cursor = scope.enclosing.clone();
        while let Some(environment) = cursor {
            depth += 1;
            cursor = environment.enclosing();
        }
        f.debug_struct("Environment")
            .field("bindings", &names)
            .field("depth", &depth)
            .finish()
    }
}
