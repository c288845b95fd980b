//! Lexically scoped environments.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::Value;

/// A shared handle to one scope in the environment chain.
///
/// Closures clone the handle, so a binding mutated after capture is seen
/// through every handle pointing at the same scope. The chain can become
/// cyclic through a function value stored in its own defining scope; those
/// cycles are never reclaimed, which is acceptable for a process-lifetime
/// interpreter.
#[derive(Clone)]
pub struct Env {
    scope: Rc<RefCell<Scope>>,
}

struct Scope {
    store: FxHashMap<String, Value>,
    outer: Option<Env>,
}

impl Env {
    /// A fresh top-level environment.
    pub fn new() -> Self {
        Env {
            scope: Rc::new(RefCell::new(Scope {
                store: FxHashMap::default(),
                outer: None,
            })),
        }
    }

    /// A new innermost scope whose lookups fall through to `outer`.
    pub fn enclosed(outer: &Env) -> Self {
        Env {
            scope: Rc::new(RefCell::new(Scope {
                store: FxHashMap::default(),
                outer: Some(outer.clone()),
            })),
        }
    }

    /// Resolve a name, walking outward through enclosing scopes.
    pub fn get(&self, name: &str) -> Option<Value> {
        let scope = self.scope.borrow();
        match scope.store.get(name) {
            Some(value) => Some(value.clone()),
            None => scope.outer.as_ref().and_then(|outer| outer.get(name)),
        }
    }

    /// Bind a name in this scope, shadowing any outer binding.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.scope.borrow_mut().store.insert(name.into(), value);
    }
}

impl Default for Env {
    fn default() -> Self {
        Env::new()
    }
}

// Values can close over this environment, so a derived Debug would chase
// the cycle; print the binding names only.
impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.scope.borrow();
        let mut names: Vec<&String> = scope.store.keys().collect();
        names.sort();
        f.debug_struct("Env")
            .field("names", &names)
            .field("has_outer", &scope.outer.is_some())
            .finish()
    }
}
