use crate::object::Object;
use log::trace;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Shared handle to a scope. Closures keep their defining scope alive
/// through one of these.
pub type Env = Rc<RefCell<Environment>>;

/// One lexical scope: local bindings plus an optional link outward.
#[derive(Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Env>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            store: HashMap::new(),
            outer: None,
        }
    }

    pub fn new_enclosed(outer: Env) -> Self {
        Environment {
            store: HashMap::new(),
            outer: Some(outer),
        }
    }

    /// Fresh top‑level scope behind a shared handle.
    pub fn new_shared() -> Env {
        Environment::new().into_shared()
    }

    pub fn into_shared(self) -> Env {
        Rc::new(RefCell::new(self))
    }

    /// Look `name` up here, then in each enclosing scope in turn.
    pub fn get(&self, name: &str) -> Option<Object> {
        if let Some(value) = self.store.get(name) {
            Some(value.clone())
        } else if let Some(outer) = &self.outer {
            trace!("'{}' not local, searching enclosing scope", name);
            outer.borrow().get(name)
        } else {
            None
        }
    }

    /// Bind `name` in this scope, shadowing any outer binding.
    pub fn set(&mut self, name: &str, value: Object) {
        self.store.insert(name.to_string(), value);
    }

    /// Number of bindings held locally (enclosing scopes excluded).
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Drop every local binding. The link outward is kept.
    pub fn clear(&mut self) {
        self.store.clear();
    }
}

/// Whether `scope` can still be reached from `value`, i.e. through a
/// function it holds, that function's captured scope chain, or anything
/// bound along that chain.
pub fn reaches(value: &Object, scope: &Env) -> bool {
    let mut pending: Vec<Env> = Vec::new();
    let mut seen: HashSet<*const RefCell<Environment>> = HashSet::new();

    if let Object::Function(func) = value {
        pending.push(Rc::clone(&func.env));
    }

    while let Some(env) = pending.pop() {
        if Rc::ptr_eq(&env, scope) {
            return true;
        }

        if !seen.insert(Rc::as_ptr(&env)) {
            continue;
        }

        let env = env.borrow();

        pending.extend(env.outer.iter().cloned());
        pending.extend(env.store.values().filter_map(|bound| match bound {
            Object::Function(func) => Some(Rc::clone(&func.env)),
            _ => None,
        }));
    }

    false
}
