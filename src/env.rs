// ABOUTME: Environment module for managing variable bindings and scopes

use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

struct Binding {
    name: String,
    value: Value,
    is_const: bool,
}

pub struct Environment {
    bindings: RefCell<Vec<Binding>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new global environment with no parent
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(Vec::new()),
            parent: None,
        })
    }

    /// Creates a new child environment with a parent
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(Vec::new()),
            parent: Some(parent),
        })
    }

    /// Defines a binding in THIS scope, overwriting any existing binding of the
    /// same name in this frame (doesn't walk the parent chain).
    pub fn define(&self, name: String, value: Value, is_const: bool) {
        let mut bindings = self.bindings.borrow_mut();
        if let Some(b) = bindings.iter_mut().find(|b| b.name == name) {
            b.value = value;
            b.is_const = is_const;
        } else {
            bindings.push(Binding { name, value, is_const });
        }
    }

    /// Looks up a symbol in THIS scope and parent scopes recursively
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(b) = self.bindings.borrow().iter().find(|b| b.name == name) {
            return Some(b.value.clone());
        }

        if let Some(ref parent) = self.parent {
            return parent.get(name);
        }

        None
    }

    /// Assigns to the nearest enclosing binding that already exists. If no binding
    /// exists anywhere in the chain, defines a new non-const binding in THIS (the
    /// caller's current) frame instead.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), String> {
        if self.try_assign(name, &value)? {
            return Ok(());
        }
        self.define(name.to_string(), value, false);
        Ok(())
    }

    fn try_assign(&self, name: &str, value: &Value) -> Result<bool, String> {
        {
            let mut bindings = self.bindings.borrow_mut();
            if let Some(b) = bindings.iter_mut().find(|b| b.name == name) {
                if b.is_const {
                    return Err(format!("cannot assign to const binding '{}'", name));
                }
                b.value = value.clone();
                return Ok(true);
            }
        }
        match &self.parent {
            Some(parent) => parent.try_assign(name, value),
            None => Ok(false),
        }
    }

    /// All bindings visible in this frame alone, in declaration order. Used by the
    /// REPL's `vars` command.
    pub fn local_bindings(&self) -> Vec<(String, Value)> {
        self.bindings.borrow().iter().map(|b| (b.name.clone(), b.value.clone())).collect()
    }
}
