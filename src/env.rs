// ABOUTME: Environment module for managing variable bindings and scopes

use crate::error::LispError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new global environment with no parent
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Creates a new child frame bound to `bindings`, on top of `parent`.
    pub fn extend(parent: Rc<Environment>, bindings: Vec<(String, Value)>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(bindings.into_iter().collect()),
            parent: Some(parent),
        })
    }

    /// define: overwrite the cell if `name` already exists in this frame,
    /// otherwise add a fresh cell here. Never walks the parent chain.
    pub fn define(&self, name: String, value: Value) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// lookup: search frames innermost-first.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        if let Some(ref parent) = self.parent {
            return parent.get(name);
        }
        None
    }

    /// assign (`set!`): find the cell in the chain and overwrite it; no new
    /// binding is created.
    pub fn set(&self, name: &str, value: Value) -> Result<(), LispError> {
        if self.bindings.borrow().contains_key(name) {
            self.bindings.borrow_mut().insert(name.to_string(), value);
            return Ok(());
        }
        if let Some(ref parent) = self.parent {
            return parent.set(name, value);
        }
        Err(LispError::unbound_var(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn int(n: i64) -> Value {
        Value::Integer(BigInt::from(n))
    }

    #[test]
    fn test_define_and_get() {
        let env = Environment::new();
        env.define("x".to_string(), int(42));
        match env.get("x") {
            Some(Value::Integer(n)) => assert_eq!(n, BigInt::from(42)),
            _ => panic!("expected Integer(42)"),
        }
    }

    #[test]
    fn test_undefined_symbol() {
        let env = Environment::new();
        assert!(env.get("undefined").is_none());
    }

    #[test]
    fn test_define_in_innermost_frame_only() {
        let parent = Environment::new();
        parent.define("x".to_string(), int(1));

        let child = Environment::extend(parent.clone(), vec![]);
        child.define("x".to_string(), int(2));

        match child.get("x") {
            Some(Value::Integer(n)) => assert_eq!(n, BigInt::from(2)),
            _ => panic!("expected Integer(2)"),
        }
        match parent.get("x") {
            Some(Value::Integer(n)) => assert_eq!(n, BigInt::from(1)),
            _ => panic!("parent's own binding must be unaffected"),
        }
    }

    #[test]
    fn test_set_walks_the_chain() {
        let parent = Environment::new();
        parent.define("x".to_string(), int(1));
        let child = Environment::extend(parent.clone(), vec![]);

        child.set("x", int(99)).unwrap();

        match parent.get("x") {
            Some(Value::Integer(n)) => assert_eq!(n, BigInt::from(99)),
            _ => panic!("set! must update the binding found in an outer frame"),
        }
    }

    #[test]
    fn test_set_unbound_is_an_error() {
        let env = Environment::new();
        assert!(env.set("nope", int(1)).is_err());
    }

    #[test]
    fn test_extend_populates_fresh_frame() {
        let parent = Environment::new();
        let child = Environment::extend(parent, vec![("a".to_string(), int(1)), ("b".to_string(), int(2))]);
        assert!(matches!(child.get("a"), Some(Value::Integer(_))));
        assert!(matches!(child.get("b"), Some(Value::Integer(_))));
    }
}
