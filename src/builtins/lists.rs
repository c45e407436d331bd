//! Pair primitives: car, cdr, cons.

use crate::env::Environment;
use crate::error::LispError;
use crate::value::Value;
use std::rc::Rc;

pub fn builtin_car(args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 1 {
        return Err(LispError::num_args(1, args));
    }
    match &args[0] {
        Value::List(items) if !items.is_empty() => Ok(items[0].clone()),
        Value::DottedList(head, _) if !head.is_empty() => Ok(head[0].clone()),
        other => Err(LispError::type_mismatch("pair", other)),
    }
}

pub fn builtin_cdr(args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 1 {
        return Err(LispError::num_args(1, args));
    }
    match &args[0] {
        Value::List(items) if !items.is_empty() => Ok(Value::List(items[1..].to_vec())),
        Value::DottedList(head, tail) if head.len() == 1 => Ok((**tail).clone()),
        Value::DottedList(head, tail) if !head.is_empty() => {
            Ok(Value::DottedList(head[1..].to_vec(), tail.clone()))
        }
        other => Err(LispError::type_mismatch("pair", other)),
    }
}

pub fn builtin_cons(args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 2 {
        return Err(LispError::num_args(2, args));
    }
    let x = args[0].clone();
    match &args[1] {
        Value::List(items) if items.is_empty() => Ok(Value::List(vec![x])),
        Value::List(items) => {
            let mut head = vec![x];
            head.extend(items.clone());
            Ok(Value::List(head))
        }
        Value::DottedList(hs, t) => {
            let mut head = vec![x];
            head.extend(hs.clone());
            Ok(Value::DottedList(head, t.clone()))
        }
        other => Ok(Value::DottedList(vec![x], Box::new(other.clone()))),
    }
}

/// Registers all list builtins in the environment.
pub fn register(env: &Rc<Environment>) {
    env.define("car".to_string(), Value::PrimitiveFunc(builtin_car));
    env.define("cdr".to_string(), Value::PrimitiveFunc(builtin_cdr));
    env.define("cons".to_string(), Value::PrimitiveFunc(builtin_cons));
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn int(n: i64) -> Value {
        Value::Integer(BigInt::from(n))
    }

    #[test]
    fn test_car_of_proper_list() {
        assert!(matches!(builtin_car(&[Value::List(vec![int(1), int(2)])]), Ok(Value::Integer(n)) if n == BigInt::from(1)));
    }

    #[test]
    fn test_car_of_non_pair_is_type_mismatch() {
        assert!(matches!(builtin_car(&[int(1)]), Err(LispError::TypeMismatch { .. })));
    }

    #[test]
    fn test_cdr_of_singleton_list_is_empty_list() {
        match builtin_cdr(&[Value::List(vec![int(1)])]) {
            Ok(Value::List(items)) => assert!(items.is_empty()),
            other => panic!("expected empty list, got {:?}", other),
        }
    }

    #[test]
    fn test_cdr_of_singleton_dotted_list_returns_tail() {
        let dotted = Value::DottedList(vec![int(1)], Box::new(int(2)));
        assert!(matches!(builtin_cdr(&[dotted]), Ok(Value::Integer(n)) if n == BigInt::from(2)));
    }

    #[test]
    fn test_cons_onto_empty_list_makes_singleton() {
        match builtin_cons(&[int(1), Value::List(vec![])]) {
            Ok(Value::List(items)) => assert_eq!(items.len(), 1),
            other => panic!("expected singleton list, got {:?}", other),
        }
    }

    #[test]
    fn test_cons_onto_non_pair_makes_dotted_list() {
        // spec scenario 5: (cons 1 (cons 2 3)) prints (1 2 . 3)
        let inner = builtin_cons(&[int(2), int(3)]).unwrap();
        let outer = builtin_cons(&[int(1), inner]).unwrap();
        assert_eq!(outer.to_string(), "(1 2 . 3)");
    }

    #[test]
    fn test_cons_wrong_arity_is_num_args() {
        assert!(matches!(builtin_cons(&[int(1)]), Err(LispError::NumArgs { expected: 2, .. })));
    }
}
