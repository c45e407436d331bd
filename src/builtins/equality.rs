//! Equality primitives: eq?, eqv?, equal?
//!
//! `eq?`/`eqv?` are structural equality restricted to the same variant.
//! `equal?` additionally tries the num/string/bool unpackers (the
//! existentially-quantified unpacker trick, hard-coded to three probes) and
//! treats a coercion failure as "not equal via this coercion" rather than
//! propagating the error.

use crate::env::Environment;
use crate::error::LispError;
use crate::number::{unpack_bool, unpack_num, unpack_str};
use crate::value::Value;
use std::rc::Rc;

fn normalize(v: &Value) -> Value {
    match v {
        Value::DottedList(head, tail) => {
            let mut items = head.clone();
            match tail.as_ref() {
                Value::List(rest) => items.extend(rest.clone()),
                other => items.push(other.clone()),
            }
            Value::List(items)
        }
        other => other.clone(),
    }
}

fn structural_eq(a: &Value, b: &Value) -> bool {
    match (normalize(a), normalize(b)) {
        (Value::Symbol(x), Value::Symbol(y)) => x == y,
        (Value::Integer(x), Value::Integer(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Ratio(x), Value::Ratio(y)) => x == y,
        (Value::Complex(x), Value::Complex(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Char(x), Value::Char(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::List(xs), Value::List(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(x, y)| structural_eq(x, y))
        }
        (Value::Vector(xs), Value::Vector(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(x, y)| structural_eq(x, y))
        }
        _ => false,
    }
}

fn coercible_eq(a: &Value, b: &Value) -> bool {
    match (normalize(a), normalize(b)) {
        (Value::List(xs), Value::List(ys)) => {
            return xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(x, y)| coercible_eq(x, y));
        }
        (Value::Vector(xs), Value::Vector(ys)) => {
            return xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(x, y)| coercible_eq(x, y));
        }
        _ => {}
    }
    if structural_eq(a, b) {
        return true;
    }
    if let (Ok(x), Ok(y)) = (unpack_num(a), unpack_num(b)) {
        if x == y {
            return true;
        }
    }
    if let (Ok(x), Ok(y)) = (unpack_str(a), unpack_str(b)) {
        if x == y {
            return true;
        }
    }
    if let (Ok(x), Ok(y)) = (unpack_bool(a), unpack_bool(b)) {
        if x == y {
            return true;
        }
    }
    false
}

pub fn builtin_eq(args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 2 {
        return Err(LispError::num_args(2, args));
    }
    Ok(Value::Bool(structural_eq(&args[0], &args[1])))
}

pub fn builtin_equal(args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 2 {
        return Err(LispError::num_args(2, args));
    }
    Ok(Value::Bool(coercible_eq(&args[0], &args[1])))
}

/// Registers `eq?`, `eqv?`, and `equal?` in the environment. `eq?` and
/// `eqv?` share one implementation, as the value model has no separate
/// notion of pointer identity vs. structural identity for atoms.
pub fn register(env: &Rc<Environment>) {
    env.define("eq?".to_string(), Value::PrimitiveFunc(builtin_eq));
    env.define("eqv?".to_string(), Value::PrimitiveFunc(builtin_eq));
    env.define("equal?".to_string(), Value::PrimitiveFunc(builtin_equal));
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn int(n: i64) -> Value {
        Value::Integer(BigInt::from(n))
    }

    #[test]
    fn test_eqv_is_false_across_variants() {
        // spec scenario 6
        assert!(matches!(
            builtin_eq(&[Value::String("2".to_string()), int(2)]),
            Ok(Value::Bool(false))
        ));
    }

    #[test]
    fn test_equal_coerces_string_and_integer() {
        // spec scenario 6
        assert!(matches!(
            builtin_equal(&[Value::String("2".to_string()), int(2)]),
            Ok(Value::Bool(true))
        ));
    }

    #[test]
    fn test_equal_recurses_into_lists() {
        let a = Value::List(vec![int(1), int(2)]);
        let b = Value::List(vec![int(1), int(2)]);
        assert!(matches!(builtin_equal(&[a, b]), Ok(Value::Bool(true))));
    }

    #[test]
    fn test_equal_recurses_with_coercion_not_just_eqv() {
        // each element pair is only equal via the num-coercion probe, not
        // via structural_eq, so the List arm must recurse into coercible_eq
        let a = Value::List(vec![Value::String("2".to_string()), Value::String("3".to_string())]);
        let b = Value::List(vec![int(2), int(3)]);
        assert!(matches!(builtin_equal(&[a, b]), Ok(Value::Bool(true))));
    }

    #[test]
    fn test_equal_normalizes_dotted_lists_with_list_tails() {
        let a = Value::DottedList(vec![int(1)], Box::new(Value::List(vec![int(2)])));
        let b = Value::List(vec![int(1), int(2)]);
        assert!(matches!(builtin_equal(&[a, b]), Ok(Value::Bool(true))));
    }

    #[test]
    fn test_wrong_arity_is_num_args() {
        assert!(matches!(builtin_eq(&[int(1)]), Err(LispError::NumArgs { expected: 2, .. })));
    }
}
