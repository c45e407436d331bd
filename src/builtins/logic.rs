//! Boolean binary operators: &&, ||. Only `Bool` operands are accepted — no
//! truthiness coercion, and (unlike `and`/`or` in full Scheme) these are
//! fixed 2-argument primitives rather than short-circuiting special forms.

use crate::env::Environment;
use crate::error::LispError;
use crate::number::unpack_bool;
use crate::value::Value;
use std::rc::Rc;

pub fn builtin_and(args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 2 {
        return Err(LispError::num_args(2, args));
    }
    let a = unpack_bool(&args[0])?;
    let b = unpack_bool(&args[1])?;
    Ok(Value::Bool(a && b))
}

pub fn builtin_or(args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 2 {
        return Err(LispError::num_args(2, args));
    }
    let a = unpack_bool(&args[0])?;
    let b = unpack_bool(&args[1])?;
    Ok(Value::Bool(a || b))
}

/// Registers the boolean binop builtins in the environment.
pub fn register(env: &Rc<Environment>) {
    env.define("&&".to_string(), Value::PrimitiveFunc(builtin_and));
    env.define("||".to_string(), Value::PrimitiveFunc(builtin_or));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_requires_both_true() {
        assert!(matches!(builtin_and(&[Value::Bool(true), Value::Bool(true)]), Ok(Value::Bool(true))));
        assert!(matches!(builtin_and(&[Value::Bool(true), Value::Bool(false)]), Ok(Value::Bool(false))));
    }

    #[test]
    fn test_or_requires_either_true() {
        assert!(matches!(builtin_or(&[Value::Bool(false), Value::Bool(true)]), Ok(Value::Bool(true))));
        assert!(matches!(builtin_or(&[Value::Bool(false), Value::Bool(false)]), Ok(Value::Bool(false))));
    }

    #[test]
    fn test_non_bool_operand_is_type_mismatch() {
        use num_bigint::BigInt;
        assert!(matches!(
            builtin_and(&[Value::Integer(BigInt::from(1)), Value::Bool(true)]),
            Err(LispError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_wrong_arity_is_num_args() {
        assert!(matches!(builtin_and(&[Value::Bool(true)]), Err(LispError::NumArgs { expected: 2, .. })));
    }
}
