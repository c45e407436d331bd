//! Comparison primitives: integer relations = < > /= >= <=, and string relations.

use crate::env::Environment;
use crate::error::LispError;
use crate::number::{unpack_num, unpack_str};
use crate::value::Value;
use std::rc::Rc;

fn num_cmp(args: &[Value], op: impl Fn(&num_bigint::BigInt, &num_bigint::BigInt) -> bool) -> Result<Value, LispError> {
    if args.len() != 2 {
        return Err(LispError::num_args(2, args));
    }
    let a = unpack_num(&args[0])?;
    let b = unpack_num(&args[1])?;
    Ok(Value::Bool(op(&a, &b)))
}

pub fn builtin_num_eq(args: &[Value]) -> Result<Value, LispError> {
    num_cmp(args, |a, b| a == b)
}

pub fn builtin_lt(args: &[Value]) -> Result<Value, LispError> {
    num_cmp(args, |a, b| a < b)
}

pub fn builtin_gt(args: &[Value]) -> Result<Value, LispError> {
    num_cmp(args, |a, b| a > b)
}

pub fn builtin_ne(args: &[Value]) -> Result<Value, LispError> {
    num_cmp(args, |a, b| a != b)
}

pub fn builtin_ge(args: &[Value]) -> Result<Value, LispError> {
    num_cmp(args, |a, b| a >= b)
}

pub fn builtin_le(args: &[Value]) -> Result<Value, LispError> {
    num_cmp(args, |a, b| a <= b)
}

fn str_cmp(args: &[Value], op: impl Fn(&str, &str) -> bool) -> Result<Value, LispError> {
    if args.len() != 2 {
        return Err(LispError::num_args(2, args));
    }
    let a = unpack_str(&args[0])?;
    let b = unpack_str(&args[1])?;
    Ok(Value::Bool(op(&a, &b)))
}

pub fn builtin_string_eq(args: &[Value]) -> Result<Value, LispError> {
    str_cmp(args, |a, b| a == b)
}

pub fn builtin_string_lt(args: &[Value]) -> Result<Value, LispError> {
    str_cmp(args, |a, b| a < b)
}

pub fn builtin_string_gt(args: &[Value]) -> Result<Value, LispError> {
    str_cmp(args, |a, b| a > b)
}

pub fn builtin_string_le(args: &[Value]) -> Result<Value, LispError> {
    str_cmp(args, |a, b| a <= b)
}

pub fn builtin_string_ge(args: &[Value]) -> Result<Value, LispError> {
    str_cmp(args, |a, b| a >= b)
}

/// Registers all comparison builtins in the environment.
pub fn register(env: &Rc<Environment>) {
    env.define("=".to_string(), Value::PrimitiveFunc(builtin_num_eq));
    env.define("<".to_string(), Value::PrimitiveFunc(builtin_lt));
    env.define(">".to_string(), Value::PrimitiveFunc(builtin_gt));
    env.define("/=".to_string(), Value::PrimitiveFunc(builtin_ne));
    env.define(">=".to_string(), Value::PrimitiveFunc(builtin_ge));
    env.define("<=".to_string(), Value::PrimitiveFunc(builtin_le));

    env.define("string=?".to_string(), Value::PrimitiveFunc(builtin_string_eq));
    env.define("string<?".to_string(), Value::PrimitiveFunc(builtin_string_lt));
    env.define("string>?".to_string(), Value::PrimitiveFunc(builtin_string_gt));
    env.define("string<=?".to_string(), Value::PrimitiveFunc(builtin_string_le));
    env.define("string>=?".to_string(), Value::PrimitiveFunc(builtin_string_ge));
}
