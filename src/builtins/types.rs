//! Unary type predicates: symbol?, string?, number?, bool?, list?
//!
//! Every predicate here must reject any non-1 arity with `NumArgs 1` — the
//! design notes flag the source's `unaryOp` as missing that arm.

use crate::env::Environment;
use crate::error::LispError;
use crate::value::Value;
use std::rc::Rc;

fn unary(args: &[Value], pred: impl Fn(&Value) -> bool) -> Result<Value, LispError> {
    if args.len() != 1 {
        return Err(LispError::num_args(1, args));
    }
    Ok(Value::Bool(pred(&args[0])))
}

pub fn builtin_symbol_p(args: &[Value]) -> Result<Value, LispError> {
    unary(args, |v| matches!(v, Value::Symbol(_)))
}

pub fn builtin_string_p(args: &[Value]) -> Result<Value, LispError> {
    unary(args, |v| matches!(v, Value::String(_)))
}

pub fn builtin_number_p(args: &[Value]) -> Result<Value, LispError> {
    unary(args, |v| {
        matches!(v, Value::Integer(_) | Value::Float(_) | Value::Ratio(_) | Value::Complex(_))
    })
}

pub fn builtin_bool_p(args: &[Value]) -> Result<Value, LispError> {
    unary(args, |v| matches!(v, Value::Bool(_)))
}

pub fn builtin_list_p(args: &[Value]) -> Result<Value, LispError> {
    unary(args, Value::is_pair_like)
}

/// Registers all type predicate builtins in the environment.
pub fn register(env: &Rc<Environment>) {
    env.define("symbol?".to_string(), Value::PrimitiveFunc(builtin_symbol_p));
    env.define("string?".to_string(), Value::PrimitiveFunc(builtin_string_p));
    env.define("number?".to_string(), Value::PrimitiveFunc(builtin_number_p));
    env.define("bool?".to_string(), Value::PrimitiveFunc(builtin_bool_p));
    env.define("list?".to_string(), Value::PrimitiveFunc(builtin_list_p));
}
