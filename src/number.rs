// ABOUTME: Shared numeric-tower helpers used by the parser and the arithmetic primitives

use crate::error::LispError;
use crate::value::Value;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use std::str::FromStr;

/// Coerces `v` to an `Integer` the way the arithmetic primitives do:
/// `Integer` passes through, a `String` that parses as an integer is
/// accepted, and a single-element `List` is unwrapped recursively.
pub fn unpack_num(v: &Value) -> Result<BigInt, LispError> {
    match v {
        Value::Integer(n) => Ok(n.clone()),
        Value::String(s) => {
            BigInt::from_str(s.trim()).map_err(|_| LispError::type_mismatch("number", v))
        }
        Value::List(items) if items.len() == 1 => unpack_num(&items[0]),
        _ => Err(LispError::type_mismatch("number", v)),
    }
}

/// Coerces `v` to a `bool`; only `Bool` is accepted.
pub fn unpack_bool(v: &Value) -> Result<bool, LispError> {
    match v {
        Value::Bool(b) => Ok(*b),
        _ => Err(LispError::type_mismatch("bool", v)),
    }
}

/// Coerces `v` to its printed form the way string comparisons do: `String`
/// passes through its contents, `Integer`/`Bool` are coerced via `show`.
pub fn unpack_str(v: &Value) -> Result<String, LispError> {
    match v {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(_) | Value::Bool(_) => Ok(v.to_string()),
        _ => Err(LispError::type_mismatch("string", v)),
    }
}

pub fn bigint_to_f64(n: &BigInt) -> f64 {
    n.to_f64().unwrap_or(f64::NAN)
}
