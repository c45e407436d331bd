//! Arithmetic primitives: +, -, *, /, mod, quotient, remainder
//!
//! Per the numeric-tower note in the design notes: the parser accepts
//! floats/ratios/complex as values, but these operators only bind integers.
//! Non-integer operands are a `TypeMismatch`, not a silent coercion.

use crate::env::Environment;
use crate::error::LispError;
use crate::number::unpack_num;
use crate::value::Value;
use num_bigint::BigInt;
use num_traits::Zero;
use std::rc::Rc;

fn fold(args: &[Value], init: BigInt, op: impl Fn(&BigInt, &BigInt) -> BigInt) -> Result<Value, LispError> {
    if args.len() < 2 {
        return Err(LispError::num_args(2, args));
    }
    let mut acc = init;
    for arg in args {
        acc = op(&acc, &unpack_num(arg)?);
    }
    Ok(Value::Integer(acc))
}

pub fn builtin_add(args: &[Value]) -> Result<Value, LispError> {
    if args.len() < 2 {
        return Err(LispError::num_args(2, args));
    }
    let mut acc = BigInt::zero();
    for arg in args {
        acc += unpack_num(arg)?;
    }
    Ok(Value::Integer(acc))
}

pub fn builtin_sub(args: &[Value]) -> Result<Value, LispError> {
    if args.len() < 2 {
        return Err(LispError::num_args(2, args));
    }
    let mut acc = unpack_num(&args[0])?;
    for arg in &args[1..] {
        acc -= unpack_num(arg)?;
    }
    Ok(Value::Integer(acc))
}

pub fn builtin_mul(args: &[Value]) -> Result<Value, LispError> {
    fold(args, BigInt::from(1), |a, b| a * b)
}

fn check_nonzero_divisor(n: &BigInt) -> Result<(), LispError> {
    if n.is_zero() {
        Err(LispError::Default("Division by zero".to_string()))
    } else {
        Ok(())
    }
}

pub fn builtin_div(args: &[Value]) -> Result<Value, LispError> {
    if args.len() < 2 {
        return Err(LispError::num_args(2, args));
    }
    let mut acc = unpack_num(&args[0])?;
    for arg in &args[1..] {
        let d = unpack_num(arg)?;
        check_nonzero_divisor(&d)?;
        acc /= d;
    }
    Ok(Value::Integer(acc))
}

pub fn builtin_mod(args: &[Value]) -> Result<Value, LispError> {
    if args.len() < 2 {
        return Err(LispError::num_args(2, args));
    }
    let mut acc = unpack_num(&args[0])?;
    for arg in &args[1..] {
        let d = unpack_num(arg)?;
        check_nonzero_divisor(&d)?;
        acc = ((acc % &d) + &d) % &d;
    }
    Ok(Value::Integer(acc))
}

pub fn builtin_quotient(args: &[Value]) -> Result<Value, LispError> {
    if args.len() < 2 {
        return Err(LispError::num_args(2, args));
    }
    let mut acc = unpack_num(&args[0])?;
    for arg in &args[1..] {
        let d = unpack_num(arg)?;
        check_nonzero_divisor(&d)?;
        acc /= d;
    }
    Ok(Value::Integer(acc))
}

pub fn builtin_remainder(args: &[Value]) -> Result<Value, LispError> {
    if args.len() < 2 {
        return Err(LispError::num_args(2, args));
    }
    let mut acc = unpack_num(&args[0])?;
    for arg in &args[1..] {
        let d = unpack_num(arg)?;
        check_nonzero_divisor(&d)?;
        acc %= d;
    }
    Ok(Value::Integer(acc))
}

/// Registers all arithmetic builtins in the environment.
pub fn register(env: &Rc<Environment>) {
    env.define("+".to_string(), Value::PrimitiveFunc(builtin_add));
    env.define("-".to_string(), Value::PrimitiveFunc(builtin_sub));
    env.define("*".to_string(), Value::PrimitiveFunc(builtin_mul));
    env.define("/".to_string(), Value::PrimitiveFunc(builtin_div));
    env.define("mod".to_string(), Value::PrimitiveFunc(builtin_mod));
    env.define("quotient".to_string(), Value::PrimitiveFunc(builtin_quotient));
    env.define("remainder".to_string(), Value::PrimitiveFunc(builtin_remainder));
}
