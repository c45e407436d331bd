// ABOUTME: Error types for parse and evaluation failures in the interpreter

use crate::value::Value;
use std::fmt;
use thiserror::Error;

/// A joined, `show`-style rendering of a found-args list, so `LispError`'s
/// `#[error(...)]` strings can interpolate it like any other `Display` field.
#[derive(Debug, Clone)]
pub struct ValueList(pub Vec<Value>);

impl fmt::Display for ValueList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", v)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone)]
pub enum LispError {
    #[error("Expected {expected} args; found values {found}")]
    NumArgs { expected: usize, found: ValueList },

    #[error("Invalid type: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: Value },

    #[error("Parse error: {detail}")]
    Parser { detail: String },

    #[error("{message}: {form}")]
    BadSpecialForm { message: String, form: Value },

    #[error("{message}: {name}")]
    NotFunction { message: String, name: String },

    #[error("{message}: {name}")]
    UnboundVar { message: String, name: String },

    #[error("{0}")]
    Default(String),
}

impl LispError {
    pub fn type_mismatch(expected: impl Into<String>, found: &Value) -> Self {
        LispError::TypeMismatch {
            expected: expected.into(),
            found: found.clone(),
        }
    }

    pub fn num_args(expected: usize, found: &[Value]) -> Self {
        LispError::NumArgs {
            expected,
            found: ValueList(found.to_vec()),
        }
    }

    pub fn unbound_var(name: impl Into<String>) -> Self {
        LispError::UnboundVar {
            message: "Getting an unbound variable".to_string(),
            name: name.into(),
        }
    }

    pub fn not_function(found: &Value) -> Self {
        LispError::NotFunction {
            message: "Value is not a function".to_string(),
            name: found.to_string(),
        }
    }

    pub fn bad_special_form(form: &Value) -> Self {
        LispError::BadSpecialForm {
            message: "Unrecognized special form".to_string(),
            form: form.clone(),
        }
    }
}
