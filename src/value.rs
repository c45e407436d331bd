// ABOUTME: Value types representing Scheme data structures and expressions

use crate::env::Environment;
use num_bigint::BigInt;
use num_complex::Complex64;
use num_rational::BigRational;
use std::fmt;
use std::rc::Rc;

pub type PrimitiveFn = fn(&[Value]) -> Result<Value, crate::error::LispError>;
pub type IOFn = fn(&[Value]) -> Result<Value, crate::error::LispError>;

/// A Scheme runtime value.
///
/// `List` and `DottedList` both store their head elements in a flat `Vec`;
/// a `DottedList`'s tail is never itself a `List` — `Value::dotted` below
/// normalizes that invariant at construction time by splicing instead.
#[derive(Debug, Clone)]
pub enum Value {
    Symbol(String),
    Integer(BigInt),
    Float(f64),
    Ratio(BigRational),
    Complex(Complex64),
    Bool(bool),
    Char(char),
    String(String),
    List(Vec<Value>),
    DottedList(Vec<Value>, Box<Value>),
    Vector(Rc<Vec<Value>>),
    PrimitiveFunc(PrimitiveFn),
    IOFunc(IOFn),
    Closure {
        params: Rc<Vec<String>>,
        vararg: Option<String>,
        body: Rc<Vec<Value>>,
        env: Rc<Environment>,
    },
    Port(crate::builtins::io::Port),
}

impl Value {
    /// Builds a dotted list from `head` and `tail`, splicing `tail` into the
    /// head sequence when it is itself a proper list, so a `DottedList`'s
    /// tail is never a `List`.
    pub fn dotted(mut head: Vec<Value>, tail: Value) -> Value {
        match tail {
            Value::List(mut items) => {
                head.append(&mut items);
                Value::List(head)
            }
            other if head.is_empty() => other,
            other => Value::DottedList(head, Box::new(other)),
        }
    }

    pub fn complex(re: f64, im: f64) -> Value {
        Value::Complex(Complex64::new(re, im))
    }

    pub fn is_pair_like(&self) -> bool {
        matches!(self, Value::List(_) | Value::DottedList(_, _))
    }
}

fn show_char(c: char) -> String {
    match c {
        ' ' => "#\\space".to_string(),
        '\n' => "#\\newline".to_string(),
        other => format!("#\\{}", other),
    }
}

fn show_string_escaped(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Symbol(s) => write!(f, "{}", s),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Ratio(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            Value::Complex(c) => {
                if c.im.is_sign_negative() {
                    write!(f, "{}{}i", c.re, c.im)
                } else {
                    write!(f, "{}+{}i", c.re, c.im)
                }
            }
            Value::Bool(b) => write!(f, "{}", if *b { "#t" } else { "#f" }),
            Value::Char(c) => write!(f, "{}", show_char(*c)),
            Value::String(s) => write!(f, "{}", show_string_escaped(s)),
            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Value::DottedList(head, tail) => {
                write!(f, "(")?;
                for item in head {
                    write!(f, "{} ", item)?;
                }
                write!(f, ". {})", tail)
            }
            Value::Vector(items) => {
                write!(f, "#(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Value::PrimitiveFunc(_) | Value::IOFunc(_) => write!(f, "<primitive>"),
            Value::Closure { params, vararg, .. } => {
                write!(f, "(lambda (")?;
                write!(f, "{}", params.join(" "))?;
                if let Some(v) = vararg {
                    if !params.is_empty() {
                        write!(f, " ")?;
                    }
                    write!(f, ". {}", v)?;
                }
                write!(f, ") ...)")
            }
            Value::Port(_) => write!(f, "<IO port>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_display() {
        assert_eq!(Value::Integer(BigInt::from(42)).to_string(), "42");
        assert_eq!(Value::Integer(BigInt::from(-7)).to_string(), "-7");
    }

    #[test]
    fn test_bool_display() {
        assert_eq!(Value::Bool(true).to_string(), "#t");
        assert_eq!(Value::Bool(false).to_string(), "#f");
    }

    #[test]
    fn test_list_display() {
        let v = Value::List(vec![
            Value::Integer(BigInt::from(1)),
            Value::Integer(BigInt::from(2)),
            Value::Integer(BigInt::from(3)),
        ]);
        assert_eq!(v.to_string(), "(1 2 3)");
        assert_eq!(Value::List(vec![]).to_string(), "()");
    }

    #[test]
    fn test_dotted_list_display() {
        let v = Value::dotted(
            vec![Value::Integer(BigInt::from(1)), Value::Integer(BigInt::from(2))],
            Value::Integer(BigInt::from(3)),
        );
        assert_eq!(v.to_string(), "(1 2 . 3)");
    }

    #[test]
    fn test_dotted_with_list_tail_splices_into_proper_list() {
        let inner = Value::dotted(
            vec![Value::Integer(BigInt::from(2))],
            Value::List(vec![Value::Integer(BigInt::from(3))]),
        );
        assert_eq!(inner.to_string(), "(2 3)");
        assert!(matches!(inner, Value::List(_)));
    }

    #[test]
    fn test_string_display_escapes() {
        let v = Value::String("say \"hi\"\n".to_string());
        assert_eq!(v.to_string(), "\"say \\\"hi\\\"\\n\"");
    }

    #[test]
    fn test_char_display() {
        assert_eq!(Value::Char(' ').to_string(), "#\\space");
        assert_eq!(Value::Char('\n').to_string(), "#\\newline");
        assert_eq!(Value::Char('a').to_string(), "#\\a");
    }

    #[test]
    fn test_closure_display_shows_params_no_body() {
        let env = Environment::new();
        let v = Value::Closure {
            params: Rc::new(vec!["x".to_string(), "y".to_string()]),
            vararg: Some("rest".to_string()),
            body: Rc::new(vec![Value::Symbol("x".to_string())]),
            env,
        };
        assert_eq!(v.to_string(), "(lambda (x y . rest) ...)");
    }
}
