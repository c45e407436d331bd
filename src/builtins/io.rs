//! Effectful primitives: apply, port open/close, read, write, read-contents, read-all.
//!
//! Ports wrap the OS file handle behind a shared, clonable handle so `write`
//! calls on the same port value (however many copies float around the
//! environment) all append to the same underlying file in call order.

use crate::env::Environment;
use crate::error::LispError;
use crate::eval::apply as eval_apply;
use crate::value::Value;
use std::cell::RefCell;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write as _};
use std::rc::Rc;

pub enum PortHandle {
    Stdin,
    Stdout,
    Stderr,
    InputFile(BufReader<File>),
    OutputFile(File),
    Closed,
}

impl fmt::Debug for PortHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PortHandle")
    }
}

/// An I/O handle. Cloning a `Port` shares the same underlying handle —
/// closing one clone closes all of them.
#[derive(Debug, Clone)]
pub struct Port(pub Rc<RefCell<PortHandle>>);

impl Port {
    fn new(handle: PortHandle) -> Self {
        Port(Rc::new(RefCell::new(handle)))
    }
}

pub fn builtin_apply(args: &[Value]) -> Result<Value, LispError> {
    if args.len() < 2 {
        return Err(LispError::num_args(2, args));
    }
    let callee = &args[0];
    let mut call_args = args[1..args.len() - 1].to_vec();
    match &args[args.len() - 1] {
        Value::List(rest) => call_args.extend(rest.clone()),
        other => return Err(LispError::type_mismatch("list", other)),
    }
    eval_apply(callee, &call_args)
}

pub fn builtin_open_input_file(args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 1 {
        return Err(LispError::num_args(1, args));
    }
    let path = match &args[0] {
        Value::String(s) => s,
        other => return Err(LispError::type_mismatch("string", other)),
    };
    let file = File::open(path).map_err(|e| LispError::Default(format!("could not open {}: {}", path, e)))?;
    Ok(Value::Port(Port::new(PortHandle::InputFile(BufReader::new(file)))))
}

pub fn builtin_open_output_file(args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 1 {
        return Err(LispError::num_args(1, args));
    }
    let path = match &args[0] {
        Value::String(s) => s,
        other => return Err(LispError::type_mismatch("string", other)),
    };
    let file = File::create(path).map_err(|e| LispError::Default(format!("could not create {}: {}", path, e)))?;
    Ok(Value::Port(Port::new(PortHandle::OutputFile(file))))
}

fn close_port(args: &[Value]) -> Value {
    if args.len() != 1 {
        return Value::Bool(false);
    }
    match &args[0] {
        Value::Port(p) => {
            *p.0.borrow_mut() = PortHandle::Closed;
            Value::Bool(true)
        }
        _ => Value::Bool(false),
    }
}

pub fn builtin_close_input_port(args: &[Value]) -> Result<Value, LispError> {
    Ok(close_port(args))
}

pub fn builtin_close_output_port(args: &[Value]) -> Result<Value, LispError> {
    Ok(close_port(args))
}

fn read_line_from(handle: &mut PortHandle) -> Result<String, LispError> {
    let mut line = String::new();
    match handle {
        PortHandle::Stdin => {
            io::stdin()
                .lock()
                .read_line(&mut line)
                .map_err(|e| LispError::Default(e.to_string()))?;
        }
        PortHandle::InputFile(reader) => {
            reader.read_line(&mut line).map_err(|e| LispError::Default(e.to_string()))?;
        }
        PortHandle::Closed => return Err(LispError::Default("read from closed port".to_string())),
        _ => return Err(LispError::type_mismatch("input port", &Value::Bool(false))),
    }
    Ok(line)
}

pub fn builtin_read(args: &[Value]) -> Result<Value, LispError> {
    if args.len() > 1 {
        return Err(LispError::num_args(1, args));
    }
    let line = match args.first() {
        None => read_line_from(&mut PortHandle::Stdin)?,
        Some(Value::Port(p)) => {
            let mut handle = p.0.borrow_mut();
            read_line_from(&mut handle)?
        }
        Some(other) => return Err(LispError::type_mismatch("port", other)),
    };
    crate::parser::parse(line.trim_end())
}

fn write_to(handle: &mut PortHandle, text: &str) -> Result<(), LispError> {
    match handle {
        PortHandle::Stdout => {
            print!("{}", text);
            io::stdout().flush().ok();
        }
        PortHandle::Stderr => {
            eprint!("{}", text);
        }
        PortHandle::OutputFile(file) => {
            file.write_all(text.as_bytes()).map_err(|e| LispError::Default(e.to_string()))?;
        }
        PortHandle::Closed => return Err(LispError::Default("write to closed port".to_string())),
        _ => return Err(LispError::type_mismatch("output port", &Value::Bool(false))),
    }
    Ok(())
}

pub fn builtin_write(args: &[Value]) -> Result<Value, LispError> {
    if args.is_empty() || args.len() > 2 {
        return Err(LispError::num_args(1, args));
    }
    let text = args[0].to_string();
    match args.get(1) {
        None => write_to(&mut PortHandle::Stdout, &text)?,
        Some(Value::Port(p)) => {
            let mut handle = p.0.borrow_mut();
            write_to(&mut handle, &text)?;
        }
        Some(other) => return Err(LispError::type_mismatch("port", other)),
    }
    Ok(Value::Bool(true))
}

pub fn builtin_read_contents(args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 1 {
        return Err(LispError::num_args(1, args));
    }
    let path = match &args[0] {
        Value::String(s) => s,
        other => return Err(LispError::type_mismatch("string", other)),
    };
    let mut contents = String::new();
    File::open(path)
        .and_then(|mut f| f.read_to_string(&mut contents))
        .map_err(|e| LispError::Default(format!("could not read {}: {}", path, e)))?;
    Ok(Value::String(contents))
}

pub fn builtin_read_all(args: &[Value]) -> Result<Value, LispError> {
    if args.len() != 1 {
        return Err(LispError::num_args(1, args));
    }
    let path = match &args[0] {
        Value::String(s) => s,
        other => return Err(LispError::type_mismatch("string", other)),
    };
    let contents = std::fs::read_to_string(path)
        .map_err(|e| LispError::Default(format!("could not read {}: {}", path, e)))?;
    let exprs = crate::parser::parse_program(&contents)?;
    Ok(Value::List(exprs))
}

/// Registers all effectful builtins in the environment.
pub fn register(env: &Rc<Environment>) {
    env.define("apply".to_string(), Value::IOFunc(builtin_apply));
    env.define("open-input-file".to_string(), Value::IOFunc(builtin_open_input_file));
    env.define("open-output-file".to_string(), Value::IOFunc(builtin_open_output_file));
    env.define("close-input-port".to_string(), Value::IOFunc(builtin_close_input_port));
    env.define("close-output-port".to_string(), Value::IOFunc(builtin_close_output_port));
    env.define("read".to_string(), Value::IOFunc(builtin_read));
    env.define("write".to_string(), Value::IOFunc(builtin_write));
    env.define("read-contents".to_string(), Value::IOFunc(builtin_read_contents));
    env.define("read-all".to_string(), Value::IOFunc(builtin_read_all));
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn test_close_on_non_port_returns_false() {
        assert!(matches!(close_port(&[Value::Bool(true)]), Value::Bool(false)));
    }

    #[test]
    fn test_close_on_port_returns_true() {
        let port = Value::Port(Port::new(PortHandle::Stdout));
        assert!(matches!(close_port(&[port]), Value::Bool(true)));
    }

    #[test]
    fn test_apply_with_plain_arg_list() {
        let f = Value::PrimitiveFunc(crate::builtins::arithmetic::builtin_add);
        let args = vec![f, Value::Integer(BigInt::from(1)), Value::List(vec![Value::Integer(BigInt::from(2))])];
        assert!(matches!(builtin_apply(&args), Ok(Value::Integer(n)) if n == BigInt::from(3)));
    }

    #[test]
    fn test_apply_last_arg_must_be_list() {
        let f = Value::PrimitiveFunc(crate::builtins::arithmetic::builtin_add);
        let args = vec![f, Value::Integer(BigInt::from(1)), Value::Integer(BigInt::from(2))];
        assert!(matches!(builtin_apply(&args), Err(LispError::TypeMismatch { .. })));
    }

    #[test]
    fn test_read_contents_on_missing_file_is_default_error() {
        assert!(matches!(
            builtin_read_contents(&[Value::String("/nonexistent/path/xyz".to_string())]),
            Err(LispError::Default(_))
        ));
    }
}
