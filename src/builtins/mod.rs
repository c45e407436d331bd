//! Built-in functions: the initial environment's primitive and IO table.
//!
//! - **arithmetic**: + - * / mod quotient remainder
//! - **comparison**: integer relations and string relations
//! - **logic**: && ||
//! - **types**: symbol? string? number? bool? list?
//! - **lists**: car cdr cons
//! - **equality**: eq? eqv? equal?
//! - **io**: apply, ports, read, write, read-contents, read-all

use crate::env::Environment;
use std::rc::Rc;

pub mod arithmetic;
pub mod comparison;
pub mod equality;
pub mod io;
pub mod lists;
pub mod logic;
pub mod types;

/// Populates `env` with every builtin in the initial environment.
pub fn register(env: &Rc<Environment>) {
    arithmetic::register(env);
    comparison::register(env);
    logic::register(env);
    types::register(env);
    lists::register(env);
    equality::register(env);
    io::register(env);
}
