// ABOUTME: CLI entry point — interactive REPL or file-mode program runner

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};
use scheme_core::env::Environment;
use scheme_core::eval::eval;
use scheme_core::parser::parse;
use scheme_core::value::Value;
use std::path::PathBuf;
use std::rc::Rc;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const PROMPT: &str = "Lisp>>> ";

/// A tree-walking interpreter for a subset of Scheme
#[derive(Parser, Debug)]
#[command(name = "scheme-core")]
#[command(version = VERSION)]
#[command(about = "A tree-walking Scheme interpreter")]
struct CliArgs {
    /// Program to run, followed by its arguments (bound under `args`). With
    /// no arguments at all, starts the interactive REPL.
    #[arg(value_name = "FILE")]
    rest: Vec<PathBuf>,
}

fn main() {
    let cli = CliArgs::parse();
    let env = Environment::new();
    scheme_core::builtins::register(&env);

    if cli.rest.is_empty() {
        run_repl(&env);
    } else {
        run_file(&env, &cli.rest);
    }
}

fn run_repl(env: &Rc<Environment>) {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl: Editor<(), _> = Editor::with_config(config).expect("failed to initialize REPL");

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                if line.trim() == "quit" {
                    break;
                }
                match parse(&line) {
                    Ok(expr) => match eval(env, &expr) {
                        Ok(result) => println!("{}", result),
                        Err(e) => eprintln!("Error: {}", e),
                    },
                    Err(e) => eprintln!("Parse error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }
}

fn run_file(env: &Rc<Environment>, rest: &[PathBuf]) {
    let program_path = rest[0].to_string_lossy().to_string();
    let extra_args = Value::List(
        rest[1..]
            .iter()
            .map(|p| Value::String(p.to_string_lossy().to_string()))
            .collect(),
    );
    env.define("args".to_string(), extra_args);

    let load_form = Value::List(vec![
        Value::Symbol("load".to_string()),
        Value::String(program_path),
    ]);

    match eval(env, &load_form) {
        Ok(result) => eprintln!("{}", result),
        Err(e) => eprintln!("Error: {}", e),
    }
}
