//! The `maru` command: runs a script file, or starts the REPL when
//! invoked without arguments.

mod repl;

use std::env;
use std::fs;
use std::process::ExitCode;

use maru_eval::{Env, Evaluator};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        None => match repl::run() {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("maru: {error}");
                ExitCode::FAILURE
            }
        },
        Some("--help" | "-h") => {
            println!("usage: maru [script]");
            println!();
            println!("Without a script, starts an interactive session.");
            ExitCode::SUCCESS
        }
        Some(path) => run_file(path),
    }
}

/// Run a script. The value of the last statement, if any, is printed to
/// stdout; syntax and runtime errors go to stderr and fail the process.
fn run_file(path: &str) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("maru: cannot read {path}: {error}");
            return ExitCode::FAILURE;
        }
    };

    let (program, errors) = maru_parse::parse(&source);
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("{path}:{error}");
        }
        return ExitCode::FAILURE;
    }

    let evaluator = Evaluator::new();
    let env = Env::new();
    match evaluator.eval_program(&program, &env) {
        Some(value) if value.is_error() => {
            eprintln!("{}", value.inspect());
            ExitCode::FAILURE
        }
        Some(value) => {
            println!("{}", value.inspect());
            ExitCode::SUCCESS
        }
        None => ExitCode::SUCCESS,
    }
}
