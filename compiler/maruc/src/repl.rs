//! The interactive session.
//!
//! Each line is parsed and evaluated on its own, but all lines share one
//! environment, so bindings persist across inputs. Errors are printed and
//! the session continues; `exit` ends it.

use std::env;
use std::io::{self, BufRead, Write};

use maru_eval::{Env, Evaluator};

const PROMPT: &str = ">>> ";

pub fn run() -> io::Result<()> {
    let user = env::var("USER").unwrap_or_else(|_| "there".to_string());
    println!("{}", greeting(&user));
    println!("Feel free to type in commands. Type \"exit\" to leave.");

    let stdin = io::stdin();
    start(stdin.lock(), io::stdout())
}

/// The session banner, with the first letter of the name capitalized.
fn greeting(user: &str) -> String {
    let mut chars = user.chars();
    let name: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "There".to_string(),
    };
    format!("Hello {name}! This is the Maru programming language!")
}

/// Drive the read-eval-print loop over arbitrary streams.
pub fn start(input: impl BufRead, mut output: impl Write) -> io::Result<()> {
    let evaluator = Evaluator::new();
    let env = Env::new();

    let mut lines = input.lines();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;
        if line.trim() == "exit" {
            return Ok(());
        }

        let (program, errors) = maru_parse::parse(&line);
        if !errors.is_empty() {
            for error in &errors {
                writeln!(output, "{error}")?;
            }
            continue;
        }

        // Statements without a value (a lone `let`) print nothing.
        if let Some(value) = evaluator.eval_program(&program, &env) {
            writeln!(output, "{}", value.inspect())?;
        }
    }
}
