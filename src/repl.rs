//! Interactive read‑eval‑print loop.

use std::io::{BufRead, Write};

use log::{debug, info};

use crate::environment::{Env, Environment};
use crate::error::{MonkeyError, Result, EXIT_PARSE_ERROR, EXIT_RUNTIME_ERROR};
use crate::evaluator::eval;
use crate::object::Object;
use crate::parser::parse;

pub const PROMPT: &str = ">> ";

/// Parse and evaluate one chunk of source against `env`.
///
/// Parse errors come back as [`MonkeyError::Parse`]; evaluation errors are
/// ordinary `Object::Error` values in the `Ok` arm.
pub fn run_source(source: &str, env: &Env) -> Result<Object> {
    let (program, errors) = parse(source);

    if !errors.is_empty() {
        return Err(MonkeyError::parse(errors));
    }

    Ok(eval(&program, env))
}

/// Process exit status for the outcome of running a whole script.
pub fn exit_code(outcome: &Result<Object>) -> i32 {
    match outcome {
        Ok(Object::Error(_)) => EXIT_RUNTIME_ERROR,
        Ok(_) => 0,
        Err(MonkeyError::Parse { .. }) => EXIT_PARSE_ERROR,
        Err(_) => 1,
    }
}

/// Run the loop until `input` is exhausted. Bindings persist across lines.
pub fn start<R: BufRead, W: Write>(input: R, mut output: W) -> Result<()> {
    info!("REPL started");

    let env: Env = Environment::new_shared();
    let mut lines = input.lines();

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        debug!("REPL line: {}", line);

        match run_source(&line, &env) {
            Ok(value) => writeln!(output, "{}", value)?,
            Err(MonkeyError::Parse { errors }) => {
                for msg in errors {
                    writeln!(output, "\t{}", msg)?;
                }
            }
            Err(e) => return Err(e),
        }
    }

    info!("REPL finished");

    Ok(())
}
