//! Error type for the driver surfaces (CLI, REPL, file loading).
//!
//! The language itself reports problems through two other channels: parse
//! errors are a list of messages returned by the parser, and evaluation
//! errors are `Object::Error` values. This type only wraps those where a
//! driver needs a Rust `Result`, plus the I/O failures around them.
//!
//! The module **does not** print diagnostics itself

use std::io;
use thiserror::Error;

use log::info;

/// Exit status when the input could not be parsed (`EX_DATAERR`).
pub const EXIT_PARSE_ERROR: i32 = 65;

/// Exit status when a program evaluated to an error object (`EX_SOFTWARE`).
pub const EXIT_RUNTIME_ERROR: i32 = 70;

/// Canonical driver error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MonkeyError {
    /// The source did not parse; messages are in the order they were found.
    #[error("{}", errors.join("\n"))]
    Parse { errors: Vec<String> },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl MonkeyError {
    /// Helper constructor for a failed parse.
    pub fn parse(errors: Vec<String>) -> Self {
        info!("Creating Parse error with {} message(s)", errors.len());

        MonkeyError::Parse { errors }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, MonkeyError>;
