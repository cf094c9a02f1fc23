use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StretchError {
    #[error("Malformed block index on line {line}: '{value}'")]
    MalformedIndex { line: usize, value: String },
    #[error("Malformed timing line on line {line}: {reason}")]
    MalformedTimestamp { line: usize, reason: String },
    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}
