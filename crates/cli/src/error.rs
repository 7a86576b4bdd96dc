//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: render error (bad dimensions, unknown layer, export failure)
//! - 11: I/O error (reading documents or assets, writing output)
//! - 12: input error (bad palette, color, style document or argument)
//! - 13: serialization error

use motif_core::MotifError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// A render-level error (bad dimensions, missing layer, worker failure).
    Render(MotifError),
    /// An I/O error (file read or write).
    Io(String),
    /// A user input error (bad palette name, malformed document or flag).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Render(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Render(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "{msg}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<MotifError> for CliError {
    fn from(e: MotifError) -> Self {
        match e {
            MotifError::Io(msg) => CliError::Io(msg),
            MotifError::Serialization(msg) => CliError::Serialization(msg),
            e @ (MotifError::InvalidColor(_)
            | MotifError::InvalidPalette(_)
            | MotifError::UnknownPalette(_)) => CliError::Input(e.to_string()),
            other => CliError::Render(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
