//! Command-line error type.

use std::io;

/// Errors surfaced to the user by the `tipc` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Usage text, printed verbatim.
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Netlink(#[from] tipclink::Error),

    /// Writing results to stdout failed.
    #[error("writing output: {0}")]
    Output(#[from] io::Error),
}

impl CliError {
    /// `2` for usage and argument validation failures, `1` otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage(_) => 2,
            CliError::Netlink(e) if e.is_invalid_argument() => 2,
            _ => 1,
        }
    }

    /// Whether the message already is complete usage text.
    pub fn is_usage(&self) -> bool {
        matches!(self, CliError::Usage(_))
    }
}
