//! Error types for cast-common.

use std::io;

use thiserror::Error;

/// Common error type for Cast stream operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The stream ended before a record was complete.
    #[error("unexpected end of stream")]
    UnexpectedEof,

    /// I/O error other than stream exhaustion.
    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => Self::UnexpectedEof,
            _ => Self::Io(err),
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
