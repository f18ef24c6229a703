//! Error types for Cast parsing and writing.

use thiserror::Error;

use crate::PropertyType;

/// Errors that can occur when loading, building or saving Cast files.
#[derive(Debug, Error)]
pub enum Error {
    /// The file does not start with the `cast` magic.
    #[error("invalid Cast magic: expected 0x74736163, got {actual:#010x}")]
    BadMagic { actual: u32 },

    /// A record declared more bytes, values, properties or children than remain.
    #[error("unexpected end of stream")]
    UnexpectedEndOfStream,

    /// A property carries a type tag outside the supported set.
    #[error("unsupported property type {:?}", tag_text(.tag))]
    UnsupportedType { tag: [u8; 2] },

    /// A property name does not fit the 16-bit length field.
    #[error("property name is {len} bytes, the format allows at most 65535")]
    NameTooLong { len: usize },

    /// A property holds more values than the 32-bit count field can describe.
    #[error("property holds {count} values, the format allows at most 4294967295")]
    TooManyValues { count: usize },

    /// A string value contains a NUL byte, which would end it early on disk.
    #[error("string property {name:?} contains a NUL byte")]
    InteriorNul { name: String },

    /// The file holds more roots than the 32-bit header count can describe.
    #[error("file holds {count} root nodes, the format allows at most 4294967295")]
    TooManyRoots { count: usize },

    /// A node subtree does not fit the 32-bit size field.
    #[error("node subtree is {len} bytes, the format allows at most 4294967295")]
    NodeTooLarge { len: u64 },

    /// A value was added to a property of a different type.
    #[error("type mismatch: property is {expected}, value is {actual}")]
    TypeMismatch {
        expected: PropertyType,
        actual: PropertyType,
    },

    /// I/O error from the underlying source or sink.
    #[error("I/O error: {0}")]
    Io(std::io::Error),
}

impl Error {
    /// The file is not a Cast file at all.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::BadMagic { .. })
    }

    /// The file is a Cast file but its records are malformed.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedEndOfStream | Self::UnsupportedType { .. }
        )
    }

    /// The in-memory tree cannot be represented on disk.
    pub fn is_encode_error(&self) -> bool {
        matches!(
            self,
            Self::NameTooLong { .. }
                | Self::TooManyValues { .. }
                | Self::InteriorNul { .. }
                | Self::TooManyRoots { .. }
                | Self::NodeTooLarge { .. }
        )
    }
}

impl From<cast_common::Error> for Error {
    fn from(err: cast_common::Error) -> Self {
        match err {
            cast_common::Error::UnexpectedEof => Self::UnexpectedEndOfStream,
            cast_common::Error::Io(e) => Self::Io(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        cast_common::Error::from(err).into()
    }
}

fn tag_text(tag: &[u8; 2]) -> String {
    String::from_utf8_lossy(tag).trim_end_matches('\0').to_string()
}

/// Result type for Cast operations.
pub type Result<T> = std::result::Result<T, Error>;
