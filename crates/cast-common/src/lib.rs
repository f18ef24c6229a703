//! Common utilities for Cast.
//!
//! This crate provides the stream primitives shared by the Cast crates:
//!
//! - [`CastReadExt`] - Sequential little-endian reads from any [`std::io::BufRead`]
//! - [`CastWriteExt`] - The matching writes for any [`std::io::Write`]
//! - [`Error`] - Stream errors, with end-of-stream split out from other I/O failures

mod error;
mod stream;

pub use error::{Error, Result};
pub use stream::{CastReadExt, CastWriteExt};
