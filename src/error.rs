//! Error types for encoding, parsing and materializing embedded assets.
//!
//! ## Error Categories
//!
//! - **Build time**: [`Error::SourceRead`], [`Error::Fetch`], [`Error::Io`] and the
//!   internal [`Error::Encode`] invariant check
//! - **Run time**: [`Error::Decode`], [`Error::Materialize`] and [`Error::Integrity`]
//! - **Verification**: [`Error::Syntax`] from the literal expression parser
//! - **Caller input**: [`Error::InvalidInput`] for malformed digests and identifiers
//!
//! Run-time errors are unrecoverable for the hosting program. They are still
//! returned as values from [`crate::materialize`]; only [`crate::bootstrap`]
//! turns them into a fatal panic.
//!
//! ## Examples
//!
//! ```rust
//! use go_bindata::{from_str, Error};
//!
//! let result = from_str("(`abc` + ");
//! assert!(matches!(result, Err(Error::Syntax { .. })));
//! ```

use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Represents all possible errors raised while embedding or unpacking an asset.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The asset source could not be opened, stat'ed or read
    #[error("cannot read asset source {path}: {reason}")]
    SourceRead { path: String, reason: String },

    /// Internal encoder invariant was violated
    #[error("encode invariant violated: {0}")]
    Encode(String),

    /// The compressed payload could not be inflated
    #[error("decode failed: {0}")]
    Decode(String),

    /// The decoded asset could not be placed on disk
    #[error("cannot materialize {path}: {reason}")]
    Materialize { path: String, reason: String },

    /// Decoded bytes do not hash to the expected digest
    #[error("integrity check failed: expected sha256 {expected}, found {actual}")]
    Integrity { expected: String, actual: String },

    /// The upstream retrieval collaborator failed
    #[error("cannot fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// A caller-supplied value is malformed
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Malformed literal expression
    #[error("Syntax error at line {line}, column {col}: {msg}")]
    Syntax { line: usize, col: usize, msg: String },

    /// IO error while writing generated source
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Creates a source read error for the given path.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use go_bindata::Error;
    ///
    /// let err = Error::source_read("engine.gz", "no such file");
    /// assert!(err.to_string().contains("engine.gz"));
    /// ```
    pub fn source_read<P: AsRef<Path>, T: fmt::Display>(path: P, reason: T) -> Self {
        Error::SourceRead {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn encode<T: fmt::Display>(msg: T) -> Self {
        Error::Encode(msg.to_string())
    }

    pub fn invalid_input<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidInput(msg.to_string())
    }

    pub fn decode<T: fmt::Display>(msg: T) -> Self {
        Error::Decode(msg.to_string())
    }

    /// Creates a materialize error for the given destination.
    pub fn materialize<P: AsRef<Path>, T: fmt::Display>(path: P, reason: T) -> Self {
        Error::Materialize {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates an integrity error from the two hex-rendered digests.
    pub fn integrity(expected: &str, actual: &str) -> Self {
        Error::Integrity {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub fn fetch<T: fmt::Display>(url: &str, reason: T) -> Self {
        Error::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a syntax error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use go_bindata::Error;
    ///
    /// let err = Error::syntax(3, 7, "unterminated raw literal");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates an I/O error for generated source writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns true for errors that abort the hosting process when raised at startup.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Decode(_) | Error::Materialize { .. } | Error::Integrity { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
