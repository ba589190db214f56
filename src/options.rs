//! Configuration for encoding and unpacking.
//!
//! - [`Delimiter`]: byte sequences that cannot appear inside a raw literal
//! - [`EncodeOptions`]: build-time code generation settings
//! - [`UnpackOptions`]: run-time materialization settings
//!
//! ## Examples
//!
//! ```rust
//! use go_bindata::{EncodeOptions, UnpackOptions};
//!
//! let options = EncodeOptions::new()
//!     .with_package("engines")
//!     .with_compression(9);
//! assert!(options.compress);
//!
//! let unpack = UnpackOptions::new().with_mode(0o700);
//! assert_eq!(unpack.mode, 0o700);
//! ```

use crate::asset::Digest;

/// A member of the delimiter set.
///
/// Each delimiter is a byte sequence that cannot be written verbatim inside a
/// back-quoted raw literal, together with the interpreted literal that stands
/// in for it.
///
/// # Examples
///
/// ```rust
/// use go_bindata::Delimiter;
///
/// assert_eq!(Delimiter::Backquote.as_bytes(), b"`");
/// assert_eq!(Delimiter::Bom.escaped(), r#""\xEF\xBB\xBF""#);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// The raw literal quote itself
    Backquote,
    /// UTF-8 byte-order mark, rejected by the target compiler inside source text
    Bom,
    /// Carriage return, silently dropped from raw literals by the target compiler
    CarriageReturn,
}

impl Delimiter {
    /// All delimiters, in the order the encoder splits on them.
    pub const ALL: [Delimiter; 3] = [
        Delimiter::Backquote,
        Delimiter::Bom,
        Delimiter::CarriageReturn,
    ];

    #[must_use]
    pub const fn as_bytes(&self) -> &'static [u8] {
        match self {
            Delimiter::Backquote => b"`",
            Delimiter::Bom => b"\xEF\xBB\xBF",
            Delimiter::CarriageReturn => b"\r",
        }
    }

    /// Returns the interpreted literal that evaluates to this delimiter.
    #[must_use]
    pub const fn escaped(&self) -> &'static str {
        match self {
            Delimiter::Backquote => "\"`\"",
            Delimiter::Bom => "\"\\xEF\\xBB\\xBF\"",
            Delimiter::CarriageReturn => "\"\\r\"",
        }
    }
}

/// Build-time settings for generated source files.
///
/// # Examples
///
/// ```rust
/// use go_bindata::EncodeOptions;
///
/// let options = EncodeOptions::default();
/// assert_eq!(options.package, "binaries");
/// assert_eq!(options.variable, "data");
/// assert!(!options.compress);
/// ```
#[derive(Clone, Debug)]
pub struct EncodeOptions {
    /// Package clause of the generated file
    pub package: String,
    /// Name of the byte slice variable holding the literal
    pub variable: String,
    /// Import path of the package providing the runtime unpacker
    pub unpack_import: String,
    /// Gzip the blob before encoding it
    pub compress: bool,
    /// Gzip level, 0 through 9
    pub compression_level: u32,
    /// Emit the trailing metadata comment
    pub metadata: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            package: "binaries".to_string(),
            variable: "data".to_string(),
            unpack_import: "github.com/steebchen/go-binaries/unpack".to_string(),
            compress: false,
            compression_level: 6,
            metadata: true,
        }
    }
}

impl EncodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_package(mut self, package: &str) -> Self {
        self.package = package.to_string();
        self
    }

    #[must_use]
    pub fn with_variable(mut self, variable: &str) -> Self {
        self.variable = variable.to_string();
        self
    }

    #[must_use]
    pub fn with_unpack_import(mut self, import: &str) -> Self {
        self.unpack_import = import.to_string();
        self
    }

    /// Enables gzip compression of the blob at the given level (clamped to 9).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use go_bindata::EncodeOptions;
    ///
    /// let options = EncodeOptions::new().with_compression(12);
    /// assert_eq!(options.compression_level, 9);
    /// ```
    #[must_use]
    pub fn with_compression(mut self, level: u32) -> Self {
        self.compress = true;
        self.compression_level = level.min(9);
        self
    }

    #[must_use]
    pub fn without_metadata(mut self) -> Self {
        self.metadata = false;
        self
    }
}

/// Run-time settings for [`crate::materialize_with_options`].
#[derive(Clone, Debug)]
pub struct UnpackOptions {
    /// Permission bits of the materialized file
    pub mode: u32,
    /// Digest the decompressed bytes must hash to
    pub expected_digest: Option<Digest>,
    /// Create missing parent directories of the target
    pub create_dirs: bool,
}

impl Default for UnpackOptions {
    fn default() -> Self {
        UnpackOptions {
            mode: 0o755,
            expected_digest: None,
            create_dirs: true,
        }
    }
}

impl UnpackOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    /// Requires the decompressed bytes to hash to `digest`.
    #[must_use]
    pub fn with_digest(mut self, digest: Digest) -> Self {
        self.expected_digest = Some(digest);
        self
    }

    #[must_use]
    pub fn without_create_dirs(mut self) -> Self {
        self.create_dirs = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_escapes_are_quoted() {
        for delimiter in Delimiter::ALL {
            let escaped = delimiter.escaped();
            assert!(escaped.starts_with('"') && escaped.ends_with('"'));
            assert!(!escaped.contains('`') || delimiter == Delimiter::Backquote);
        }
    }

    #[test]
    fn test_unpack_defaults() {
        let options = UnpackOptions::default();
        assert_eq!(options.mode, 0o755);
        assert!(options.expected_digest.is_none());
        assert!(options.create_dirs);
    }
}
