//! # go_bindata
//!
//! Embed binary assets (engines, helper executables, shared libraries) in Go
//! source and materialize them back into executable files when the program
//! starts.
//!
//! ## What it does
//!
//! - **Build time**: any byte blob is rendered as a compilable literal
//!   expression, safe for invalid UTF-8, NUL bytes, back-quotes and byte-order
//!   marks, together with its SHA-256 digest
//! - **Run time**: the embedded gzip payload is inflated and written to disk
//!   through a temporary file and an atomic rename, with the executable bit set
//!
//! ## Quick Start
//!
//! ```rust
//! use go_bindata::{encode, from_str, Digest};
//!
//! let encoded = encode(b"`hello`");
//! assert_eq!(encoded.literal, "(\"`\" + (`hello` + \"`\"))");
//! assert_eq!(encoded.digest, Digest::of(b"`hello`"));
//!
//! // The literal evaluates back to the original bytes
//! assert_eq!(from_str(&encoded.literal).unwrap(), b"`hello`");
//! ```
//!
//! ### Binary data
//!
//! Blobs that are not clean UTF-8 fall back to a fully escaped literal:
//!
//! ```rust
//! use go_bindata::{encode, ser::LiteralKind};
//!
//! let encoded = encode(b"\x7fELF\x02\x01\x00");
//! assert_eq!(encoded.kind, LiteralKind::Escaped);
//! assert_eq!(encoded.literal, r#""\x7fELF\x02\x01\x00""#);
//! ```
//!
//! ### Unpacking at startup
//!
//! ```rust
//! use go_bindata::{compress, materialize};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let target = dir.path().join("query-engine");
//!
//! materialize(&compress(b"abc", 6).unwrap(), &target).unwrap();
//! assert_eq!(std::fs::read(&target).unwrap(), b"abc");
//! ```
//!
//! ## Modules
//!
//! - [`ser`]: classification, delimiter-safe rendering, the [`Encoder`]
//! - [`de`]: the literal expression parser used to verify round trips
//! - [`chunk`]: delimiter splitting over byte ranges
//! - [`asset`]: [`Digest`] and [`AssetInfo`] metadata
//! - [`codegen`]: complete generated files with platform build constraints
//! - [`unpack`]: decompression and atomic materialization
//! - [`fetch`]: the retrieval interface and download pipeline
//! - [`format`]: description of the emitted source text
//!
//! ## Logging
//!
//! All events go through [`tracing`]; the library never installs a subscriber.

pub mod asset;
pub mod chunk;
pub mod codegen;
pub mod de;
pub mod error;
pub mod fetch;
pub mod format;
pub mod options;
pub mod ser;
pub mod unpack;

pub use asset::{AssetInfo, Digest};
pub use de::{from_str, Parser};
pub use error::{Error, Result};
pub use options::{Delimiter, EncodeOptions, UnpackOptions};
pub use ser::{encode, Encoded, Encoder};
pub use unpack::{
    bootstrap, bootstrap_with_options, compress, decompress, materialize,
    materialize_with_options,
};

use std::io;
use std::path::Path;

/// Encodes a blob with custom options.
///
/// # Examples
///
/// ```rust
/// use go_bindata::{decompress, encode_with_options, from_str, EncodeOptions};
///
/// let encoded = encode_with_options(b"abc", &EncodeOptions::new().with_compression(9)).unwrap();
/// let embedded = from_str(&encoded.literal).unwrap();
/// assert_eq!(decompress(&embedded).unwrap(), b"abc");
/// ```
///
/// # Errors
///
/// Returns an error only if compression fails.
pub fn encode_with_options(blob: &[u8], options: &EncodeOptions) -> Result<Encoded> {
    Encoder::new(options.clone()).encode(blob)
}

/// Encodes everything `reader` yields, hashing it as it streams through.
///
/// # Errors
///
/// Returns [`Error::SourceRead`] if reading fails.
pub fn encode_reader<R: io::Read>(reader: R) -> Result<Encoded> {
    Encoder::default().encode_reader(reader)
}

/// Encodes the file at `path`.
///
/// # Errors
///
/// Returns [`Error::SourceRead`] if the file cannot be opened or read.
pub fn encode_file<P: AsRef<Path>>(path: P) -> Result<Encoded> {
    Encoder::default().encode_file(path)
}

/// Writes the `var` declaration and metadata comment for an in-memory blob.
///
/// # Examples
///
/// ```rust
/// use go_bindata::{to_writer, EncodeOptions};
///
/// let mut out = Vec::new();
/// to_writer(&mut out, b"hi", &EncodeOptions::default()).unwrap();
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.starts_with("var data = []byte(`hi`)\n//func Data()"));
/// ```
///
/// # Errors
///
/// Returns an error if compression or writing fails.
pub fn to_writer<W: io::Write>(mut writer: W, blob: &[u8], options: &EncodeOptions) -> Result<()> {
    let encoded = encode_with_options(blob, options)?;
    codegen::write_declaration(&mut writer, &encoded, options)?;
    if options.metadata {
        let info = AssetInfo::new("bytes", encoded.size, encoded.digest);
        asset::write_metadata(&mut writer, &info)?;
    } else {
        writeln!(writer)?;
    }
    Ok(())
}
