//! Content digest and provenance metadata of an embedded asset.
//!
//! - [`Digest`]: SHA-256 of a source blob
//! - [`AssetInfo`]: size, permission bits, modification time and digest
//! - [`write_metadata`]: renders an [`AssetInfo`] as an inert comment block
//!
//! The comment block is documentation only. Nothing parses it back; the
//! unpacker verifies against a [`Digest`] passed in explicitly.
//!
//! ## Examples
//!
//! ```rust
//! use go_bindata::Digest;
//!
//! let digest = Digest::of(b"hello");
//! assert_eq!(
//!     digest.to_hex(),
//!     "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
//! );
//! ```

use crate::ser::quote_escaped;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as _, Sha256};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::time::UNIX_EPOCH;

/// A SHA-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; Digest::SIZE]);

impl Digest {
    pub const SIZE: usize = 32;

    /// Hashes `bytes` in one call.
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        Digest(Sha256::digest(bytes).into())
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; Digest::SIZE]) -> Self {
        Digest(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; Digest::SIZE] {
        &self.0
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses a 64 character hex string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the input is not hex or has the wrong length.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| Error::invalid_input(format!("invalid digest: {e}")))?;
        let bytes: [u8; Digest::SIZE] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| Error::invalid_input(format!("digest has {} bytes", v.len())))?;
        Ok(Digest(bytes))
    }

    /// Renders the digest as a fixed-size Go array literal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use go_bindata::Digest;
    ///
    /// let literal = Digest::from_bytes([0; 32]).to_go_array();
    /// assert!(literal.starts_with("[32]uint8{0x0, 0x0,"));
    /// ```
    #[must_use]
    pub fn to_go_array(&self) -> String {
        let mut out = String::with_capacity(16 + self.0.len() * 6);
        out.push_str("[32]uint8{");
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&format!("{byte:#x}"));
        }
        out.push('}');
        out
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Digest::from_hex(&s).map_err(de::Error::custom)
    }
}

/// Provenance of an embedded asset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub name: String,
    /// Size of the source blob
    pub size: u64,
    /// POSIX permission bits
    pub mode: u32,
    pub mod_time: DateTime<Utc>,
    pub digest: Digest,
}

impl AssetInfo {
    /// Describes an in-memory blob with no file behind it.
    #[must_use]
    pub fn new(name: &str, size: u64, digest: Digest) -> Self {
        AssetInfo {
            name: name.to_string(),
            size,
            mode: 0o644,
            mod_time: DateTime::<Utc>::from(UNIX_EPOCH),
            digest,
        }
    }

    /// Describes the file at `path`, taking size, mode and modification time from its metadata.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceRead`] if the file cannot be stat'ed.
    pub fn stat<P: AsRef<Path>>(name: &str, path: P, digest: Digest) -> Result<Self> {
        let path = path.as_ref();
        let meta = fs::metadata(path).map_err(|e| Error::source_read(path, e))?;
        let modified = meta.modified().map_err(|e| Error::source_read(path, e))?;

        Ok(AssetInfo {
            name: name.to_string(),
            size: meta.len(),
            mode: permission_bits(&meta),
            mod_time: DateTime::<Utc>::from(modified),
            digest,
        })
    }

    #[must_use]
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_mod_time(mut self, mod_time: DateTime<Utc>) -> Self {
        self.mod_time = mod_time;
        self
    }
}

#[cfg(unix)]
fn permission_bits(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(meta: &fs::Metadata) -> u32 {
    if meta.permissions().readonly() {
        0o444
    } else {
        0o666
    }
}

// Octal in the target language's notation: a bare leading zero.
fn octal(mode: u32) -> String {
    if mode == 0 {
        "0".to_string()
    } else {
        format!("0{mode:o}")
    }
}

/// Writes the trailing metadata comment for `info`.
///
/// Every emitted line starts with `//`, so the block never compiles into anything.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails.
pub fn write_metadata<W: io::Write>(w: &mut W, info: &AssetInfo) -> Result<()> {
    write!(
        w,
        "\n//func Data() (*asset, error) {{\n\
         //\tinfo := bindataFileInfo{{name: {}, size: {}, mode: os.FileMode({}), modTime: time.Unix({}, 0)}}\n\
         //\ta := &asset{{bytes: data, info: info, digest: {}}}\n\
         //\treturn a, nil\n\
         //}}\n\n",
        quote_escaped(info.name.as_bytes()),
        info.size,
        octal(info.mode),
        info.mod_time.timestamp(),
        info.digest.to_go_array(),
    )?;
    Ok(())
}
