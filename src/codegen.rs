//! Generated source files.
//!
//! A generated file has four parts:
//!
//! 1. build constraints selecting the target platform
//! 2. the package clause, the unpack import and an `init()` calling the unpacker
//! 3. `var data = []byte(<literal>)`
//! 4. the metadata comment from [`crate::asset::write_metadata`]
//!
//! ```rust
//! use go_bindata::codegen::Platform;
//!
//! let platform = Platform::new("debian-openssl-1.1.x");
//! assert_eq!(platform.build_tag(), "debian_openssl_1_1_x");
//! ```

use crate::asset::{write_metadata, AssetInfo};
use crate::options::EncodeOptions;
use crate::ser::{quote_escaped, Encoded, Encoder};
use crate::{Error, Result};
use std::io;
use std::path::Path;
use tracing::debug;

/// Every platform assets are published for.
pub const PLATFORMS: &[&str] = &[
    "darwin",
    "linux-musl",
    "windows",
    "debian-openssl-1.0.x",
    "debian-openssl-1.1.x",
    "rhel-openssl-1.0.x",
    "rhel-openssl-1.1.x",
];

const MUSL: &str = "linux-musl";

/// A target platform name and the build constraints derived from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Platform {
    name: String,
}

impl Platform {
    pub fn new(name: &str) -> Self {
        Platform {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The positive build tag for this platform.
    ///
    /// The musl build is the generic linux fallback.
    #[must_use]
    pub fn build_tag(&self) -> String {
        if self.name == MUSL {
            "linux".to_string()
        } else {
            normalize_tag(&self.name)
        }
    }

    /// Negative build tags, so that the linux fallback yields to any
    /// distribution-specific build.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use go_bindata::codegen::Platform;
    ///
    /// let excludes = Platform::new("linux-musl").excludes();
    /// assert!(excludes.contains(&"debian_openssl_1_1_x".to_string()));
    /// assert!(Platform::new("darwin").excludes().is_empty());
    /// ```
    #[must_use]
    pub fn excludes(&self) -> Vec<String> {
        if self.name != MUSL {
            return Vec::new();
        }
        PLATFORMS
            .iter()
            .filter(|p| p.contains("openssl"))
            .map(|p| normalize_tag(p))
            .collect()
    }
}

fn normalize_tag(name: &str) -> String {
    name.replace(['-', '.'], "_")
}

/// Rejects anything that is not an ASCII Go identifier.
fn identifier<'a>(what: &str, value: &'a str) -> Result<&'a str> {
    let mut chars = value.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric());
    if valid {
        Ok(value)
    } else {
        Err(Error::invalid_input(format!("{what} {value:?} is not a Go identifier")))
    }
}

/// Writes the build constraints, package clause, import and `init()`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the package or variable name is not an
/// identifier and [`Error::Io`] if writing fails.
pub fn write_header<W: io::Write>(
    w: &mut W,
    name: &str,
    platform: &Platform,
    options: &EncodeOptions,
) -> Result<()> {
    let package = identifier("package", &options.package)?;
    let var = identifier("variable", &options.variable)?;
    let tag = platform.build_tag();

    writeln!(w)?;
    writeln!(w, "// +build {tag}")?;
    writeln!(w, "// +build !{package}_ignore")?;
    for exclude in platform.excludes() {
        writeln!(w, "// +build !{exclude}")?;
    }
    write!(
        w,
        "\npackage {package}\n\n\
         import (\n\t{import}\n)\n\n\
         func init() {{\n\tunpack.Unpack({var}, {asset})\n}}\n\n",
        import = quote_escaped(options.unpack_import.as_bytes()),
        asset = quote_escaped(format!("{name}-{tag}").as_bytes()),
    )?;
    Ok(())
}

/// Writes the `var` declaration holding an encoded literal.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for a variable name that is not an
/// identifier and [`Error::Io`] if writing fails.
pub fn write_declaration<W: io::Write>(
    w: &mut W,
    encoded: &Encoded,
    options: &EncodeOptions,
) -> Result<()> {
    let var = identifier("variable", &options.variable)?;
    write!(w, "var {var} = []byte({})", encoded.literal)?;
    Ok(())
}

/// Encodes the file at `path` and writes its declaration and metadata.
///
/// # Errors
///
/// Returns [`crate::Error::SourceRead`] if the file cannot be read or stat'ed.
pub fn write_asset<W: io::Write, P: AsRef<Path>>(
    w: &mut W,
    path: P,
    options: &EncodeOptions,
) -> Result<AssetInfo> {
    let path = path.as_ref();
    let encoded = Encoder::new(options.clone()).encode_file(path)?;
    let info = AssetInfo::stat("bytes", path, encoded.digest)?;

    write_declaration(w, &encoded, options)?;
    if options.metadata {
        write_metadata(w, &info)?;
    } else {
        writeln!(w)?;
    }

    debug!(
        path = %path.display(),
        size = info.size,
        embedded = encoded.embedded_size,
        kind = ?encoded.kind,
        "wrote asset"
    );
    Ok(info)
}

/// Writes a complete generated source file for one asset.
///
/// # Errors
///
/// Returns [`crate::Error::SourceRead`] for an unreadable asset and
/// [`crate::Error::Io`] if writing fails.
pub fn write_file<W: io::Write, P: AsRef<Path>>(
    w: &mut W,
    name: &str,
    platform: &Platform,
    path: P,
    options: &EncodeOptions,
) -> Result<AssetInfo> {
    write_header(w, name, platform, options)?;
    write_asset(w, path, options)
}
