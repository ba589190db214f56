//! Upstream retrieval and the build-time download pipeline.
//!
//! Transport is not part of this crate. Callers supply a [`Fetch`]
//! implementation (any `Fn(&str) -> Result<Vec<u8>, BoxError>` closure works)
//! and [`download_asset`] takes care of the rest:
//!
//! 1. fetch the compressed asset
//! 2. write it to `<to>.gz`
//! 3. generate `<to>.go` embedding the `.gz` bytes
//!
//! Both files are written through a temporary file and renamed into place.
//!
//! ```rust
//! use go_bindata::codegen::Platform;
//! use go_bindata::fetch::{download_asset, BoxError};
//! use go_bindata::EncodeOptions;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let to = dir.path().join("prisma-query-engine-darwin");
//! let fetcher = |_url: &str| -> Result<Vec<u8>, BoxError> { Ok(b"payload".to_vec()) };
//!
//! let info = download_asset(
//!     &fetcher,
//!     "query-engine",
//!     &Platform::new("darwin"),
//!     "https://example.invalid/darwin/query-engine.gz",
//!     &to,
//!     &EncodeOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(info.size, 7);
//! ```

use crate::asset::AssetInfo;
use crate::codegen::{write_file, Platform};
use crate::options::{EncodeOptions, UnpackOptions};
use crate::unpack::write_atomic;
use crate::{Error, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Retrieves the bytes behind a URL.
pub trait Fetch {
    /// # Errors
    ///
    /// Any transport or protocol failure.
    fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, BoxError>;
}

impl<F> Fetch for F
where
    F: Fn(&str) -> std::result::Result<Vec<u8>, BoxError>,
{
    fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, BoxError> {
        self(url)
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Downloads one asset and generates its embedding source file.
///
/// Returns the metadata written into the generated file.
///
/// # Errors
///
/// Returns [`Error::Fetch`] if retrieval fails, [`Error::Io`] if the target
/// directory cannot be created and [`Error::Materialize`] if either output
/// file cannot be placed.
pub fn download_asset<F: Fetch + ?Sized>(
    fetcher: &F,
    name: &str,
    platform: &Platform,
    url: &str,
    to: &Path,
    options: &EncodeOptions,
) -> Result<AssetInfo> {
    if let Some(dir) = to.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .map_err(|e| Error::io(&format!("create {}: {e}", dir.display())))?;
    }

    let bytes = fetcher.fetch(url).map_err(|e| Error::fetch(url, e))?;
    debug!(url, bytes = bytes.len(), "fetched asset");

    let file_options = UnpackOptions::new().with_mode(0o644);
    let gz_path = with_suffix(to, ".gz");
    write_atomic(&gz_path, &bytes, &file_options)?;

    let mut source = Vec::with_capacity(bytes.len() * 2 + 1024);
    let asset = write_file(&mut source, name, platform, &gz_path, options)?;
    let go_path = with_suffix(to, ".go");
    write_atomic(&go_path, &source, &file_options)?;

    info!(
        asset = name,
        platform = platform.name(),
        go = %go_path.display(),
        "generated embedded asset"
    );
    Ok(asset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::de::from_declaration;
    use crate::Digest;

    #[test]
    fn test_download_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let to = dir.path().join("engines").join("prisma-fmt-windows");
        let payload = b"\x1f\x8bnot really gzip\0".to_vec();
        let expected = payload.clone();
        let fetcher = move |_: &str| -> std::result::Result<Vec<u8>, BoxError> { Ok(payload.clone()) };

        let info = download_asset(
            &fetcher,
            "prisma-fmt",
            &Platform::new("windows"),
            "https://example.invalid/prisma-fmt.gz",
            &to,
            &EncodeOptions::default(),
        )
        .unwrap();

        assert_eq!(fs::read(with_suffix(&to, ".gz")).unwrap(), expected);
        assert_eq!(info.digest, Digest::of(&expected));

        let source = fs::read_to_string(with_suffix(&to, ".go")).unwrap();
        assert!(source.contains("// +build windows"));
        assert_eq!(from_declaration(&source, "data").unwrap(), expected);
    }

    #[test]
    fn test_fetch_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let to = dir.path().join("engine");
        let fetcher =
            |_: &str| -> std::result::Result<Vec<u8>, BoxError> { Err("status 404".into()) };

        let err = download_asset(
            &fetcher,
            "query-engine",
            &Platform::new("darwin"),
            "https://example.invalid/q.gz",
            &to,
            &EncodeOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Fetch { .. }));
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
