//! Decompress-and-materialize at program startup.
//!
//! The hosting program embeds a gzip payload produced at build time and calls
//! [`bootstrap`] (or [`materialize`] to handle the error itself) once per asset.
//! The payload is inflated in memory, optionally checked against a [`Digest`],
//! written to a temporary file beside the target, marked executable and then
//! renamed over the target.
//!
//! A reader racing the unpacker sees either the previous file or the complete
//! new one. The temporary file lives in the target's own directory, so the
//! rename never crosses a filesystem boundary.
//!
//! ## Examples
//!
//! ```rust
//! use go_bindata::unpack::{compress, materialize};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let target = dir.path().join("bin").join("engine");
//!
//! let payload = compress(b"abc", 6).unwrap();
//! materialize(&payload, &target).unwrap();
//! assert_eq!(std::fs::read(&target).unwrap(), b"abc");
//! ```

use crate::asset::Digest;
use crate::options::UnpackOptions;
use crate::{Error, Result};
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info};

/// Gzips `bytes` at `level` (0 through 9).
///
/// # Errors
///
/// Returns [`Error::Io`] if the encoder fails.
pub fn compress(bytes: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(
        Vec::with_capacity(bytes.len() / 2),
        Compression::new(level.min(9)),
    );
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

/// Inflates a complete gzip payload into memory.
///
/// Concatenated gzip members are inflated in sequence.
///
/// # Errors
///
/// Returns [`Error::Decode`] for empty, corrupt or truncated payloads.
pub fn decompress(payload: &[u8]) -> Result<Vec<u8>> {
    if payload.is_empty() {
        return Err(Error::decode("empty payload"));
    }
    let mut out = Vec::with_capacity(payload.len() * 2);
    MultiGzDecoder::new(payload)
        .read_to_end(&mut out)
        .map_err(Error::decode)?;
    Ok(out)
}

/// Decompresses `payload` and places it at `target` as an executable file.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the payload does not inflate and
/// [`Error::Materialize`] if the file cannot be written. The target is left
/// untouched in both cases.
pub fn materialize<P: AsRef<Path>>(payload: &[u8], target: P) -> Result<()> {
    materialize_with_options(payload, target, &UnpackOptions::default())
}

/// Like [`materialize`], with explicit permission bits and digest verification.
///
/// # Errors
///
/// In addition to the errors of [`materialize`], returns [`Error::Integrity`]
/// when `options.expected_digest` is set and the inflated bytes hash differently.
pub fn materialize_with_options<P: AsRef<Path>>(
    payload: &[u8],
    target: P,
    options: &UnpackOptions,
) -> Result<()> {
    let target = target.as_ref();
    let start = Instant::now();

    let bytes = decompress(payload)?;
    debug!(compressed = payload.len(), inflated = bytes.len(), "inflated payload");

    if let Some(expected) = &options.expected_digest {
        let actual = Digest::of(&bytes);
        if actual != *expected {
            return Err(Error::integrity(&expected.to_hex(), &actual.to_hex()));
        }
    }

    write_atomic(target, &bytes, options)?;

    info!(
        path = %target.display(),
        bytes = bytes.len(),
        elapsed = ?start.elapsed(),
        "unpacked embedded asset"
    );
    Ok(())
}

/// Writes `bytes` to a sibling temp file, sets its mode, then renames it onto `target`.
pub(crate) fn write_atomic(target: &Path, bytes: &[u8], options: &UnpackOptions) -> Result<()> {
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if options.create_dirs {
        fs::create_dir_all(parent).map_err(|e| Error::materialize(target, e))?;
    }

    let prefix = match target.file_name() {
        Some(name) => format!(".{}.", name.to_string_lossy()),
        None => return Err(Error::materialize(target, "target has no file name")),
    };
    let mut temp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| Error::materialize(target, e))?;

    temp.write_all(bytes)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| Error::materialize(target, e))?;
    set_mode(temp.as_file(), options.mode).map_err(|e| Error::materialize(target, e))?;

    // Dropping the temp file on any error above removes it.
    temp.persist(target)
        .map_err(|e| Error::materialize(target, e.error))?;
    Ok(())
}

#[cfg(unix)]
fn set_mode(file: &fs::File, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_file: &fs::File, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

/// Startup entry point: materializes the asset or aborts.
///
/// # Panics
///
/// Panics if the payload cannot be decoded or the file cannot be placed. The
/// asset is required for the hosting program to run, so there is no degraded mode.
pub fn bootstrap<P: AsRef<Path>>(payload: &[u8], target: P) {
    bootstrap_with_options(payload, target, &UnpackOptions::default());
}

/// [`bootstrap`] with explicit [`UnpackOptions`].
///
/// # Panics
///
/// Panics on any error from [`materialize_with_options`].
pub fn bootstrap_with_options<P: AsRef<Path>>(payload: &[u8], target: P, options: &UnpackOptions) {
    let target = target.as_ref();
    if let Err(err) = materialize_with_options(payload, target, options) {
        error!(path = %target.display(), error = %err, "embedded asset unusable");
        panic!("unpack {}: {err}", target.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_decompress() {
        let payload = compress(b"abc", 9).unwrap();
        assert_eq!(&payload[..2], &[0x1f, 0x8b]);
        assert_eq!(decompress(&payload).unwrap(), b"abc");
    }

    #[test]
    fn test_concatenated_members() {
        let mut payload = compress(b"ab", 6).unwrap();
        payload.extend(compress(b"cd", 6).unwrap());
        assert_eq!(decompress(&payload).unwrap(), b"abcd");
    }

    #[test]
    fn test_decompress_rejects_garbage() {
        assert!(matches!(decompress(b""), Err(Error::Decode(_))));
        assert!(matches!(decompress(b"not gzip at all"), Err(Error::Decode(_))));

        let payload = compress(&[7u8; 4096], 6).unwrap();
        let truncated = &payload[..payload.len() - 8];
        assert!(matches!(decompress(truncated), Err(Error::Decode(_))));
    }

    #[test]
    fn test_integrity_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("engine");
        let options = UnpackOptions::new().with_digest(Digest::of(b"something else"));

        let err = materialize_with_options(&compress(b"abc", 6).unwrap(), &target, &options)
            .unwrap_err();
        assert!(matches!(err, Error::Integrity { .. }));
        assert!(!target.exists());
    }

    #[test]
    fn test_missing_parent_without_create_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("engine");
        let options = UnpackOptions::new().without_create_dirs();

        let err = materialize_with_options(&compress(b"abc", 6).unwrap(), &target, &options)
            .unwrap_err();
        assert!(matches!(err, Error::Materialize { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_mode_is_applied() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("engine");
        let options = UnpackOptions::new().with_mode(0o700);
        materialize_with_options(&compress(b"abc", 6).unwrap(), &target, &options).unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }

    #[test]
    #[should_panic(expected = "unpack")]
    fn test_bootstrap_panics_on_corrupt_payload() {
        let dir = tempfile::tempdir().unwrap();
        bootstrap(b"\x1f\x8b\x08corrupt", dir.path().join("engine"));
    }
}
