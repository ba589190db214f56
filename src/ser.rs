//! Literal-safe encoding.
//!
//! This module turns an arbitrary byte blob into a Go expression that
//! evaluates to exactly those bytes.
//!
//! ## Overview
//!
//! Encoding picks one of two renderings with a pure classification step:
//!
//! - **Raw mode**: the blob is valid UTF-8 with no NUL and no invisible format
//!   characters. It is split around the [`Delimiter`](crate::Delimiter)s and rendered as back-quoted
//!   raw literals joined with `+`.
//! - **Escaped mode**: anything else. The whole blob becomes one double-quoted
//!   literal using only ASCII, with `\xHH` for every byte that is not printable.
//!
//! Concatenations are paired at the midpoint of the chunk list, so nesting depth
//! grows with the logarithm of the number of delimiters rather than linearly.
//!
//! ```rust
//! use go_bindata::ser::sanitize;
//!
//! assert_eq!(sanitize("hello"), "`hello`");
//! assert_eq!(sanitize("`ello"), "(\"`\" + `ello`)");
//! ```
//!
//! ## Streaming the digest
//!
//! [`Encoder::encode_reader`] hashes the source while reading it through a
//! [`HashingReader`], so the digest never needs a second pass over the input.
//! In-memory [`encode`] drains its slice through the same reader.

use crate::asset::Digest;
use crate::chunk::{reassemble, split_chunks, Chunk};
use crate::options::EncodeOptions;
use crate::{Error, Result};
use sha2::{Digest as _, Sha256};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Which rendering an encoded literal uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiteralKind {
    Raw,
    Escaped,
}

/// The rendering decision for a blob, carrying the view each renderer needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiteralMode<'a> {
    /// Blob is text that may live inside raw literals
    Raw(&'a str),
    /// Blob must be fully escaped
    Escaped(&'a [u8]),
}

impl<'a> LiteralMode<'a> {
    #[must_use]
    pub fn kind(&self) -> LiteralKind {
        match self {
            LiteralMode::Raw(_) => LiteralKind::Raw,
            LiteralMode::Escaped(_) => LiteralKind::Escaped,
        }
    }

    /// Renders the blob with the chosen strategy.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            LiteralMode::Raw(text) => sanitize(text),
            LiteralMode::Escaped(bytes) => quote_escaped(bytes),
        }
    }
}

/// Chooses raw or escaped rendering for `blob`.
///
/// The empty blob is raw: it renders as an empty raw literal.
///
/// # Examples
///
/// ```rust
/// use go_bindata::ser::{classify, LiteralKind};
///
/// assert_eq!(classify(b"plain text").kind(), LiteralKind::Raw);
/// assert_eq!(classify(b"nul\0byte").kind(), LiteralKind::Escaped);
/// assert_eq!(classify(b"\xff\xfe").kind(), LiteralKind::Escaped);
/// ```
#[must_use]
pub fn classify(blob: &[u8]) -> LiteralMode<'_> {
    match std::str::from_utf8(blob) {
        Ok(text) if !text.chars().any(|c| c == '\0' || is_format_char(c)) => {
            LiteralMode::Raw(text)
        }
        _ => LiteralMode::Escaped(blob),
    }
}

// Unicode general category Cf.
const FORMAT_CHARS: &[(u32, u32)] = &[
    (0x00AD, 0x00AD),
    (0x0600, 0x0605),
    (0x061C, 0x061C),
    (0x06DD, 0x06DD),
    (0x070F, 0x070F),
    (0x0890, 0x0891),
    (0x08E2, 0x08E2),
    (0x180E, 0x180E),
    (0x200B, 0x200F),
    (0x202A, 0x202E),
    (0x2060, 0x2064),
    (0x2066, 0x206F),
    (0xFEFF, 0xFEFF),
    (0xFFF9, 0xFFFB),
    (0x110BD, 0x110BD),
    (0x110CD, 0x110CD),
    (0x13430, 0x1343F),
    (0x1BCA0, 0x1BCA3),
    (0x1D173, 0x1D17A),
    (0xE0001, 0xE0001),
    (0xE0020, 0xE007F),
];

/// Returns true for invisible format characters (general category Cf).
#[must_use]
pub fn is_format_char(c: char) -> bool {
    let cp = c as u32;
    FORMAT_CHARS
        .binary_search_by(|&(lo, hi)| {
            if hi < cp {
                std::cmp::Ordering::Less
            } else if lo > cp {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// Renders text as a concatenation of raw literals and escaped delimiters.
///
/// The caller guarantees `text` passed [`classify`]; BOMs are still handled
/// so the function is total over `&str`.
///
/// # Examples
///
/// ```rust
/// use go_bindata::ser::sanitize;
///
/// assert_eq!(sanitize(""), "``");
/// assert_eq!(
///     sanitize("\u{FEFF}`s away!"),
///     "(\"\\xEF\\xBB\\xBF\" + (\"`\" + `s away!`))"
/// );
/// ```
#[must_use]
pub fn sanitize(text: &str) -> String {
    let chunks = split_chunks(text.as_bytes());
    debug_assert!(check_reassembly(text.as_bytes(), &chunks).is_ok());

    let mut out = String::with_capacity(text.len() + 2 + chunks.len() * 6);
    render_balanced(text, &chunks, &mut out);
    out
}

fn render_balanced(text: &str, chunks: &[Chunk], out: &mut String) {
    match chunks {
        [] => out.push_str("``"),
        [leaf] => render_leaf(text, leaf, out),
        _ => {
            let mid = chunks.len() / 2;
            out.push('(');
            render_balanced(text, &chunks[..mid], out);
            out.push_str(" + ");
            render_balanced(text, &chunks[mid..], out);
            out.push(')');
        }
    }
}

fn render_leaf(text: &str, chunk: &Chunk, out: &mut String) {
    match chunk {
        Chunk::Delimiter(delimiter) => out.push_str(delimiter.escaped()),
        Chunk::Text(range) => {
            // Delimiters are whole UTF-8 sequences, so every range edge is a char boundary.
            out.push('`');
            out.push_str(&text[range.clone()]);
            out.push('`');
        }
    }
}

/// Renders bytes as one double-quoted, ASCII-only literal.
///
/// # Examples
///
/// ```rust
/// use go_bindata::ser::quote_escaped;
///
/// assert_eq!(quote_escaped(b"a\0\"\xff"), r#""a\x00\"\xff""#);
/// ```
#[must_use]
pub fn quote_escaped(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 2);
    out.push('"');
    for &byte in bytes {
        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            0x07 => out.push_str("\\a"),
            0x08 => out.push_str("\\b"),
            0x0C => out.push_str("\\f"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x0B => out.push_str("\\v"),
            0x20..=0x7E => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\x{byte:02x}");
            }
        }
    }
    out.push('"');
    out
}

/// Checks that the delimiter split of `blob` concatenates back to `blob`.
///
/// # Errors
///
/// Returns [`Error::Encode`] on mismatch.
pub fn verify_chunks(blob: &[u8]) -> Result<()> {
    check_reassembly(blob, &split_chunks(blob))
}

fn check_reassembly(blob: &[u8], chunks: &[Chunk]) -> Result<()> {
    let rebuilt = reassemble(blob, chunks);
    if rebuilt != blob {
        return Err(Error::encode(format!(
            "{} chunks reassemble to {} bytes, source has {}",
            chunks.len(),
            rebuilt.len(),
            blob.len()
        )));
    }
    Ok(())
}

/// A reader that hashes everything read through it.
pub struct HashingReader<R> {
    inner: R,
    hasher: Sha256,
}

impl<R: Read> HashingReader<R> {
    pub fn new(inner: R) -> Self {
        HashingReader {
            inner,
            hasher: Sha256::new(),
        }
    }

    /// Returns the digest of all bytes read so far.
    pub fn finalize(self) -> Digest {
        Digest::from_bytes(self.hasher.finalize().into())
    }
}

impl<'a> HashingReader<&'a [u8]> {
    /// Hashes an in-memory blob by draining it through a reader.
    fn digest_slice(blob: &'a [u8]) -> Digest {
        let mut reader = HashingReader::new(blob);
        // Reading from a slice cannot fail.
        let _ = io::copy(&mut reader, &mut io::sink());
        reader.finalize()
    }
}

impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

/// The result of encoding one asset.
#[derive(Clone, Debug, PartialEq)]
pub struct Encoded {
    /// Expression evaluating to the embedded bytes
    pub literal: String,
    /// SHA-256 of the source blob, before any compression
    pub digest: Digest,
    /// Length of the source blob
    pub size: u64,
    /// Length of the bytes inside the literal
    pub embedded_size: u64,
    pub kind: LiteralKind,
    pub compressed: bool,
}

/// Renders `embedded` as a literal expression.
pub(crate) fn render_literal(embedded: &[u8]) -> (String, LiteralKind) {
    let mode = classify(embedded);
    let literal = mode.render();
    debug!(kind = ?mode.kind(), bytes = embedded.len(), "rendered literal");
    (literal, mode.kind())
}

/// Encodes an in-memory blob without compression.
///
/// # Examples
///
/// ```rust
/// use go_bindata::{encode, Digest};
///
/// let encoded = encode(b"hello");
/// assert_eq!(encoded.literal, "`hello`");
/// assert_eq!(encoded.digest, Digest::of(b"hello"));
/// ```
#[must_use]
pub fn encode(blob: &[u8]) -> Encoded {
    let (literal, kind) = render_literal(blob);
    Encoded {
        literal,
        digest: HashingReader::digest_slice(blob),
        size: blob.len() as u64,
        embedded_size: blob.len() as u64,
        kind,
        compressed: false,
    }
}

/// The literal encoder.
///
/// Holds [`EncodeOptions`] and encodes blobs from memory, readers or files.
#[derive(Clone, Debug, Default)]
pub struct Encoder {
    options: EncodeOptions,
}

impl Encoder {
    pub fn new(options: EncodeOptions) -> Self {
        Encoder { options }
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Encodes `blob`, compressing first if configured.
    ///
    /// # Errors
    ///
    /// Only compression can fail, and only on allocation-level I/O errors.
    pub fn encode(&self, blob: &[u8]) -> Result<Encoded> {
        self.encode_from(blob, Path::new("<memory>"))
    }

    /// Checks that the delimiter split of `blob` reassembles to `blob`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if it does not.
    pub fn verify(&self, blob: &[u8]) -> Result<()> {
        verify_chunks(blob)
    }

    /// Encodes everything `reader` yields, hashing it on the way through.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceRead`] if reading fails.
    pub fn encode_reader<R: Read>(&self, reader: R) -> Result<Encoded> {
        self.encode_from(reader, Path::new("<reader>"))
    }

    /// Encodes the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceRead`] if the file cannot be opened or read.
    pub fn encode_file<P: AsRef<Path>>(&self, path: P) -> Result<Encoded> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::source_read(path, e))?;
        self.encode_from(file, path)
    }

    fn encode_from<R: Read>(&self, reader: R, source: &Path) -> Result<Encoded> {
        let mut reader = HashingReader::new(reader);
        let mut raw = Vec::new();
        reader
            .read_to_end(&mut raw)
            .map_err(|e| Error::source_read(source, e))?;
        let digest = reader.finalize();
        let size = raw.len() as u64;

        let embedded = if self.options.compress {
            crate::unpack::compress(&raw, self.options.compression_level)?
        } else {
            raw
        };
        if cfg!(debug_assertions) {
            self.verify(&embedded)?;
        }
        let (literal, kind) = render_literal(&embedded);

        Ok(Encoded {
            literal,
            digest,
            size,
            embedded_size: embedded.len() as u64,
            kind,
            compressed: self.options.compress,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_vectors() {
        let cases = [
            ("hello", "`hello`"),
            ("hello\nworld", "`hello\nworld`"),
            ("`ello", "(\"`\" + `ello`)"),
            (
                "`a`e`i`o`u`",
                "(((\"`\" + `a`) + (\"`\" + (`e` + \"`\"))) + ((`i` + (\"`\" + `o`)) + (\"`\" + (`u` + \"`\"))))",
            ),
            (
                "\u{FEFF}`s away!",
                "(\"\\xEF\\xBB\\xBF\" + (\"`\" + `s away!`))",
            ),
        ];

        for (input, expected) in cases {
            assert_eq!(sanitize(input), expected, "sanitize({input:?})");
        }
    }

    #[test]
    fn test_sanitize_single_delimiter_has_no_operator() {
        assert_eq!(sanitize("`"), "\"`\"");
        assert_eq!(sanitize("\r"), "\"\\r\"");
    }

    #[test]
    fn test_carriage_return_is_escaped() {
        assert_eq!(sanitize("a\r\nb"), "(`a` + (\"\\r\" + `\nb`))");
    }

    #[test]
    fn test_format_chars() {
        assert!(is_format_char('\u{200B}'));
        assert!(is_format_char('\u{FEFF}'));
        assert!(is_format_char('\u{00AD}'));
        assert!(is_format_char('\u{E0041}'));
        assert!(!is_format_char('a'));
        assert!(!is_format_char('\u{00E9}'));
        assert!(!is_format_char('\u{1F600}'));
    }

    #[test]
    fn test_classify_rejects_format_chars() {
        assert_eq!(classify("zero\u{200B}width".as_bytes()).kind(), LiteralKind::Escaped);
        assert_eq!(classify("caf\u{00E9}".as_bytes()).kind(), LiteralKind::Raw);
        assert_eq!(classify(b"").kind(), LiteralKind::Raw);
    }

    #[test]
    fn test_quote_escaped_control_bytes() {
        assert_eq!(
            quote_escaped(b"\x07\x08\x0c\n\r\t\x0b\x01"),
            r#""\a\b\f\n\r\t\v\x01""#
        );
        assert_eq!(quote_escaped(b""), "\"\"");
        assert_eq!(quote_escaped("é".as_bytes()), r#""\xc3\xa9""#);
    }

    #[test]
    fn test_hashing_reader_matches_digest() {
        let data = b"streamed through the hasher";
        let mut reader = HashingReader::new(&data[..]);
        let mut sink = Vec::new();
        reader.read_to_end(&mut sink).unwrap();
        assert_eq!(reader.finalize(), Digest::of(data));
        assert_eq!(sink, data);
    }

    #[test]
    fn test_encoder_with_compression_keeps_source_digest() {
        let encoder = Encoder::new(EncodeOptions::new().with_compression(9));
        let encoded = encoder.encode(b"abcabcabcabc").unwrap();
        assert!(encoded.compressed);
        assert_eq!(encoded.digest, Digest::of(b"abcabcabcabc"));
        assert_eq!(encoded.size, 12);
        // gzip output starts with 0x1f 0x8b, which is never valid UTF-8 here
        assert_eq!(encoded.kind, LiteralKind::Escaped);
    }

    #[test]
    fn test_verify_chunks() {
        assert!(verify_chunks(b"`a`\r\n\xEF\xBB\xBF").is_ok());
        assert!(Encoder::default().verify(b"").is_ok());
    }

    #[test]
    fn test_reassembly_mismatch_is_encode_error() {
        let blob = b"a`b";
        // drops the trailing text range
        let chunks = [Chunk::Text(0..1), Chunk::Delimiter(crate::Delimiter::Backquote)];
        let err = check_reassembly(blob, &chunks).unwrap_err();
        assert!(matches!(err, Error::Encode(ref msg) if msg.contains("2 chunks reassemble to 2 bytes, source has 3")));
    }

    #[test]
    fn test_in_memory_digest_matches_streamed() {
        let blob = b"same bytes, two entry points";
        let streamed = Encoder::default().encode_reader(&blob[..]).unwrap();
        assert_eq!(encode(blob).digest, streamed.digest);
        assert_eq!(HashingReader::digest_slice(&b""[..]), Digest::of(b""));
    }
}
