//! Embedded Literal Format
//!
//! This module documents the source text produced by this crate.
//!
//! # Overview
//!
//! An embedded asset becomes a single Go declaration:
//!
//! ```text
//! var data = []byte(<expression>)
//! ```
//!
//! `<expression>` always evaluates to the exact bytes of the asset. It is built
//! from two kinds of string literal joined by `+`.
//!
//! ## Raw literals
//!
//! Back-quoted text is copied verbatim by the compiler, with two exceptions
//! that make some bytes impossible to write inside it:
//!
//! | Sequence | Problem | Replacement leaf |
//! |----------|---------|------------------|
//! | `` ` `` | ends the literal | `` "`" `` |
//! | `EF BB BF` (BOM) | rejected in source text | `"\xEF\xBB\xBF"` |
//! | `0D` (CR) | discarded from raw literals | `"\r"` |
//!
//! Raw mode is only used when the whole asset is valid UTF-8 with no NUL and no
//! format characters (Unicode category Cf). Everything else takes escaped mode.
//!
//! ## Escaped literals
//!
//! A double-quoted literal using only printable ASCII:
//!
//! ```text
//! \"  - quote
//! \\  - backslash
//! \a \b \f \n \r \t \v - control characters
//! \xHH - any other byte
//! ```
//!
//! # Concatenation
//!
//! Raw-mode leaves are combined by splitting the leaf list at its midpoint and
//! parenthesizing each pair:
//!
//! ```text
//! `a`e`i`o`u`
//! ```
//!
//! becomes
//!
//! ```text
//! ((("`" + `a`) + ("`" + (`e` + "`"))) + ((`i` + ("`" + `o`)) + ("`" + (`u` + "`"))))
//! ```
//!
//! With `k` leaves the deepest parenthesis is `ceil(log2(k))` levels down, so
//! assets with many back-quotes stay well inside compiler nesting limits.
//!
//! # Edge Cases
//!
//! | Input | Output |
//! |-------|--------|
//! | empty | ``` `` ``` |
//! | `` ` `` | `` "`" `` |
//! | `hello` | `` `hello` `` |
//! | `a\0b` | `"a\x00b"` |
//!
//! # Metadata
//!
//! The declaration is followed by a comment block recording size, permission
//! bits (octal), modification time (Unix seconds) and SHA-256 digest of the
//! source. It is never compiled and never parsed.
//!
//! ```text
//! //func Data() (*asset, error) {
//! //	info := bindataFileInfo{name: "bytes", size: 3, mode: os.FileMode(0644), modTime: time.Unix(1600000000, 0)}
//! //	a := &asset{bytes: data, info: info, digest: [32]uint8{0xba, 0x78, ...}}
//! //	return a, nil
//! //}
//! ```

// This module contains only documentation; no implementation code
