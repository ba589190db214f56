//! Property-based tests for the literal codec.
//!
//! Round trip, digest and nesting depth are checked over generated blobs,
//! with strategies biased towards the bytes the encoder treats specially.

use go_bindata::de::literal_depth;
use go_bindata::ser::LiteralKind;
use go_bindata::{compress, decompress, encode, from_str, Digest};
use proptest::prelude::*;

fn roundtrip(blob: &[u8]) -> bool {
    let encoded = encode(blob);
    match from_str(&encoded.literal) {
        Ok(parsed) => parsed == blob,
        Err(e) => {
            eprintln!("Parse failed: {}", e);
            eprintln!("Literal was: {}", encoded.literal);
            false
        }
    }
}

/// Text built from fragments that include every delimiter.
fn delimiter_heavy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            Just("`".to_string()),
            Just("\r".to_string()),
            Just("\r\n".to_string()),
            Just("\u{FEFF}".to_string()),
            "[a-z \n]{0,6}",
            "\\PC{0,3}",
        ],
        0..40,
    )
    .prop_map(|parts| parts.concat().into_bytes())
}

fn ceil_log2(n: usize) -> usize {
    if n <= 1 {
        0
    } else {
        (usize::BITS - (n - 1).leading_zeros()) as usize
    }
}

proptest! {
    #[test]
    fn prop_arbitrary_bytes_roundtrip(blob in prop::collection::vec(any::<u8>(), 0..512)) {
        prop_assert!(roundtrip(&blob));
    }

    #[test]
    fn prop_text_roundtrip(text in "\\PC{0,200}") {
        prop_assert!(roundtrip(text.as_bytes()));
    }

    #[test]
    fn prop_delimiter_heavy_roundtrip(blob in delimiter_heavy()) {
        prop_assert!(roundtrip(&blob));
    }

    #[test]
    fn prop_digest_is_sha256_of_input(blob in prop::collection::vec(any::<u8>(), 0..256)) {
        prop_assert_eq!(encode(&blob).digest, Digest::of(&blob));
    }

    #[test]
    fn prop_nul_forces_escaped_mode(
        head in "[a-z`]{0,20}",
        tail in "[a-z`]{0,20}",
    ) {
        let blob = format!("{head}\0{tail}").into_bytes();
        let encoded = encode(&blob);
        prop_assert_eq!(encoded.kind, LiteralKind::Escaped);
        prop_assert!(roundtrip(&blob));
    }

    #[test]
    fn prop_depth_is_logarithmic(count in 1usize..300) {
        // every other leaf is a back-quote: 2 * count leaves in total
        let blob = "x`".repeat(count).into_bytes();
        let depth = literal_depth(&encode(&blob).literal).unwrap();
        prop_assert!(depth <= ceil_log2(2 * count), "depth {} for {} leaves", depth, 2 * count);
    }

    #[test]
    fn prop_compression_roundtrip(blob in prop::collection::vec(any::<u8>(), 0..1024)) {
        let payload = compress(&blob, 6).unwrap();
        prop_assert_eq!(decompress(&payload).unwrap(), blob);
    }
}
