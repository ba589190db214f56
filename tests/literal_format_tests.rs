use go_bindata::de::literal_depth;
use go_bindata::ser::{sanitize, LiteralKind};
use go_bindata::{compress, encode, from_str, materialize, to_writer, Digest, EncodeOptions, Error};
use std::fs;

#[test]
fn test_plain_text_is_one_raw_literal() {
    let encoded = encode(b"hello");
    assert_eq!(encoded.literal, "`hello`");
    assert_eq!(encoded.kind, LiteralKind::Raw);
    assert_eq!(
        encoded.digest.to_hex(),
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
}

#[test]
fn test_leading_backquote() {
    assert_eq!(encode(b"`ello").literal, "(\"`\" + `ello`)");
}

#[test]
fn test_empty_blob() {
    let encoded = encode(b"");
    assert_eq!(encoded.literal, "``");
    assert_eq!(encoded.digest, Digest::of(b""));
    assert_eq!(from_str(&encoded.literal).unwrap(), b"");
}

#[test]
fn test_all_delimiters_blob() {
    let blob = b"````\r\r";
    let encoded = encode(blob);
    println!("All delimiters:\n{}", encoded.literal);

    assert!(!encoded.literal.contains("``"));
    assert_eq!(from_str(&encoded.literal).unwrap(), blob);
    assert_eq!(literal_depth(&encoded.literal).unwrap(), 3);
}

#[test]
fn test_vowel_vector() {
    assert_eq!(
        sanitize("`a`e`i`o`u`"),
        "(((\"`\" + `a`) + (\"`\" + (`e` + \"`\"))) + ((`i` + (\"`\" + `o`)) + (\"`\" + (`u` + \"`\"))))"
    );
}

#[test]
fn test_bom_vector() {
    assert_eq!(
        sanitize("\u{FEFF}`s away!"),
        "(\"\\xEF\\xBB\\xBF\" + (\"`\" + `s away!`))"
    );
    // through the full encoder a BOM is a format character, so it escapes
    let encoded = encode("\u{FEFF}`s away!".as_bytes());
    assert_eq!(encoded.kind, LiteralKind::Escaped);
    assert_eq!(encoded.literal, "\"\\xef\\xbb\\xbf`s away!\"");
}

#[test]
fn test_invalid_utf8_falls_back() {
    let blob = b"valid prefix \xc3\x28 then invalid";
    let encoded = encode(blob);
    assert_eq!(encoded.kind, LiteralKind::Escaped);
    assert_eq!(from_str(&encoded.literal).unwrap(), blob);
}

#[test]
fn test_multibyte_text_stays_raw() {
    let text = "naïve café 日本語 😀 `tick`";
    let encoded = encode(text.as_bytes());
    assert_eq!(encoded.kind, LiteralKind::Raw);
    assert!(encoded.literal.contains("日本語"));
    assert_eq!(from_str(&encoded.literal).unwrap(), text.as_bytes());
}

#[test]
fn test_materialize_gzip_abc() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out").join("bin");

    materialize(&compress(b"abc", 6).unwrap(), &target).unwrap();
    assert_eq!(fs::read(&target).unwrap(), b"abc");
    assert!(!dir.path().join("out").join("bin.tmp").exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}

#[test]
fn test_materialize_corrupt_gzip() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out").join("bin");

    let mut corrupt = compress(b"abc", 6).unwrap();
    let mid = corrupt.len() / 2;
    corrupt.truncate(mid);

    let err = materialize(&corrupt, &target).unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
    assert!(!target.exists());
}

#[test]
fn test_declaration_and_metadata_layout() {
    let mut out = Vec::new();
    to_writer(&mut out, b"abc", &EncodeOptions::default()).unwrap();
    let text = String::from_utf8(out).unwrap();
    println!("Declaration:\n{}", text);

    assert!(text.starts_with("var data = []byte(`abc`)\n"));
    assert!(text.contains("size: 3, mode: os.FileMode(0644), modTime: time.Unix(0, 0)"));
    assert!(text.contains("digest: [32]uint8{0xba, 0x78, 0x16, 0xbf,"));
}
