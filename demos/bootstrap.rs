//! Encode a payload, read it back from the literal and unpack it at "startup".
//!
//! Run with: cargo run --example bootstrap

use go_bindata::{
    compress, encode_with_options, from_str, materialize_with_options, EncodeOptions,
    UnpackOptions,
};
use std::error::Error;
use std::fs;

fn main() -> Result<(), Box<dyn Error>> {
    let engine = b"#!/bin/sh\necho `query engine` ready\r\n".to_vec();

    // Build time: the literal is what lands in the generated source
    let encoded = encode_with_options(&engine, &EncodeOptions::new().with_compression(9))?;
    println!("literal ({:?}, {} bytes):\n{}\n", encoded.kind, encoded.literal.len(), encoded.literal);

    // Run time: the compiled program holds the literal's bytes
    let payload = from_str(&encoded.literal)?;
    assert_eq!(payload, compress(&engine, 9)?);

    let dir = tempfile::tempdir()?;
    let target = dir.path().join("prisma").join("query-engine");
    let options = UnpackOptions::new().with_digest(encoded.digest);
    materialize_with_options(&payload, &target, &options)?;

    assert_eq!(fs::read(&target)?, engine);
    println!("✓ unpacked to {}", target.display());
    Ok(())
}
