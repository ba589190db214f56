//! Generate the Go source that embeds one asset.
//!
//! Run with: cargo run --example embed_file -- <path> [platform]

use go_bindata::codegen::{write_file, Platform};
use go_bindata::EncodeOptions;
use std::env;
use std::error::Error;
use std::io;

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let path = args.next().ok_or("usage: embed_file <path> [platform]")?;
    let platform = Platform::new(&args.next().unwrap_or_else(|| "darwin".to_string()));

    let options = EncodeOptions::new().with_compression(9);
    let stdout = io::stdout();
    let info = write_file(&mut stdout.lock(), "query-engine", &platform, &path, &options)?;

    eprintln!("embedded {} bytes, sha256 {}", info.size, info.digest);
    Ok(())
}
