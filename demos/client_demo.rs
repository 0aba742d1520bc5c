//! Sends one toy request through an obfuscated connection and prints the reply.
//!
//! Run `server_demo` first, then: `cargo run --example client_demo -- 127.0.0.1:10000`

use isl_cipher::{CipherSpec, Operation, Transform};
use isl_transport::{ObfuscatedReader, ObfuscatedWriter};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let addr = std::env::args().nth(1).unwrap_or_else(|| "127.0.0.1:10000".to_string());

    let spec = CipherSpec::new(vec![
        Operation::XorPos,
        Operation::AddPos,
        Operation::XorConst(0x9b),
    ]);
    let wire = spec.to_wire().ok_or("spec is not wire-encodable")?;

    let mut stream = TcpStream::connect(&addr).await?;
    stream.write_all(&wire).await?;

    let (read_half, write_half) = stream.into_split();
    // Both peers encode with the forward chain and decode with its inverse.
    let mut writer = ObfuscatedWriter::new(write_half, Transform::encoder(&spec));
    let mut reader = BufReader::new(ObfuscatedReader::new(read_half, Transform::decoder(&spec)));

    writer
        .write_all(b"10x toy car,15x dog on a string,4x inflatable motorcycle\n")
        .await?;
    writer.flush().await?;

    let mut reply = String::new();
    reader.read_line(&mut reply).await?;
    println!("server picked: {}", reply.trim_end());

    Ok(())
}
