//! Async header sniffing with tokio.
//!
//! Run with:
//!     cargo run --example async_sniff --features async-io

use futures_util::io::AsyncReadExt;
use rewindrs::AsyncRewindableReader;
use tokio::io::AsyncWriteExt;
use tokio_util::compat::TokioAsyncReadCompatExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let (client, mut server) = tokio::io::duplex(64);

    tokio::spawn(async move {
        server.write_all(b"PROXY TCP4 ").await?;
        server.write_all(b"10.0.0.1 10.0.0.2 5000 80\r\nGET / HTTP/1.1\r\n\r\n").await?;
        server.shutdown().await
    });

    let mut reader = AsyncRewindableReader::new(client.compat());

    let mut preamble = [0u8; 6];
    reader.read_exact(&mut preamble).await?;
    let proxied = &preamble == b"PROXY ";
    println!("PROXY protocol header: {}", proxied);

    // Let the protocol handler see the stream from the start.
    reader.rewind()?;
    reader.disable_rewinding();

    let mut request = String::new();
    reader.read_to_string(&mut request).await?;
    print!("{}", request);

    Ok(())
}
