//! Header sniffing over a non-seekable stream.
//!
//! Run with:
//!     RUST_LOG=debug cargo run --example sniff_header

use std::io::{self, Read};

use rewindrs::{DstBuf, IoSource, ReadStatus, RewindableReader};

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const ZSTD_MAGIC: &[u8] = &[0x28, 0xb5, 0x2f, 0xfd];

/// Stands in for a socket: hands out at most 3 bytes per read.
struct Trickle<R>(R);

impl<R: Read> Read for Trickle<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len().min(3);
        self.0.read(&mut buf[..len])
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut payload = ZSTD_MAGIC.to_vec();
    payload.extend_from_slice(b" compressed frame data would follow here");

    let source = IoSource::new(Trickle(io::Cursor::new(payload.clone())));
    let mut reader = RewindableReader::new(source);

    // Sources may return short reads, so loop until the header is complete.
    let mut storage = [0u8; 4];
    let mut header = DstBuf::new(&mut storage);
    while header.remaining() > 0 {
        if reader.read_buf(&mut header)? == ReadStatus::Eof {
            break;
        }
    }

    let format = if header.filled().starts_with(GZIP_MAGIC) {
        "gzip"
    } else if header.filled().starts_with(ZSTD_MAGIC) {
        "zstd"
    } else {
        "unknown"
    };
    println!("Detected format: {}", format);
    println!("Retained for replay: {} bytes\n", reader.retained_len());

    // The decoder needs the magic too, so replay it and stop retaining.
    reader.rewind()?;
    reader.disable_rewinding();

    let mut body = Vec::new();
    reader.read_to_end(&mut body)?;
    assert_eq!(body, payload);

    println!("Forwarded {} bytes to the {} decoder", body.len(), format);
    reader.close()?;
    Ok(())
}
