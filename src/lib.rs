//! rewindrs
//!
//! Rewindable byte-stream reading for Rust.
//!
//! `rewindrs` wraps a sequential byte source so that a consumer can peek at a
//! prefix of the stream, decide what it is, and then re-read that prefix as
//! part of normal forward processing. It is designed as a small, composable
//! primitive for:
//!
//! - header sniffing in front of decryption or decompression layers
//! - container and format detection
//! - protocol negotiation on non-seekable transports
//!
//! The crate intentionally:
//! - does NOT implement byte sources (files, sockets, decrypted streams)
//! - does NOT seek to arbitrary offsets; rewinding always returns to the start
//! - does NOT retry or block on its own; the source's partial reads and
//!   "no data right now" results are passed through unchanged
//!
//! It only does one thing: **fetch once → replay on demand**
//!
//! # Sync
//!
//! ```
//! use rewindrs::{IoSource, ReadStatus, RewindError, RewindableReader};
//!
//! fn main() -> Result<(), RewindError> {
//!     let data = &b"\x89PNG\r\n\x1a\n...rest of the image"[..];
//!     let mut reader = RewindableReader::new(IoSource::new(data));
//!
//!     let mut magic = [0u8; 8];
//!     assert_eq!(reader.read(&mut magic)?, ReadStatus::Read(8));
//!     let is_png = magic.starts_with(b"\x89PNG");
//!
//!     // Hand the whole stream, magic included, to the next layer.
//!     reader.rewind()?;
//!     reader.disable_rewinding();
//!     assert!(is_png);
//!     Ok(())
//! }
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use futures_util::io::AsyncReadExt;
//! use rewindrs::AsyncRewindableReader;
//!
//! async fn demo<R: futures_io::AsyncRead + Unpin>(inner: R) -> std::io::Result<()> {
//!     let mut reader = AsyncRewindableReader::new(inner);
//!     let mut magic = [0u8; 4];
//!     reader.read_exact(&mut magic).await?;
//!     reader.rewind()?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod reader;
mod source;

mod buffer; // internal arena + public destination cursor

#[cfg(feature = "async-io")]
mod async_io;

//
// Public surface (intentionally tiny)
//

pub use buffer::DstBuf;
pub use config::{DEFAULT_INITIAL_CAPACITY, RewindConfig};
pub use error::RewindError;
pub use reader::RewindableReader;
pub use source::{ByteSource, IoSource, ReadStatus};

#[cfg(feature = "async-io")]
pub use async_io::AsyncRewindableReader;
