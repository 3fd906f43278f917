//! Async rewindable reading.
//!
//! This module provides the rewindable reader over `futures-io::AsyncRead`,
//! making it runtime-agnostic and compatible with tokio (via `tokio-util`
//! compat), async-std, smol, and other async runtimes.
//!
//! - [`AsyncRewindableReader`] - Async counterpart of [`RewindableReader`](crate::RewindableReader)
//!
//! This module requires the `async-io` feature to be enabled.

mod reader;

pub use reader::AsyncRewindableReader;
