//! Buffer management for retention and replay.
//!
//! - [`DstBuf`] - Destination cursor with a fill position and a limit
//! - `Retained` - Internal append-only arena with a replay cursor

mod dst;
mod retained;

pub use dst::DstBuf;

pub(crate) use dst::copy_available;
pub(crate) use retained::Retained;
