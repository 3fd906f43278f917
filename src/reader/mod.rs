//! Rewindable reader over a [`ByteSource`](crate::ByteSource).
//!
//! - [`RewindableReader`] - Retains fetched bytes so a prefix can be re-read

mod rewindable;
mod state;

pub use rewindable::RewindableReader;

pub(crate) use state::State;
