//! Configuration for retention behavior.
//!
//! - [`RewindConfig`] - Arena pre-allocation and optional retention limit

use crate::error::RewindError;

/// Default initial capacity of the retained-byte arena (allocated lazily).
pub const DEFAULT_INITIAL_CAPACITY: usize = 0;

/// Configuration for a rewindable reader.
///
/// By default nothing is pre-allocated and retention is unbounded: every byte
/// fetched while rewinding is enabled is kept until [`disable_rewinding`] or
/// close.
///
/// With a `max_retained` limit, fresh source reads are capped so the arena never
/// grows past the limit, and a read that would need to exceed it fails with
/// [`RewindError::RetainLimitExceeded`].
///
/// [`disable_rewinding`]: crate::RewindableReader::disable_rewinding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RewindConfig {
    initial_capacity: usize,
    max_retained: Option<usize>,
}

impl RewindConfig {
    /// Creates a new configuration.
    ///
    /// Returns error if `max_retained` is zero or smaller than `initial_capacity`.
    pub fn new(initial_capacity: usize, max_retained: Option<usize>) -> Result<Self, RewindError> {
        if let Some(max) = max_retained {
            if max == 0 {
                return Err(RewindError::InvalidConfig {
                    message: "max_retained must be non-zero",
                });
            }

            if initial_capacity > max {
                return Err(RewindError::InvalidConfig {
                    message: "initial_capacity cannot be greater than max_retained",
                });
            }
        }

        Ok(Self {
            initial_capacity,
            max_retained,
        })
    }

    /// Sets the initial arena capacity.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets the retention limit.
    pub fn with_max_retained(mut self, limit: Option<usize>) -> Self {
        self.max_retained = limit;
        self
    }

    /// Returns the initial arena capacity.
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Returns the retention limit, if any.
    pub fn max_retained(&self) -> Option<usize> {
        self.max_retained
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), RewindError> {
        Self::new(self.initial_capacity, self.max_retained).map(|_| ())
    }
}

impl Default for RewindConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_retained: None,
        }
    }
}
