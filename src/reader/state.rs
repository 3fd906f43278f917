//! Reader lifecycle shared by the sync and async readers.

/// Lifecycle of a reader. Transitions only move forward:
/// `Rewindable -> Disabled -> Closed` or `Rewindable -> Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    /// Fetched bytes are retained and rewinding is allowed.
    Rewindable,
    /// Rewinding was relinquished; pending arena bytes drain, then reads go direct.
    Disabled,
    Closed,
}

impl State {
    /// Checks that a rewind is allowed from this state.
    pub(crate) fn check_rewind(self) -> Result<(), crate::RewindError> {
        match self {
            State::Closed => Err(crate::RewindError::IllegalState("cannot rewind: closed")),
            State::Disabled => Err(crate::RewindError::IllegalState(
                "cannot rewind: rewinding disabled",
            )),
            State::Rewindable => Ok(()),
        }
    }
}
