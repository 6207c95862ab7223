//! Open/close session tracking.
//!
//! Drivers embed a [`Session`] to apply the HAL lifecycle policy:
//!
//! - `open` on a closed instrument opens it.
//! - `open` on an open instrument is a contract violation ([`HalError::AlreadyOpen`]).
//! - `close` on an open instrument closes it; on a closed one it does nothing.

use tracing::debug;

use crate::error::{HalError, HalResult};

/// Lifecycle state of an instrument session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No communication established (initial state).
    #[default]
    Closed,
    /// Communication established.
    Open,
}

/// Session state holder shared by driver implementations.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
}

impl Session {
    /// Create a closed session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True while open.
    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    /// Mark the session open, rejecting a second open.
    pub fn open(&mut self, instrument: &str) -> HalResult<()> {
        if self.is_open() {
            return Err(HalError::AlreadyOpen(instrument.to_string()));
        }
        self.state = SessionState::Open;
        debug!(instrument, "session opened");
        Ok(())
    }

    /// Mark the session closed. Returns whether it was open.
    pub fn close(&mut self, instrument: &str) -> bool {
        let was_open = self.is_open();
        self.state = SessionState::Closed;
        if was_open {
            debug!(instrument, "session closed");
        }
        was_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close_cycle() {
        let mut session = Session::new();
        assert_eq!(session.state(), SessionState::Closed);

        session.open("laser").unwrap();
        assert!(session.is_open());
        assert!(session.close("laser"));
        assert!(!session.is_open());

        // Re-open after close is allowed
        session.open("laser").unwrap();
    }

    #[test]
    fn test_double_open_rejected() {
        let mut session = Session::new();
        session.open("voa").unwrap();
        let err = session.open("voa").unwrap_err();
        assert!(matches!(err, HalError::AlreadyOpen(ref name) if name == "voa"));
        // Still open after the rejected call
        assert!(session.is_open());
    }

    #[test]
    fn test_close_when_closed_is_noop() {
        let mut session = Session::new();
        assert!(!session.close("switch"));
        assert!(!session.close("switch"));
    }
}
