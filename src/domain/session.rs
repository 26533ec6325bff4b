//! Capture session state machine

use std::fmt;
use thiserror::Error;

/// Capture states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Recording,
    StoppedWithData,
    StoppedEmpty,
}

impl CaptureState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::StoppedWithData => "stopped",
            Self::StoppedEmpty => "stopped (empty)",
        }
    }

    /// True for either stopped state
    pub const fn is_stopped(&self) -> bool {
        matches!(self, Self::StoppedWithData | Self::StoppedEmpty)
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: CaptureState,
    pub action: String,
}

/// Capture session entity.
/// Owns the lifecycle of one recording attempt.
///
/// State machine:
///   IDLE -> RECORDING (start)
///   RECORDING -> STOPPED_WITH_DATA (stop, at least one chunk arrived)
///   RECORDING -> STOPPED_EMPTY (stop, zero chunks arrived)
///   RECORDING | STOPPED_* -> IDLE (discard)
#[derive(Debug, Default)]
pub struct CaptureSession {
    state: CaptureState,
}

impl CaptureSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self {
            state: CaptureState::Idle,
        }
    }

    /// Get the current state
    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == CaptureState::Idle
    }

    pub fn is_recording(&self) -> bool {
        self.state == CaptureState::Recording
    }

    /// Transition from IDLE to RECORDING
    pub fn start(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != CaptureState::Idle {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "start recording".to_string(),
            });
        }
        self.state = CaptureState::Recording;
        Ok(())
    }

    /// Device acquisition failed after `start`; the attempt is over and the
    /// session must not be left stuck in RECORDING.
    pub fn abort_start(&mut self) {
        if self.state == CaptureState::Recording {
            self.state = CaptureState::Idle;
        }
    }

    /// Transition from RECORDING to a stopped state, depending on whether any
    /// chunks arrived.
    pub fn stop(&mut self, chunk_count: usize) -> Result<CaptureState, InvalidStateTransition> {
        if self.state != CaptureState::Recording {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "stop recording".to_string(),
            });
        }
        self.state = if chunk_count > 0 {
            CaptureState::StoppedWithData
        } else {
            CaptureState::StoppedEmpty
        };
        Ok(self.state)
    }

    /// Return to IDLE, dropping any buffered capture.
    ///
    /// Valid from either stopped state and from RECORDING (cancelling an
    /// in-flight capture); only IDLE rejects it.
    pub fn discard(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state == CaptureState::Idle {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "discard recording".to_string(),
            });
        }
        self.state = CaptureState::Idle;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_idle() {
        let session = CaptureSession::new();
        assert!(session.is_idle());
        assert!(!session.is_recording());
    }

    #[test]
    fn start_from_idle() {
        let mut session = CaptureSession::new();
        assert!(session.start().is_ok());
        assert!(session.is_recording());
    }

    #[test]
    fn start_while_recording_fails() {
        let mut session = CaptureSession::new();
        session.start().unwrap();

        let err = session.start().unwrap_err();
        assert_eq!(err.current_state, CaptureState::Recording);
        assert!(err.action.contains("start recording"));
    }

    #[test]
    fn start_from_stopped_fails() {
        let mut session = CaptureSession::new();
        session.start().unwrap();
        session.stop(3).unwrap();

        let err = session.start().unwrap_err();
        assert_eq!(err.current_state, CaptureState::StoppedWithData);
    }

    #[test]
    fn stop_with_chunks_lands_in_stopped_with_data() {
        let mut session = CaptureSession::new();
        session.start().unwrap();

        let state = session.stop(5).unwrap();
        assert_eq!(state, CaptureState::StoppedWithData);
        assert!(state.is_stopped());
    }

    #[test]
    fn stop_without_chunks_lands_in_stopped_empty() {
        let mut session = CaptureSession::new();
        session.start().unwrap();

        let state = session.stop(0).unwrap();
        assert_eq!(state, CaptureState::StoppedEmpty);
        assert!(state.is_stopped());
    }

    #[test]
    fn stop_from_idle_fails() {
        let mut session = CaptureSession::new();

        let err = session.stop(1).unwrap_err();
        assert_eq!(err.current_state, CaptureState::Idle);
    }

    #[test]
    fn discard_from_stopped_with_data() {
        let mut session = CaptureSession::new();
        session.start().unwrap();
        session.stop(2).unwrap();

        assert!(session.discard().is_ok());
        assert!(session.is_idle());
    }

    #[test]
    fn discard_from_stopped_empty() {
        let mut session = CaptureSession::new();
        session.start().unwrap();
        session.stop(0).unwrap();

        assert!(session.discard().is_ok());
        assert!(session.is_idle());
    }

    #[test]
    fn discard_cancels_in_flight_recording() {
        let mut session = CaptureSession::new();
        session.start().unwrap();

        assert!(session.discard().is_ok());
        assert!(session.is_idle());
    }

    #[test]
    fn discard_from_idle_fails() {
        let mut session = CaptureSession::new();

        let err = session.discard().unwrap_err();
        assert_eq!(err.current_state, CaptureState::Idle);
    }

    #[test]
    fn abort_start_returns_to_idle() {
        let mut session = CaptureSession::new();
        session.start().unwrap();
        session.abort_start();
        assert!(session.is_idle());

        // A fresh attempt works after the aborted one
        assert!(session.start().is_ok());
    }

    #[test]
    fn full_cycle() {
        let mut session = CaptureSession::new();
        session.start().unwrap();
        session.stop(1).unwrap();
        session.discard().unwrap();
        assert!(session.is_idle());

        // Can start another cycle
        session.start().unwrap();
        assert!(session.is_recording());
    }

    #[test]
    fn state_display() {
        assert_eq!(CaptureState::Idle.to_string(), "idle");
        assert_eq!(CaptureState::Recording.to_string(), "recording");
        assert_eq!(CaptureState::StoppedWithData.to_string(), "stopped");
        assert_eq!(CaptureState::StoppedEmpty.to_string(), "stopped (empty)");
    }

    #[test]
    fn error_display() {
        let err = InvalidStateTransition {
            current_state: CaptureState::Recording,
            action: "start recording".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("start recording"));
        assert!(msg.contains("recording"));
    }
}
