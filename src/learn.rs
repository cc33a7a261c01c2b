//! Learn session state machine.
//!
//! A learn session is the transient interaction that captures a new or
//! redefined command from a physical remote. The device does the actual
//! capture; this module only tracks the lifecycle so the app can gate
//! concurrent attempts and drive the two naming sub-protocols:
//!
//! - **name-first**: the name is sent with the learn request and the device
//!   stores the command itself on success;
//! - **name-after**: the capture runs anonymously and the user supplies a
//!   name afterwards, persisted via a separate save call.
//!
//! Only one session may be active at a time. On success the new command is
//! picked up by the next repository refresh — the session never synthesizes
//! a Command locally.

use crate::device::DeviceError;

/// How the device should group captured signals into steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnMode {
    /// One capture, one step
    Single,
    /// Multi-step: the device groups repeated presses into a sequence
    Normal,
    /// Step-paced: each press is confirmed as its own step
    Step,
}

impl LearnMode {
    pub const ALL: [LearnMode; 3] = [LearnMode::Single, LearnMode::Normal, LearnMode::Step];

    /// The `mode` query value the firmware expects.
    pub fn as_query(&self) -> &'static str {
        match self {
            LearnMode::Single => "single",
            LearnMode::Normal => "normal",
            LearnMode::Step => "step",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LearnMode::Single => "Single press",
            LearnMode::Normal => "Sequence",
            LearnMode::Step => "Step-by-step",
        }
    }
}

/// Lifecycle of a learn session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LearnPhase {
    /// No session
    Idle,
    /// begin() accepted; learn request not yet issued
    Requested,
    /// Device-side capture in progress (request in flight)
    Capturing,
    /// Device reported an outcome; session ends after the follow-up
    /// (naming and/or refresh) completes
    Completed(LearnOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LearnOutcome {
    /// Device stored a command. `named` is false for the name-after
    /// protocol until the user has supplied a name.
    Stored { named: bool },
    /// Capture failed: device timeout, capture error, or user cancel
    Failed(String),
}

/// Transient capture-and-confirm interaction. Not persisted.
#[derive(Debug)]
pub struct LearnSession {
    phase: LearnPhase,
    mode: LearnMode,
    /// Name supplied up front (name-first), if any
    proposed_name: Option<String>,
}

impl LearnSession {
    pub fn new() -> Self {
        Self {
            phase: LearnPhase::Idle,
            mode: LearnMode::Normal,
            proposed_name: None,
        }
    }

    pub fn phase(&self) -> &LearnPhase {
        &self.phase
    }

    pub fn mode(&self) -> LearnMode {
        self.mode
    }

    pub fn proposed_name(&self) -> Option<&str> {
        self.proposed_name.as_deref()
    }

    /// A session is active from begin() until finish(). Completed-but-unnamed
    /// still counts: the capture is holding the device's staging slot.
    pub fn is_active(&self) -> bool {
        self.phase != LearnPhase::Idle
    }

    /// Start a session. `proposed_name` empty or None selects the name-after
    /// protocol. Fails with `Busy` while another session is active.
    pub fn begin(&mut self, mode: LearnMode, proposed_name: Option<String>) -> Result<(), DeviceError> {
        if self.is_active() {
            return Err(DeviceError::Busy);
        }
        let proposed_name = proposed_name.filter(|n| !n.is_empty());
        tracing::info!(
            "Learn session started: mode={} name={:?}",
            mode.as_query(),
            proposed_name
        );
        self.mode = mode;
        self.proposed_name = proposed_name;
        self.phase = LearnPhase::Requested;
        Ok(())
    }

    /// The learn request has been handed to the transport.
    pub fn mark_capturing(&mut self) {
        debug_assert_eq!(self.phase, LearnPhase::Requested);
        self.phase = LearnPhase::Capturing;
    }

    /// Device reported a stored command.
    pub fn complete_stored(&mut self) {
        let named = self.proposed_name.is_some();
        self.phase = LearnPhase::Completed(LearnOutcome::Stored { named });
    }

    /// Device reported a failure (or the transport timed out).
    pub fn complete_failed(&mut self, reason: impl Into<String>) {
        self.phase = LearnPhase::Completed(LearnOutcome::Failed(reason.into()));
    }

    /// Explicit user cancellation before or during capture.
    pub fn cancel(&mut self) {
        if self.is_active() {
            tracing::info!("Learn session cancelled");
            self.phase = LearnPhase::Completed(LearnOutcome::Failed("cancelled".to_string()));
        }
    }

    /// True when the capture succeeded but still needs a name (name-after).
    pub fn needs_name(&self) -> bool {
        matches!(
            self.phase,
            LearnPhase::Completed(LearnOutcome::Stored { named: false })
        )
    }

    /// The user supplied the post-capture name and it was saved.
    pub fn name_saved(&mut self) {
        if self.needs_name() {
            self.phase = LearnPhase::Completed(LearnOutcome::Stored { named: true });
        }
    }

    /// Close the session and return to Idle. Called after the repository
    /// refresh that merges the learned command.
    pub fn finish(&mut self) {
        self.phase = LearnPhase::Idle;
        self.proposed_name = None;
    }
}

impl Default for LearnSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_first_lifecycle() {
        let mut session = LearnSession::new();
        assert!(!session.is_active());

        session
            .begin(LearnMode::Normal, Some("tv_on".to_string()))
            .unwrap();
        assert!(session.is_active());
        assert_eq!(session.proposed_name(), Some("tv_on"));

        session.mark_capturing();
        session.complete_stored();
        assert!(!session.needs_name());

        session.finish();
        assert!(!session.is_active());
    }

    #[test]
    fn test_name_after_needs_name() {
        let mut session = LearnSession::new();
        session.begin(LearnMode::Single, None).unwrap();
        session.mark_capturing();
        session.complete_stored();
        assert!(session.needs_name());

        session.name_saved();
        assert!(!session.needs_name());
        session.finish();
        assert!(!session.is_active());
    }

    #[test]
    fn test_empty_proposed_name_is_name_after() {
        let mut session = LearnSession::new();
        session.begin(LearnMode::Step, Some(String::new())).unwrap();
        assert_eq!(session.proposed_name(), None);
        session.mark_capturing();
        session.complete_stored();
        assert!(session.needs_name());
    }

    #[test]
    fn test_begin_while_capturing_is_busy() {
        let mut session = LearnSession::new();
        session.begin(LearnMode::Normal, None).unwrap();
        session.mark_capturing();

        let err = session.begin(LearnMode::Single, None).unwrap_err();
        assert!(matches!(err, DeviceError::Busy));
        // Original session untouched
        assert_eq!(*session.phase(), LearnPhase::Capturing);
    }

    #[test]
    fn test_begin_while_awaiting_name_is_busy() {
        let mut session = LearnSession::new();
        session.begin(LearnMode::Normal, None).unwrap();
        session.mark_capturing();
        session.complete_stored();
        assert!(session.needs_name());

        let err = session.begin(LearnMode::Normal, None).unwrap_err();
        assert!(matches!(err, DeviceError::Busy));
    }

    #[test]
    fn test_cancel_and_failure() {
        let mut session = LearnSession::new();
        session.begin(LearnMode::Normal, None).unwrap();
        session.cancel();
        assert!(matches!(
            session.phase(),
            LearnPhase::Completed(LearnOutcome::Failed(_))
        ));
        session.finish();

        session.begin(LearnMode::Normal, None).unwrap();
        session.mark_capturing();
        session.complete_failed("device timeout");
        assert!(!session.needs_name());
        session.finish();
        assert!(!session.is_active());
    }
}
