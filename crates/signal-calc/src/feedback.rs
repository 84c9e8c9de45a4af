//! Tactile feedback on key presses
//!
//! Feedback is fire-and-forget: a failing device never blocks or fails the
//! key action it accompanies.

use thiserror::Error;

/// Strength of a feedback pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    /// Short tick for an ordinary tap
    Selection,
    /// Light impact for a long press
    LightImpact,
}

/// A feedback device refused or failed to play a pulse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("feedback unavailable: {reason}")]
pub struct FeedbackError {
    /// Why the device failed
    pub reason: String,
}

impl FeedbackError {
    /// Creates a feedback error
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A device that can play feedback pulses
pub trait Feedback {
    /// Plays one pulse
    fn play(&mut self, kind: FeedbackKind) -> Result<(), FeedbackError>;
}

/// Plays a pulse and discards any failure
pub fn fire_and_forget(feedback: &mut dyn Feedback, kind: FeedbackKind) {
    if let Err(err) = feedback.play(kind) {
        tracing::debug!(?kind, %err, "feedback failed; ignoring");
    }
}

/// Feedback device that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeedback;

impl Feedback for NoFeedback {
    fn play(&mut self, _kind: FeedbackKind) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// Feedback device that records pulses, optionally failing every one
#[derive(Debug, Clone, Default)]
pub struct RecordingFeedback {
    /// Pulses requested so far, including failed ones
    pub played: Vec<FeedbackKind>,
    /// When set, every pulse fails with this reason
    pub fail_with: Option<String>,
}

impl RecordingFeedback {
    /// Creates a recorder that succeeds
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder whose pulses always fail
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            played: Vec::new(),
            fail_with: Some(reason.into()),
        }
    }
}

impl Feedback for RecordingFeedback {
    fn play(&mut self, kind: FeedbackKind) -> Result<(), FeedbackError> {
        self.played.push(kind);
        match &self.fail_with {
            Some(reason) => Err(FeedbackError::new(reason.clone())),
            None => Ok(()),
        }
    }
}
