use async_trait::async_trait;
use parla_core::Outcome;

#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("capability unavailable: {0}")]
    Unavailable(String),

    #[error("capability failed: {0}")]
    Failed(String),

    #[error("cancelled")]
    Cancelled,

    #[error("nothing to act on: last outcome is not a translation")]
    Refused,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Lifecycle notifications from speech capabilities
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    Started,
    Finished,
    Failed(String),
    Cancelled,
}

/// Write-only clipboard
pub trait Clipboard: Send + Sync {
    fn copy(&self, text: &str) -> Result<(), CapabilityError>;
}

/// Produces a single recognized utterance in the given language
#[async_trait]
pub trait SpeechCapture: Send + Sync {
    async fn capture(&self, lang: &str) -> Result<String, CapabilityError>;

    /// Abort an in-progress capture
    fn cancel(&self);
}

/// Renders text as audio
#[async_trait]
pub trait SpeechPlayback: Send + Sync {
    async fn speak(&self, text: &str, lang: &str) -> Result<(), CapabilityError>;

    /// Stop the current utterance
    fn cancel(&self);
}

/// Copy the last translation, refusing failure-shaped outcomes
pub fn copy_outcome(clipboard: &dyn Clipboard, outcome: &Outcome) -> Result<(), CapabilityError> {
    let (text, _) = outcome.actionable_text().ok_or(CapabilityError::Refused)?;
    clipboard.copy(text)
}

/// Speak the last translation in its target language, refusing failure-shaped outcomes
pub async fn speak_outcome(
    playback: &dyn SpeechPlayback,
    outcome: &Outcome,
) -> Result<(), CapabilityError> {
    let (text, lang) = outcome.actionable_text().ok_or(CapabilityError::Refused)?;
    playback.speak(text, lang).await
}
