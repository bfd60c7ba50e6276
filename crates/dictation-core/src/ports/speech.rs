//! Platform speech-synthesis port.
//!
//! This is the raw engine capability (the equivalent of a system TTS
//! service). It is deliberately thin: no retries, no timeouts, no
//! cancellation bookkeeping. `dictation-voice::SpeechEngine` owns exactly one
//! instance and layers those concerns on top.

use async_trait::async_trait;
use thiserror::Error;

/// A voice offered by the platform engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthVoice {
    /// Engine-specific voice identifier.
    pub name: String,

    /// BCP-47 language tag, e.g. `"en-US"` or `"zh-HK"`.
    pub lang: String,

    /// Whether the engine marks this voice as its default.
    pub is_default: bool,
}

impl SynthVoice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
            is_default: false,
        }
    }

    /// Mark this voice as the engine default.
    #[must_use]
    pub const fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}

/// One request to speak a piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,

    /// Requested language tag.
    pub lang: String,

    /// Rate multiplier (1.0 = engine default speed).
    pub rate: f32,

    /// Voice to use; `None` lets the engine pick from `lang`.
    pub voice: Option<String>,
}

/// Errors reported by a speech engine.
#[derive(Debug, Clone, Error)]
pub enum SynthError {
    /// No speech capability on this platform.
    #[error("Speech synthesis is not available")]
    Unavailable,

    /// The engine reported a failure for this utterance.
    #[error("Speech engine error: {0}")]
    Engine(String),

    /// The utterance was cancelled before it finished.
    #[error("Utterance interrupted")]
    Interrupted,
}

/// Platform text-to-speech engine.
///
/// # Contract
///
/// - `speak` resolves when the engine reports the end of the utterance or an
///   error. Engines are allowed to misbehave: a `speak` future may never
///   resolve, so callers must guard it with their own timeout.
/// - `cancel` stops whatever the engine is saying. A `speak` in flight may
///   then resolve (with `Ok` or [`SynthError::Interrupted`]) or stay pending.
/// - `voices` may be empty until the engine has finished loading its voice
///   list.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Whether the platform has any speech capability at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Voices currently known to the engine.
    fn voices(&self) -> Vec<SynthVoice>;

    /// Speak an utterance, resolving when the engine signals completion.
    async fn speak(&self, utterance: &Utterance) -> Result<(), SynthError>;

    /// Cancel any utterance in flight.
    fn cancel(&self);
}
