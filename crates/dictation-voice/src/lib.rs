//! Dictation playback for the dictation-practice workspace.
//!
//! [`PlaybackController`] sequences the word list through two audio sources:
//! the platform speech engine (via [`SpeechEngine`]) for plain words and a
//! clip output (via [`ClipPlayer`]) for words with a recorded clip. Both
//! adapters are cancellable and turn every failure into an outcome, so the
//! controller only ever decides what to play next.
//!
//! Real platform backends live in [`backend`]: an espeak command synthesizer
//! and a rodio clip output on a dedicated audio thread.

pub mod audio_thread;
pub mod backend;
pub mod clip;
pub mod clip_registry;
pub mod controller;
pub mod error;
pub mod speech;
pub mod voices;

// Re-export key types for convenience
pub use backend::{EspeakSynthesizer, RodioClipOutput};
pub use clip::{ClipOutcome, ClipPlayer};
pub use clip_registry::{ClipBytes, ClipRegistry};
pub use controller::PlaybackController;
pub use error::VoiceError;
pub use speech::{SpeakOptions, SpeakOutcome, SpeechEngine, SpeechEngineConfig};
pub use voices::select_voice;
