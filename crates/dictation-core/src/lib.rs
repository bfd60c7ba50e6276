//! Core domain for dictation practice.
//!
//! Holds the word and settings types, the shared in-memory stores the
//! playback controller reads from, the observable playback state, and the
//! port traits that platform adapters (speech synthesis, clip output,
//! persistence, authentication) implement. Nothing in here touches audio
//! hardware or the filesystem, except the path helpers in [`paths`].

pub mod domain;
pub mod events;
pub mod export;
pub mod paths;
pub mod ports;
pub mod settings;
pub mod store;

// Re-export commonly used types for convenience
pub use domain::{Word, WordError, WordList};
pub use events::{PlaybackPhase, PlaybackSnapshot};
pub use export::{EXPORT_FILE_NAME, export_words, parse_word_lines};
pub use paths::{PathError, data_root, session_path, user_dir, users_path};
pub use ports::{
    AlwaysAuthenticated, AuthError, AuthGate, ClipError, ClipOutput, ClipSource, CoreError,
    RepositoryError, SettingsRepository, SpeechSynthesizer, SynthError, SynthVoice, Utterance,
    WordListRepository,
};
pub use settings::{
    PlaybackSettings, Pronunciation, SettingsError, SettingsUpdate, validate_settings,
};
pub use store::{SettingsStore, WordListStore};
