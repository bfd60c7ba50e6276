//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from
//! infrastructure: the platform speech engine, the clip output device,
//! persistence and the authentication gate.
//!
//! # Design Rules
//!
//! - No audio-library or filesystem types in any signature
//! - Platform traits expose raw capabilities; reliability policy (retries,
//!   safety timeouts, stale-callback guards) lives in the adapters that wrap
//!   them, not here
//! - Repositories work with domain types and hide serialisation

pub mod auth;
pub mod clip;
pub mod repository;
pub mod speech;

use thiserror::Error;

pub use auth::{AlwaysAuthenticated, AuthError, AuthGate};
pub use clip::{ClipError, ClipOutput, ClipSource};
pub use repository::{SettingsRepository, WordListRepository};
pub use speech::{SpeechSynthesizer, SynthError, SynthVoice, Utterance};

/// Domain-specific errors for repository operations.
///
/// Abstracts away storage details (file I/O, JSON) so callers only deal with
/// semantic failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage backend error (filesystem, permissions, etc.).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Core error type for semantic domain errors.
///
/// Adapters map this to their own error types (CLI exit codes, etc.).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Settings validation error.
    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),

    /// Invalid word input.
    #[error(transparent)]
    Word(#[from] crate::domain::WordError),

    /// Authentication failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Path resolution failure.
    #[error(transparent)]
    Path(#[from] crate::paths::PathError),
}
