//! Voice backend error types.

/// Errors raised while setting up or driving a platform backend.
///
/// Playback itself never surfaces these: the speech adapter and clip player
/// turn failures into outcomes. They appear when constructing backends.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// Failed to open the audio output stream.
    #[error("Failed to open audio output stream: {0}")]
    OutputStreamError(String),

    /// The dedicated audio thread is gone.
    #[error("Audio thread is not running")]
    AudioThreadDied,

    /// No espeak-ng or espeak binary on `PATH`.
    #[error("No speech engine found (tried {0})")]
    EngineNotFound(String),

    /// The speech engine process failed.
    #[error("Speech engine process failed: {0}")]
    EngineProcess(String),

    /// IO error (clip files, child processes).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
