//! Platform clip-output port.
//!
//! Plays pre-recorded audio for words that carry an `audioUrl`.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

/// Scheme prefix for temporary in-memory clip handles.
pub const BLOB_SCHEME: &str = "blob:";

const FILE_SCHEME: &str = "file://";

/// Where a clip's audio comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClipSource {
    /// An audio file on disk.
    File(PathBuf),

    /// A temporary in-memory handle (`blob:<id>`). Playing one acquires a
    /// native resource that must be released explicitly.
    Blob(String),
}

impl ClipSource {
    /// Interpret a word's `audioUrl`.
    ///
    /// `blob:` URLs are temporary handles, `file://` URLs and bare paths are
    /// files.
    pub fn parse(url: &str) -> Self {
        let url = url.trim();
        if url.starts_with(BLOB_SCHEME) {
            Self::Blob(url.to_string())
        } else if let Some(path) = url.strip_prefix(FILE_SCHEME) {
            Self::File(PathBuf::from(path))
        } else {
            Self::File(PathBuf::from(url))
        }
    }

    /// Whether playback of this source acquires a resource that must be
    /// released afterwards.
    pub const fn is_temporary(&self) -> bool {
        matches!(self, Self::Blob(_))
    }
}

impl fmt::Display for ClipSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Blob(url) => f.write_str(url),
        }
    }
}

/// Errors reported by a clip output.
#[derive(Debug, Clone, Error)]
pub enum ClipError {
    /// No audio output capability on this platform.
    #[error("Audio output is not available")]
    Unavailable,

    /// The source could not be found (missing file, revoked blob).
    #[error("Clip not found: {0}")]
    NotFound(String),

    /// The audio data could not be decoded.
    #[error("Failed to decode clip: {0}")]
    Decode(String),

    /// The output device failed.
    #[error("Audio output error: {0}")]
    Output(String),
}

/// Platform audio output for recorded clips.
///
/// # Contract
///
/// - `play` resolves when the clip ends naturally, or with an error when it
///   cannot start. After `halt` it may resolve or stay pending.
/// - `halt` pauses and rewinds whatever is playing.
/// - `release` frees the native resource acquired for a temporary source.
#[async_trait]
pub trait ClipOutput: Send + Sync {
    /// Whether the platform can play audio at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Play a clip to its end.
    async fn play(&self, source: &ClipSource) -> Result<(), ClipError>;

    /// Stop playback and rewind.
    fn halt(&self);

    /// Release resources acquired while playing a temporary source.
    fn release(&self, source: &ClipSource);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_blob_url() {
        let source = ClipSource::parse("blob:abc");
        assert_eq!(source, ClipSource::Blob("blob:abc".to_string()));
        assert!(source.is_temporary());
    }

    #[test]
    fn parse_file_url_and_bare_path() {
        assert_eq!(
            ClipSource::parse("file:///tmp/cat.wav"),
            ClipSource::File(PathBuf::from("/tmp/cat.wav"))
        );
        let bare = ClipSource::parse("clips/dog.ogg");
        assert_eq!(bare, ClipSource::File(PathBuf::from("clips/dog.ogg")));
        assert!(!bare.is_temporary());
    }

    #[test]
    fn display_round_trips_blob() {
        assert_eq!(ClipSource::parse("blob:xyz").to_string(), "blob:xyz");
    }
}
