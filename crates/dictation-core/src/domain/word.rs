//! A single practice item.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing a [`Word`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    /// The text was empty after trimming whitespace.
    #[error("Word text cannot be empty")]
    EmptyText,
}

/// A word or phrase to be dictated, optionally paired with a recorded clip.
///
/// Serialised as `{ "text": "...", "audioUrl": "..." }` with `audioUrl`
/// omitted when absent, which is the layout of persisted word lists.
/// Deserialising applies the same trim and non-empty rule as [`Word::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WordRecord")]
pub struct Word {
    text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    audio_url: Option<String>,
}

/// Unchecked wire form of a [`Word`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WordRecord {
    text: String,

    #[serde(default)]
    audio_url: Option<String>,
}

impl TryFrom<WordRecord> for Word {
    type Error = WordError;

    fn try_from(record: WordRecord) -> Result<Self, Self::Error> {
        match record.audio_url {
            Some(url) => Self::with_audio(record.text, url),
            None => Self::new(record.text),
        }
    }
}

impl Word {
    /// Create a text-only word. The text is trimmed.
    pub fn new(text: impl AsRef<str>) -> Result<Self, WordError> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return Err(WordError::EmptyText);
        }
        Ok(Self {
            text: text.to_string(),
            audio_url: None,
        })
    }

    /// Create a word that replays a recorded clip instead of synthesised speech.
    pub fn with_audio(text: impl AsRef<str>, audio_url: impl Into<String>) -> Result<Self, WordError> {
        let mut word = Self::new(text)?;
        word.audio_url = Some(audio_url.into());
        Ok(word)
    }

    /// The word's text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The recorded clip handle, if any.
    pub fn audio_url(&self) -> Option<&str> {
        self.audio_url.as_deref()
    }

    /// Whether playback of this word uses a recorded clip.
    pub const fn has_audio(&self) -> bool {
        self.audio_url.is_some()
    }
}
