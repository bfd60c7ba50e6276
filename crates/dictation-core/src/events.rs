//! Observable playback state.
//!
//! The controller publishes a [`PlaybackSnapshot`] whenever its state
//! changes; UIs render from the latest snapshot instead of querying the
//! controller piecemeal.

use serde::{Deserialize, Serialize};

use crate::domain::Word;

/// What the controller is doing right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackPhase {
    /// Nothing audible and nothing scheduled.
    #[default]
    Idle,

    /// Synthesised speech for the current word is in flight.
    Speaking,

    /// A recorded clip for the current word is in flight.
    PlayingClip,

    /// Pausing between repetitions or between words.
    Waiting,
}

/// Point-in-time view of the playback state plus derived display fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    /// Index of the word that is (or will be) played.
    pub current_word_index: usize,

    /// Whether a dictation run is active.
    pub is_playing: bool,

    /// Current state-machine phase.
    pub phase: PlaybackPhase,

    /// 1-based repetition of the current word; 0 when idle.
    pub repetition: u32,

    /// The word at `current_word_index`, if the list is non-empty.
    pub current_word: Option<Word>,

    /// Number of words in the list.
    pub total_words: usize,

    /// Set once no speech or clip capability exists at all.
    pub playback_unavailable: bool,
}

impl PlaybackSnapshot {
    /// Progress through the list in percent, measured against the last index.
    ///
    /// The first word reads 0 % and the last word 100 %; lists with fewer
    /// than two words always read 0 %.
    pub fn progress_percent(&self) -> f32 {
        if self.total_words < 2 {
            return 0.0;
        }
        let last = self.total_words - 1;
        let index = self.current_word_index.min(last);
        #[allow(clippy::cast_precision_loss)]
        let percent = index as f32 / last as f32 * 100.0;
        percent.clamp(0.0, 100.0)
    }

    /// Human-readable position such as `"3 of 10"`.
    pub fn position_label(&self) -> String {
        if self.total_words == 0 {
            return "0 of 0".to_string();
        }
        let position = (self.current_word_index + 1).min(self.total_words);
        format!("{position} of {}", self.total_words)
    }

    /// Whether the previous-word control should be enabled.
    pub const fn can_go_previous(&self) -> bool {
        !self.is_playing && self.current_word_index > 0
    }

    /// Whether the next-word control should be enabled.
    pub const fn can_go_next(&self) -> bool {
        !self.is_playing && self.current_word_index + 1 < self.total_words
    }
}
