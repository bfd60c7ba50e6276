//! Per-user persistence ports.
//!
//! Word lists and settings are stored per signed-in user. Implementations
//! handle all storage details internally.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::WordList;
use crate::settings::PlaybackSettings;

/// Repository for a user's word list.
#[async_trait]
pub trait WordListRepository: Send + Sync {
    /// Load the user's words. Returns an empty list if none are stored.
    async fn load(&self, user_id: &str) -> Result<WordList, RepositoryError>;

    /// Replace the user's stored words.
    async fn save(&self, user_id: &str, words: &WordList) -> Result<(), RepositoryError>;
}

/// Repository for a user's playback settings.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Load the user's settings. Returns defaults if none are stored.
    async fn load(&self, user_id: &str) -> Result<PlaybackSettings, RepositoryError>;

    /// Save the user's settings.
    async fn save(&self, user_id: &str, settings: &PlaybackSettings) -> Result<(), RepositoryError>;
}
