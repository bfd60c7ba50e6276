//! JSON file implementation of the `SettingsRepository` trait.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use dictation_core::{
    PlaybackSettings, RepositoryError, SettingsRepository, user_dir, validate_settings,
};

use super::{read_json, write_json};

const SETTINGS_FILE: &str = "settings.json";

/// Stores each user's playback settings in `users/<id>/settings.json`.
///
/// Missing fields fall back to their defaults, so older files keep loading
/// after new settings are introduced. A file holding out-of-range values is
/// ignored and the defaults are returned instead.
#[derive(Debug, Clone)]
pub struct JsonSettingsRepository {
    root: PathBuf,
}

impl JsonSettingsRepository {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn path_for(&self, user_id: &str) -> Result<PathBuf, RepositoryError> {
        user_dir(&self.root, user_id)
            .map(|dir| dir.join(SETTINGS_FILE))
            .map_err(|e| RepositoryError::NotFound(e.to_string()))
    }
}

#[async_trait]
impl SettingsRepository for JsonSettingsRepository {
    async fn load(&self, user_id: &str) -> Result<PlaybackSettings, RepositoryError> {
        let path = self.path_for(user_id)?;
        let Some(settings) = read_json::<PlaybackSettings>(&path).await? else {
            return Ok(PlaybackSettings::with_defaults());
        };

        if let Err(e) = validate_settings(&settings) {
            tracing::warn!(
                user_id,
                path = %path.display(),
                error = %e,
                "Ignoring invalid stored settings, using defaults"
            );
            return Ok(PlaybackSettings::with_defaults());
        }

        Ok(settings)
    }

    async fn save(&self, user_id: &str, settings: &PlaybackSettings) -> Result<(), RepositoryError> {
        let path = self.path_for(user_id)?;
        write_json(&path, settings).await
    }
}
