//! CLI bootstrap - the composition root.
//!
//! The only place where infrastructure is wired together for the CLI:
//! - JSON file stores and the session gate (via dictation-store)
//! - Speech and clip backends plus the playback controller (via dictation-voice)
//!
//! Command handlers receive a [`CliContext`] and never construct adapters
//! themselves.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use dictation_core::paths::{data_root, ensure_dir};
use dictation_core::{
    AuthGate, PlaybackSettings, SettingsStore, WordList, WordListStore, validate_settings,
};
use dictation_store::{FileSessionAuth, StoreFactory, Stores};
use dictation_voice::{
    ClipPlayer, ClipRegistry, EspeakSynthesizer, PlaybackController, RodioClipOutput, SpeechEngine,
};

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Data directory override; the platform data directory otherwise.
    pub data_dir: Option<PathBuf>,
    /// Skip probing for a speech engine and audio device.
    pub headless: bool,
}

impl CliConfig {
    /// Config with the default data directory and real audio backends.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Use `dir` as the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.data_dir = dir;
        self
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    stores: Stores,
    headless: bool,
}

/// Everything a playback run needs, sharing the stores it plays from.
pub struct Playback {
    pub controller: PlaybackController,
    pub words: Arc<WordListStore>,
    pub settings: Arc<SettingsStore>,
    /// Holds clips preloaded into memory for this run.
    pub registry: Arc<ClipRegistry>,
}

impl CliContext {
    /// Data root the stores were opened on.
    pub fn root(&self) -> &Path {
        &self.stores.root
    }

    /// Access the session gate.
    pub fn auth(&self) -> &Arc<FileSessionAuth> {
        &self.stores.auth
    }

    /// Id of the signed-in user, or [`CliError::NotSignedIn`].
    pub fn require_user(&self) -> Result<String, CliError> {
        self.stores.auth.current_user().ok_or(CliError::NotSignedIn)
    }

    pub async fn load_words(&self, user_id: &str) -> Result<WordList, CliError> {
        Ok(self.stores.words.load(user_id).await?)
    }

    pub async fn save_words(&self, user_id: &str, words: &WordList) -> Result<(), CliError> {
        Ok(self.stores.words.save(user_id, words).await?)
    }

    /// Stored settings, falling back to defaults when they fail validation.
    pub async fn load_settings(&self, user_id: &str) -> Result<PlaybackSettings, CliError> {
        let settings = self.stores.settings.load(user_id).await?;
        if let Err(e) = validate_settings(&settings) {
            tracing::warn!(error = %e, user_id, "Stored settings are invalid; using defaults");
            return Ok(PlaybackSettings::with_defaults());
        }
        Ok(settings)
    }

    pub async fn save_settings(
        &self,
        user_id: &str,
        settings: &PlaybackSettings,
    ) -> Result<(), CliError> {
        Ok(self.stores.settings.save(user_id, settings).await?)
    }

    /// Speech synthesizer for this platform.
    pub fn synthesizer(&self) -> Arc<EspeakSynthesizer> {
        if self.headless {
            Arc::new(EspeakSynthesizer::with_program(None))
        } else {
            Arc::new(EspeakSynthesizer::detect())
        }
    }

    /// Assemble a controller over `words` and `settings`.
    pub fn playback(&self, words: WordList, settings: PlaybackSettings) -> Playback {
        let words = Arc::new(WordListStore::from_list(words));
        let settings = Arc::new(SettingsStore::new(settings));
        let registry = Arc::new(ClipRegistry::new());

        let clips = if self.headless {
            RodioClipOutput::unavailable(Arc::clone(&registry))
        } else {
            RodioClipOutput::open(Arc::clone(&registry))
        };
        let gate: Arc<dyn AuthGate> = self.stores.auth.clone();
        let controller = PlaybackController::new(
            Arc::clone(&words),
            Arc::clone(&settings),
            SpeechEngine::new(self.synthesizer()),
            ClipPlayer::new(Arc::new(clips)),
            gate,
        );

        Playback {
            controller,
            words,
            settings,
            registry,
        }
    }
}

/// Bootstrap the CLI application.
///
/// Resolves the data directory, opens the stores and restores any saved
/// session.
pub async fn bootstrap(config: CliConfig) -> Result<CliContext> {
    let root = match config.data_dir {
        Some(dir) => {
            ensure_dir(&dir)?;
            dir
        }
        None => data_root()?,
    };
    tracing::debug!(root = %root.display(), "Opening data directory");

    let stores = StoreFactory::open(&root).await?;
    if let Some(user) = stores.auth.current_user() {
        tracing::debug!(user, "Restored session");
    }

    Ok(CliContext {
        stores,
        headless: config.headless,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bootstrap_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested/data");
        let config = CliConfig::with_defaults().with_data_dir(Some(root.clone()));

        let ctx = bootstrap(config).await.unwrap();

        assert!(root.is_dir());
        assert_eq!(ctx.root(), root);
        assert!(matches!(ctx.require_user(), Err(CliError::NotSignedIn)));
    }
}
