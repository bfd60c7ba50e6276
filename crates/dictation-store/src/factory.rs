//! Composition utilities for the file-backed stores.
//!
//! Construction only. No domain logic belongs here.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dictation_core::{AuthError, SettingsRepository, WordListRepository};

use crate::repositories::{JsonSettingsRepository, JsonWordListRepository};
use crate::session::FileSessionAuth;

/// All storage collaborators for one data root.
#[derive(Clone)]
pub struct Stores {
    /// Data root the stores were opened on.
    pub root: PathBuf,
    /// Per-user word lists.
    pub words: Arc<dyn WordListRepository>,
    /// Per-user playback settings.
    pub settings: Arc<dyn SettingsRepository>,
    /// Session and credential handling.
    pub auth: Arc<FileSessionAuth>,
}

/// Factory for the JSON-file backends.
pub struct StoreFactory;

impl StoreFactory {
    /// Open every store under `root`, restoring any saved session.
    pub async fn open(root: &Path) -> Result<Stores, AuthError> {
        let auth = FileSessionAuth::open(root).await?;
        Ok(Stores {
            root: root.to_path_buf(),
            words: Arc::new(JsonWordListRepository::new(root)),
            settings: Arc::new(JsonSettingsRepository::new(root)),
            auth: Arc::new(auth),
        })
    }
}
