//! Local accounts and the signed-in session.
//!
//! Credentials live in `users.json` as `user id -> sha256(user:password)`
//! hex digests; the active session lives in `session.json`. The session is
//! cached in memory so [`AuthGate`] checks never touch the disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use dictation_core::paths::is_valid_user_id;
use dictation_core::{AuthError, AuthGate, RepositoryError, session_path, users_path};

use crate::repositories::{read_json, write_json};

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub logged_in_at: DateTime<Utc>,
}

type Credentials = BTreeMap<String, String>;

/// File-backed [`AuthGate`] with register, login and logout.
pub struct FileSessionAuth {
    root: PathBuf,
    session: RwLock<Option<Session>>,
    /// Serialises read-modify-write cycles on the credentials file.
    credentials_lock: Mutex<()>,
}

impl FileSessionAuth {
    /// Open the auth store under `root`, restoring a saved session if the
    /// user it names still exists.
    pub async fn open(root: &Path) -> Result<Self, AuthError> {
        let saved: Option<Session> = read_json(&session_path(root))
            .await
            .map_err(storage_error)?;
        let credentials: Credentials = read_json(&users_path(root))
            .await
            .map_err(storage_error)?
            .unwrap_or_default();

        let session = saved.filter(|s| credentials.contains_key(&s.user_id));
        if let Some(s) = &session {
            tracing::debug!(user_id = %s.user_id, "Restored session");
        }

        Ok(Self {
            root: root.to_path_buf(),
            session: RwLock::new(session),
            credentials_lock: Mutex::new(()),
        })
    }

    /// Create a new account. Does not sign in.
    pub async fn register(&self, user_id: &str, password: &str) -> Result<(), AuthError> {
        if !is_valid_user_id(user_id) {
            return Err(AuthError::InvalidUserId(user_id.to_string()));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let _guard = self.credentials_lock.lock().await;
        let mut credentials = self.load_credentials().await?;
        if credentials.contains_key(user_id) {
            return Err(AuthError::UserExists(user_id.to_string()));
        }
        credentials.insert(user_id.to_string(), hash_password(user_id, password));
        write_json(&users_path(&self.root), &credentials)
            .await
            .map_err(storage_error)?;

        tracing::info!(user_id, "Registered user");
        Ok(())
    }

    /// Check credentials and make `user_id` the signed-in user.
    pub async fn login(&self, user_id: &str, password: &str) -> Result<Session, AuthError> {
        let credentials = {
            let _guard = self.credentials_lock.lock().await;
            self.load_credentials().await?
        };

        let expected = credentials
            .get(user_id)
            .ok_or(AuthError::InvalidCredentials)?;
        if *expected != hash_password(user_id, password) {
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session {
            user_id: user_id.to_string(),
            logged_in_at: Utc::now(),
        };
        write_json(&session_path(&self.root), &session)
            .await
            .map_err(storage_error)?;
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());

        tracing::info!(user_id, "Signed in");
        Ok(session)
    }

    /// Sign out. Signing out while signed out is not an error.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let previous = self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match tokio::fs::remove_file(session_path(&self.root)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(AuthError::Storage(e.to_string())),
        }

        if let Some(s) = previous {
            tracing::info!(user_id = %s.user_id, "Signed out");
        }
        Ok(())
    }

    /// Current session, if signed in.
    pub fn session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn load_credentials(&self) -> Result<Credentials, AuthError> {
        Ok(read_json(&users_path(&self.root))
            .await
            .map_err(storage_error)?
            .unwrap_or_default())
    }
}

impl AuthGate for FileSessionAuth {
    fn current_user(&self) -> Option<String> {
        self.session().map(|s| s.user_id)
    }
}

fn hash_password(user_id: &str, password: &str) -> String {
    let digest = Sha256::digest(format!("{user_id}:{password}").as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn storage_error(e: RepositoryError) -> AuthError {
    AuthError::Storage(e.to_string())
}
