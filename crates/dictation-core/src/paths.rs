//! Data directory resolution.
//!
//! Layout under the data root:
//!
//! ```text
//! <root>/
//!   users.json              credentials (user id -> password hash)
//!   session.json            currently signed-in user
//!   users/<user id>/
//!     words.json            word list
//!     settings.json         playback settings
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable that overrides the data root.
pub const DATA_DIR_ENV: &str = "DICTATION_DATA_DIR";

/// Errors that can occur during path resolution and directory operations.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the system data directory.
    #[error("Cannot determine system data directory")]
    NoDataDir,

    /// Failed to create a directory.
    #[error("Failed to create directory {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },

    /// A user id that cannot be used as a directory name.
    #[error("Invalid user id '{0}'")]
    InvalidUserId(String),
}

/// Get the root directory for application data.
///
/// Resolution order:
/// 1. `DICTATION_DATA_DIR` environment variable
/// 2. System data directory (e.g., `~/.local/share/dictation`)
///
/// The directory is created if it does not exist.
pub fn data_root() -> Result<PathBuf, PathError> {
    let root = match env::var(DATA_DIR_ENV) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => dirs::data_dir().ok_or(PathError::NoDataDir)?.join("dictation"),
    };

    ensure_dir(&root)?;
    Ok(root)
}

/// Directory holding one user's words and settings.
///
/// User ids are restricted to ASCII letters, digits, `-`, `_` and `.` (not
/// leading) so they can never escape the data root.
pub fn user_dir(root: &Path, user_id: &str) -> Result<PathBuf, PathError> {
    if !is_valid_user_id(user_id) {
        return Err(PathError::InvalidUserId(user_id.to_string()));
    }
    Ok(root.join("users").join(user_id))
}

/// Path of the session file.
pub fn session_path(root: &Path) -> PathBuf {
    root.join("session.json")
}

/// Path of the credentials file.
pub fn users_path(root: &Path) -> PathBuf {
    root.join("users.json")
}

/// Whether `user_id` is acceptable as an account name.
pub fn is_valid_user_id(user_id: &str) -> bool {
    !user_id.is_empty()
        && user_id.len() <= 64
        && !user_id.starts_with('.')
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Create `path` (and parents) if missing.
pub fn ensure_dir(path: &Path) -> Result<(), PathError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_dir_nests_under_users() {
        let dir = user_dir(Path::new("/data"), "nathan").unwrap();
        assert_eq!(dir, PathBuf::from("/data/users/nathan"));
    }

    #[test]
    fn user_dir_rejects_traversal() {
        assert!(user_dir(Path::new("/data"), "../etc").is_err());
        assert!(user_dir(Path::new("/data"), "..").is_err());
        assert!(user_dir(Path::new("/data"), "a/b").is_err());
        assert!(user_dir(Path::new("/data"), "").is_err());
    }

    #[test]
    fn valid_user_ids() {
        assert!(is_valid_user_id("jessica"));
        assert!(is_valid_user_id("mike_2"));
        assert!(!is_valid_user_id(".hidden"));
        assert!(!is_valid_user_id("with space"));
    }
}
