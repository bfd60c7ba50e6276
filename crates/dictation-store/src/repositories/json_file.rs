//! Small helpers for reading and writing JSON documents.

use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use dictation_core::RepositoryError;

/// Read and parse `path`. A missing file is `Ok(None)`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    path: &Path,
) -> Result<Option<T>, RepositoryError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(RepositoryError::Storage(format!(
                "{}: {e}",
                path.display()
            )));
        }
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| RepositoryError::Serialization(format!("{}: {e}", path.display())))
}

/// Serialize `value` to `path`, creating parent directories.
///
/// Writes to a sibling temp file first and renames it into place so a crash
/// mid-write never leaves a truncated document behind.
pub(crate) async fn write_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), RepositoryError> {
    let json = serde_json::to_vec_pretty(value)
        .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| RepositoryError::Storage(format!("{}: {e}", parent.display())))?;
    }

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &json)
        .await
        .map_err(|e| RepositoryError::Storage(format!("{}: {e}", tmp.display())))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| RepositoryError::Storage(format!("{}: {e}", path.display())))?;

    Ok(())
}
