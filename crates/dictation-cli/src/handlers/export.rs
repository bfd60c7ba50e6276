//! Export command handler.
//!
//! Writes the list as UTF-8 text with a byte-order mark, one word per line.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use dictation_core::{EXPORT_FILE_NAME, export_words};

use crate::bootstrap::CliContext;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext, output: Option<&Path>) -> Result<()> {
    let user = ctx.require_user()?;
    let words = ctx.load_words(&user).await?;
    let path = output.map_or_else(|| PathBuf::from(EXPORT_FILE_NAME), Path::to_path_buf);

    tokio::fs::write(&path, export_words(&words))
        .await
        .map_err(CliError::from)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✓ Exported {} word(s) to {}.", words.len(), path.display());
    Ok(())
}
