//! Import command handler: appends every non-blank line of a text file.

use std::path::Path;

use anyhow::{Context, Result};

use dictation_core::parse_word_lines;

use crate::bootstrap::CliContext;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext, file: &Path) -> Result<()> {
    let user = ctx.require_user()?;
    let bytes = tokio::fs::read(file)
        .await
        .map_err(CliError::from)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let text = String::from_utf8(bytes).map_err(|_| {
        CliError::Arguments(format!("{} is not UTF-8 text", file.display()))
    })?;

    let imported = parse_word_lines(&text);
    if imported.is_empty() {
        println!("No words found in {}.", file.display());
        return Ok(());
    }

    let mut list = ctx.load_words(&user).await?;
    let count = imported.len();
    list.extend(imported);
    ctx.save_words(&user, &list).await?;

    tracing::debug!(count, file = %file.display(), "Imported words");
    println!(
        "✓ Imported {count} word(s) from {}; the list now has {} word(s).",
        file.display(),
        list.len()
    );
    Ok(())
}
