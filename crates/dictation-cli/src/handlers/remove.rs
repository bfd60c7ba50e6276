//! Remove command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::utils::input;

/// Delete the word at 1-based `position`, confirming unless `force`.
pub async fn execute(ctx: &CliContext, position: usize, force: bool) -> Result<()> {
    let user = ctx.require_user()?;
    let mut list = ctx.load_words(&user).await?;

    let index = position
        .checked_sub(1)
        .filter(|&i| i < list.len())
        .ok_or_else(|| {
            CliError::Arguments(format!(
                "position {position} is out of range (the list has {} word(s))",
                list.len()
            ))
        })?;

    if !force {
        let text = list.get(index).map_or("", |w| w.text());
        let confirm = input::prompt_confirmation(&format!("Remove '{text}'?"))?;
        if !confirm {
            println!("Remove operation cancelled.");
            return Ok(());
        }
    }

    if let Some(removed) = list.remove(index) {
        ctx.save_words(&user, &list).await?;
        println!("✓ Removed '{}'.", removed.text());
    }
    Ok(())
}
