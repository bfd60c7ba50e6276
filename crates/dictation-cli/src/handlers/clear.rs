//! Clear command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::utils::input;

/// Delete every word, confirming unless `force`.
pub async fn execute(ctx: &CliContext, force: bool) -> Result<()> {
    let user = ctx.require_user()?;
    let mut list = ctx.load_words(&user).await?;
    if list.is_empty() {
        println!("The word list is already empty.");
        return Ok(());
    }

    if !force {
        let prompt = format!("Delete all {} word(s)?", list.len());
        if !input::prompt_confirmation(&prompt)? {
            println!("Clear operation cancelled.");
            return Ok(());
        }
    }

    let count = list.len();
    list.clear();
    ctx.save_words(&user, &list).await?;
    println!("✓ Deleted {count} word(s).");
    Ok(())
}
