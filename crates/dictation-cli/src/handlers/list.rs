//! List command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::utils::presentation::{format_word_row, print_separator};

/// Print the signed-in user's words with their 1-based positions.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let user = ctx.require_user()?;
    let words = ctx.load_words(&user).await?;

    if words.is_empty() {
        println!("The word list is empty.");
        println!("Use 'dictation add <word>' or 'dictation import <file>' to add words.");
        return Ok(());
    }

    println!("{} word(s):\n", words.len());
    println!("{:>4}  Word", "#");
    print_separator(40);
    for (i, word) in words.iter().enumerate() {
        println!("{}", format_word_row(i + 1, word));
    }
    Ok(())
}
