//! Add command handler.
//!
//! Appends typed words to the signed-in user's list. Each argument may hold
//! several newline-separated words; blank lines are skipped.

use std::path::Path;

use anyhow::Result;

use dictation_core::{Word, parse_word_lines};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Execute the add command.
///
/// With `audio`, exactly one word is expected and it is stored with the
/// clip's absolute path so playback uses the recording instead of speech.
pub async fn execute(ctx: &CliContext, words: &[String], audio: Option<&Path>) -> Result<()> {
    let user = ctx.require_user()?;
    let new_words = match audio {
        Some(clip) => vec![word_with_clip(words, clip)?],
        None => words.iter().flat_map(|w| parse_word_lines(w)).collect(),
    };
    if new_words.is_empty() {
        return Err(CliError::Arguments("nothing to add".to_string()).into());
    }

    let mut list = ctx.load_words(&user).await?;
    let added = new_words.len();
    list.extend(new_words);
    ctx.save_words(&user, &list).await?;

    println!(
        "✓ Added {added} word(s); the list now has {} word(s).",
        list.len()
    );
    Ok(())
}

fn word_with_clip(words: &[String], clip: &Path) -> Result<Word, CliError> {
    let [text] = words else {
        return Err(CliError::Arguments(
            "--audio needs exactly one word".to_string(),
        ));
    };
    if !clip.is_file() {
        return Err(CliError::Arguments(format!(
            "clip not found: {}",
            clip.display()
        )));
    }
    let path = clip.canonicalize()?;
    Word::with_audio(text, path.to_string_lossy())
        .map_err(|e| CliError::Arguments(e.to_string()))
}
