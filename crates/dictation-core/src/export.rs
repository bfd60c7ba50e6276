//! Plain-text import and export of word lists.
//!
//! Exports are UTF-8 with a byte-order mark so spreadsheet tools and older
//! editors detect the encoding; imports accept either form.

use crate::domain::{Word, WordList};

/// Default file name used when exporting.
pub const EXPORT_FILE_NAME: &str = "dictation_words.txt";

const BOM: char = '\u{FEFF}';

/// Render a word list as BOM-prefixed UTF-8 text, one word per line.
pub fn export_words(words: &WordList) -> Vec<u8> {
    let mut out = String::new();
    out.push(BOM);
    out.push_str(&words.texts().join("\n"));
    out.into_bytes()
}

/// Parse newline-separated text into words.
///
/// Lines are trimmed, blank lines are skipped and a leading BOM is ignored.
/// Both `\n` and `\r\n` line endings are accepted.
pub fn parse_word_lines(text: &str) -> Vec<Word> {
    text.strip_prefix(BOM)
        .unwrap_or(text)
        .lines()
        .filter_map(|line| Word::new(line).ok())
        .collect()
}
