//! Domain types for practice content.

mod word;
mod word_list;

pub use word::{Word, WordError};
pub use word_list::WordList;
