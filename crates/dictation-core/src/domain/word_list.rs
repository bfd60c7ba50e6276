//! Ordered collection of practice words.

use serde::{Deserialize, Serialize};

use super::Word;

/// An ordered list of words.
///
/// Serialises transparently as a JSON array of [`Word`]s. Words are appended
/// and removed, never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordList {
    words: Vec<Word>,
}

impl WordList {
    /// Create an empty list.
    pub const fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Build a list from existing words.
    pub fn from_words(words: impl IntoIterator<Item = Word>) -> Self {
        Self {
            words: words.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Word> {
        self.words.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Word> {
        self.words.iter()
    }

    pub fn as_slice(&self) -> &[Word] {
        &self.words
    }

    /// Append a word at the end.
    pub fn push(&mut self, word: Word) {
        self.words.push(word);
    }

    /// Append several words, preserving their order.
    pub fn extend(&mut self, words: impl IntoIterator<Item = Word>) {
        self.words.extend(words);
    }

    /// Remove the word at `index`, returning it if the index was valid.
    pub fn remove(&mut self, index: usize) -> Option<Word> {
        (index < self.words.len()).then(|| self.words.remove(index))
    }

    /// Remove every word.
    pub fn clear(&mut self) {
        self.words.clear();
    }

    /// Texts of all words, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.words.iter().map(Word::text).collect()
    }
}

impl<'a> IntoIterator for &'a WordList {
    type Item = &'a Word;
    type IntoIter = std::slice::Iter<'a, Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}
