//! Shared in-memory stores read by the playback controller.
//!
//! Both stores are single-writer-at-a-time behind an `RwLock` and hand out
//! owned copies, so readers never hold a lock across an `.await`.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{Word, WordList};
use crate::settings::{PlaybackSettings, SettingsError, SettingsUpdate, validate_settings};

/// Ordered word list shared between content input and playback.
#[derive(Debug, Default)]
pub struct WordListStore {
    words: RwLock<WordList>,
}

impl WordListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `words`, e.g. the list loaded at sign-in.
    pub fn from_list(words: WordList) -> Self {
        Self {
            words: RwLock::new(words),
        }
    }

    /// Copy of the whole list.
    pub fn words(&self) -> WordList {
        self.read().clone()
    }

    pub fn word_count(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy of the word at `index`.
    pub fn get(&self, index: usize) -> Option<Word> {
        self.read().get(index).cloned()
    }

    /// Append one word.
    pub fn append(&self, word: Word) {
        self.write().push(word);
    }

    /// Append several words, returning how many were added.
    pub fn append_all(&self, words: impl IntoIterator<Item = Word>) -> usize {
        let mut list = self.write();
        let before = list.len();
        list.extend(words);
        list.len() - before
    }

    /// Remove the word at `index`.
    pub fn remove(&self, index: usize) -> Option<Word> {
        self.write().remove(index)
    }

    /// Remove every word.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Replace the whole list.
    pub fn replace(&self, words: WordList) {
        *self.write() = words;
    }

    fn read(&self) -> RwLockReadGuard<'_, WordList> {
        self.words.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, WordList> {
        self.words.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Current playback settings.
#[derive(Debug, Default)]
pub struct SettingsStore {
    settings: RwLock<PlaybackSettings>,
}

impl SettingsStore {
    /// Seed the store. Values outside the accepted ranges are clamped.
    pub fn new(settings: PlaybackSettings) -> Self {
        Self {
            settings: RwLock::new(settings.clamped()),
        }
    }

    /// Copy of the current settings.
    pub fn settings(&self) -> PlaybackSettings {
        *self.settings.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the settings after validating them.
    pub fn replace(&self, settings: PlaybackSettings) -> Result<(), SettingsError> {
        validate_settings(&settings)?;
        *self.settings.write().unwrap_or_else(PoisonError::into_inner) = settings;
        Ok(())
    }

    /// Apply a partial update. Nothing changes if the merged result is invalid.
    pub fn update(&self, update: &SettingsUpdate) -> Result<PlaybackSettings, SettingsError> {
        let mut guard = self.settings.write().unwrap_or_else(PoisonError::into_inner);
        let mut merged = *guard;
        merged.merge(update);
        validate_settings(&merged)?;
        *guard = merged;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Pronunciation;

    #[test]
    fn append_and_remove() {
        let store = WordListStore::new();
        store.append(Word::new("cat").unwrap());
        let added = store.append_all(vec![Word::new("dog").unwrap(), Word::new("eel").unwrap()]);
        assert_eq!(added, 2);
        assert_eq!(store.word_count(), 3);

        let removed = store.remove(0).unwrap();
        assert_eq!(removed.text(), "cat");
        assert_eq!(store.get(0).unwrap().text(), "dog");
        assert!(store.remove(10).is_none());
    }

    #[test]
    fn clear_empties_store() {
        let store = WordListStore::from_list(WordList::from_words(vec![Word::new("a").unwrap()]));
        store.clear();
        assert!(store.is_empty());
        assert!(store.get(0).is_none());
    }

    #[test]
    fn settings_update_validates_before_commit() {
        let store = SettingsStore::default();
        let bad = SettingsUpdate {
            repetitions: Some(0),
            pronunciation: Some(Pronunciation::Mandarin),
            ..Default::default()
        };
        assert!(store.update(&bad).is_err());
        assert_eq!(store.settings(), PlaybackSettings::with_defaults());

        let good = SettingsUpdate {
            repetitions: Some(2),
            interval: Some(0.5),
            ..Default::default()
        };
        let merged = store.update(&good).unwrap();
        assert_eq!(merged.repetitions, 2);
        assert_eq!(store.settings().repetitions, 2);
    }

    #[test]
    fn settings_store_new_clamps_out_of_range_values() {
        let store = SettingsStore::new(PlaybackSettings {
            repetitions: 0,
            interval: 1e20,
            speed: f32::INFINITY,
            pronunciation: Pronunciation::Cantonese,
        });
        let settings = store.settings();

        assert!(validate_settings(&settings).is_ok());
        assert_eq!(settings.repetitions, 1);
        assert_eq!(settings.pronunciation, Pronunciation::Cantonese);
    }

    #[test]
    fn settings_replace_rejects_invalid() {
        let store = SettingsStore::default();
        let invalid = PlaybackSettings {
            speed: -1.0,
            ..Default::default()
        };
        assert!(store.replace(invalid).is_err());
    }
}
