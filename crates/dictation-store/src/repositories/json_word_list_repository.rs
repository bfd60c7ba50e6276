//! JSON file implementation of the `WordListRepository` trait.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use dictation_core::{RepositoryError, Word, WordList, WordListRepository, user_dir};

use super::{read_json, write_json};

const WORDS_FILE: &str = "words.json";

/// Stores each user's word list in `users/<id>/words.json` as a JSON array
/// of `{text, audioUrl?}` objects.
///
/// Entries that do not form a valid [`Word`] are skipped on load so one bad
/// entry never hides the rest of the list.
#[derive(Debug, Clone)]
pub struct JsonWordListRepository {
    root: PathBuf,
}

impl JsonWordListRepository {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn path_for(&self, user_id: &str) -> Result<PathBuf, RepositoryError> {
        user_dir(&self.root, user_id)
            .map(|dir| dir.join(WORDS_FILE))
            .map_err(|e| RepositoryError::NotFound(e.to_string()))
    }
}

#[async_trait]
impl WordListRepository for JsonWordListRepository {
    async fn load(&self, user_id: &str) -> Result<WordList, RepositoryError> {
        let path = self.path_for(user_id)?;
        let Some(entries) = read_json::<Vec<serde_json::Value>>(&path).await? else {
            return Ok(WordList::new());
        };

        let words: Vec<Word> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value::<Word>(entry) {
                Ok(word) => Some(word),
                Err(e) => {
                    tracing::warn!(user_id, index, error = %e, "Skipping invalid stored word");
                    None
                }
            })
            .collect();

        Ok(WordList::from_words(words))
    }

    async fn save(&self, user_id: &str, words: &WordList) -> Result<(), RepositoryError> {
        let path = self.path_for(user_id)?;
        write_json(&path, words).await?;
        tracing::debug!(user_id, count = words.len(), "Saved word list");
        Ok(())
    }
}
