//! Vocabulary catalog loaded from JSON.
//!
//! # Format
//! ```json
//! [
//!   {
//!     "id": "list-a",
//!     "name": "List A",
//!     "levels": [
//!       {
//!         "id": "basic",
//!         "name": "Basic",
//!         "words": [
//!           {"id": "a-1", "word": "abject", "definition": "wretched",
//!            "fillInBlank": "They lived in ____ poverty."}
//!         ]
//!       }
//!     ]
//!   }
//! ]
//! ```

use crate::error::CatalogError;
use crate::store::WordPoolProvider;
use crate::types::{VocabularyList, VocabularyWord};
use std::collections::HashSet;

/// All vocabulary lists available to the quiz.
#[derive(Debug, Clone, Default)]
pub struct VocabularyCatalog {
    lists: Vec<VocabularyList>,
}

impl VocabularyCatalog {
    /// Parse a JSON array of lists.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let lists: Vec<VocabularyList> = serde_json::from_str(json)?;
        Self::from_lists(lists)
    }

    /// Build from already parsed lists, checking ids and headwords.
    pub fn from_lists(lists: Vec<VocabularyList>) -> Result<Self, CatalogError> {
        let mut list_ids = HashSet::new();

        for list in &lists {
            if !list_ids.insert(list.id.as_str()) {
                return Err(CatalogError::DuplicateListId(list.id.clone()));
            }

            let mut level_ids = HashSet::new();
            for level in &list.levels {
                if !level_ids.insert(level.id.as_str()) {
                    return Err(CatalogError::DuplicateLevelId {
                        list_id: list.id.clone(),
                        level_id: level.id.clone(),
                    });
                }

                let mut word_ids = HashSet::new();
                for word in &level.words {
                    if word.word.trim().is_empty() {
                        return Err(CatalogError::EmptyWord(word.id.clone()));
                    }
                    if !word_ids.insert(word.id.as_str()) {
                        return Err(CatalogError::DuplicateWordId {
                            list_id: list.id.clone(),
                            level_id: level.id.clone(),
                            word_id: word.id.clone(),
                        });
                    }
                }
            }
        }

        Ok(Self { lists })
    }

    pub fn lists(&self) -> &[VocabularyList] {
        &self.lists
    }

    pub fn list(&self, id: &str) -> Option<&VocabularyList> {
        self.lists.iter().find(|list| list.id == id)
    }

    pub fn list_ids(&self) -> Vec<&str> {
        self.lists.iter().map(|list| list.id.as_str()).collect()
    }

    /// Words of one level, empty if the list or level is unknown.
    pub fn level_words(&self, list_id: &str, level_id: &str) -> &[VocabularyWord] {
        self.list(list_id)
            .and_then(|list| list.levels.iter().find(|level| level.id == level_id))
            .map(|level| level.words.as_slice())
            .unwrap_or(&[])
    }

    pub fn all_words(&self) -> impl Iterator<Item = &VocabularyWord> {
        self.lists
            .iter()
            .flat_map(|list| list.levels.iter())
            .flat_map(|level| level.words.iter())
    }

    pub fn total_word_count(&self) -> usize {
        self.all_words().count()
    }
}

impl WordPoolProvider for VocabularyCatalog {
    fn get_words(&self, list_id: &str, level_id: &str) -> Vec<VocabularyWord> {
        self.level_words(list_id, level_id).to_vec()
    }
}
