//! WordNet-backed synonyms and noun lookups

use crate::error::{Result, SkillGapError};
use crate::processing::lemmatizer::Lexicon;
use crate::processing::synonyms::SynonymSource;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use log::{debug, info};
use wordnet_db::{LoadMode, WordNet};
use wordnet_types::Pos;

const PARTS_OF_SPEECH: [Pos; 4] = [Pos::Noun, Pos::Verb, Pos::Adj, Pos::Adv];

/// Read-only WordNet database, cheap to clone and share between components
#[derive(Clone)]
pub struct WordNetDictionary {
    db: Arc<WordNet>,
}

impl WordNetDictionary {
    /// Load the `index.*` and `data.*` files of a WordNet `dict` directory
    pub fn load(dict_dir: &Path) -> Result<Self> {
        let start_time = Instant::now();

        let db = WordNet::load_with_mode(dict_dir, LoadMode::Mmap).map_err(|e| {
            SkillGapError::Dictionary(format!("{}: {:#}", dict_dir.display(), e))
        })?;

        info!(
            "Loaded WordNet from {} ({} synsets) in {:?}",
            dict_dir.display(),
            db.synset_count(),
            start_time.elapsed()
        );

        Ok(Self { db: Arc::new(db) })
    }

    /// Every lemma of every synset the word belongs to, in any part of speech.
    /// Multi-word lemmas come back with spaces.
    fn lemmas_of(&self, word: &str) -> BTreeSet<String> {
        let key = word.trim().to_lowercase().replace(' ', "_");
        let mut lemmas = BTreeSet::new();

        for pos in PARTS_OF_SPEECH {
            for id in self.db.synsets_for_lemma(pos, &key) {
                if let Some(synset) = self.db.get_synset(*id) {
                    lemmas.extend(synset.words.iter().map(|w| w.text.to_lowercase().replace('_', " ")));
                }
            }
        }

        debug!("WordNet: '{}' has {} lemmas", word, lemmas.len());
        lemmas
    }
}

impl SynonymSource for WordNetDictionary {
    fn synonyms(&self, word: &str) -> BTreeSet<String> {
        self.lemmas_of(word)
    }
}

impl Lexicon for WordNetDictionary {
    fn is_noun(&self, lemma: &str) -> bool {
        self.db.lemma_exists(Pos::Noun, lemma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_dictionary_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = WordNetDictionary::load(&dir.path().join("dict"));

        assert!(matches!(result, Err(SkillGapError::Dictionary(_))));
    }

    #[test]
    fn test_empty_directory_is_an_error() {
        let dir = TempDir::new().unwrap();

        assert!(WordNetDictionary::load(dir.path()).is_err());
    }
}
