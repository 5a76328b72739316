//! Lexical synonym lookup used for skill expansion

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use log::{info, warn};

/// Source of lexical synonyms. Never assumed exhaustive; unknown words yield an empty set.
pub trait SynonymSource: Send + Sync {
    fn synonyms(&self, word: &str) -> BTreeSet<String>;
}

/// Synonym source that knows no synonyms
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSynonyms;

impl SynonymSource for NoSynonyms {
    fn synonyms(&self, _word: &str) -> BTreeSet<String> {
        BTreeSet::new()
    }
}

/// Fallback synonym groups for when no WordNet dictionary is available. A word
/// maps to every lemma of every group it belongs to, so general-language words
/// can collide with skill names.
pub static BUILTIN_SYNONYM_GROUPS: &[&[&str]] = &[
    // Skill senses
    &["statistics", "statistic"],
    &["machine learning", "statistical learning"],
    &["nlp", "natural language processing", "computational linguistics"],
    &["deep learning", "deep neural networks"],
    &["data analysis", "data analytics", "analytics"],
    &["excel", "spreadsheet"],
    &["git", "version control"],
    &["docker", "containerization"],
    &["kubernetes", "container orchestration"],
    &["sql", "structured query language"],
    // General-language senses that overlap skill names
    &["excel", "surpass", "stand out", "outdo", "outshine"],
    &["spark", "trigger", "ignite", "touch off", "set off", "actuate"],
    &["spark", "flicker", "glint", "sparkle"],
    &["python", "snake"],
    &["java", "coffee", "joe"],
    &["java", "indonesian island"],
    &["git", "rotter", "dirty dog", "stinker", "rat"],
    &["transformers", "transformer", "electrical device"],
    &["azure", "cerulean", "sky blue", "sapphire"],
    &["pandas", "panda", "giant panda"],
];

/// Union of several synonym sources
#[derive(Default)]
pub struct CombinedSynonyms {
    sources: Vec<Box<dyn SynonymSource>>,
}

impl CombinedSynonyms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl SynonymSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }
}

impl SynonymSource for CombinedSynonyms {
    fn synonyms(&self, word: &str) -> BTreeSet<String> {
        self.sources.iter().flat_map(|source| source.synonyms(word)).collect()
    }
}

/// In-memory synonym table built from groups of equivalent words
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    index: HashMap<String, BTreeSet<String>>,
}

impl SynonymTable {
    /// Table seeded with the built-in groups
    pub fn builtin() -> Self {
        let mut table = Self::default();
        for group in BUILTIN_SYNONYM_GROUPS {
            table.add_group(group.iter().copied());
        }
        table
    }

    /// Built-in groups plus groups read from an optional file
    pub fn load(path: Option<&Path>) -> Self {
        let mut table = Self::builtin();
        if let Some(path) = path {
            table.extend_from_file(path);
        }
        table
    }

    /// Only the groups read from a file
    pub fn from_file(path: &Path) -> Self {
        let mut table = Self::default();
        table.extend_from_file(path);
        table
    }

    /// Add the groups of a file holding one comma-separated group per line.
    /// Blank lines and `#` comments are skipped; an unreadable file is logged
    /// and ignored.
    fn extend_from_file(&mut self, path: &Path) {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Synonym file {} unavailable: {}", path.display(), e);
                return;
            }
        };

        let before = self.len();
        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.add_group(line.split(','));
        }
        info!(
            "Loaded synonyms from {} ({} new words)",
            path.display(),
            self.len().saturating_sub(before)
        );
    }

    /// Register a group of mutually synonymous words
    pub fn add_group<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let group: BTreeSet<String> = words
            .into_iter()
            .map(|w| normalize_word(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();

        if group.len() < 2 {
            return;
        }

        for word in &group {
            self.index
                .entry(word.clone())
                .or_default()
                .extend(group.iter().cloned());
        }
    }

    /// Number of distinct words with at least one synonym
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl SynonymSource for SynonymTable {
    fn synonyms(&self, word: &str) -> BTreeSet<String> {
        self.index
            .get(&normalize_word(word))
            .cloned()
            .unwrap_or_default()
    }
}

fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase().replace('_', " ")
}
