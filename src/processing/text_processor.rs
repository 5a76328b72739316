//! Text cleaning, tokenization and normalization

use crate::processing::lemmatizer::{Lemmatizer, Lexicon};
use crate::processing::ontology::Ontology;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

/// Default adjacent-token window for phrase generation
pub const DEFAULT_NGRAM_SIZE: usize = 2;

/// Everything except lowercase letters, digits, whitespace and technical symbols
static DISALLOWED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\s+.#/_-]").expect("Invalid character filter regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Standard English stop-word list
pub const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
    "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he",
    "him", "his", "himself", "she", "she's", "her", "hers", "herself", "it", "it's",
    "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "that'll", "these", "those", "am", "is", "are",
    "was", "were", "be", "been", "being", "have", "has", "had", "having", "do",
    "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or", "because",
    "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below",
    "to", "from", "up", "down", "in", "out", "on", "off", "over", "under", "again",
    "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t",
    "can", "will", "just", "don", "don't", "should", "should've", "now", "d", "ll",
    "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't",
    "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't",
    "haven", "haven't", "isn", "isn't", "ma", "mightn", "mightn't", "mustn",
    "mustn't", "needn", "needn't", "shan", "shan't", "shouldn", "shouldn't",
    "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
];

/// Short technical tokens that are never treated as stop-words
pub const TECHNICAL_KEEP_WORDS: &[&str] = &["c", "r", "d", "go", "c++", "c#", "sql", "python", "java"];

/// Normalized view of one document: unigram lemmas followed by phrases
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTokens {
    pub lemmas: Vec<String>,
    pub phrases: Vec<String>,
}

impl DocumentTokens {
    /// Lemmas first, then phrases, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lemmas.iter().chain(self.phrases.iter()).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.lemmas.len() + self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty() && self.phrases.is_empty()
    }

    /// Space-joined text used for similarity scoring
    pub fn to_text(&self) -> String {
        self.iter().collect::<Vec<_>>().join(" ")
    }
}

pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
    lemmatizer: Lemmatizer,
    ngram_size: usize,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    /// Processor protecting the built-in skill vocabulary from lemmatization
    pub fn new() -> Self {
        Self::for_ontology(&Ontology::builtin())
    }

    /// Processor protecting every surface form the ontology knows
    pub fn for_ontology(ontology: &Ontology) -> Self {
        let protected = ontology
            .surface_forms()
            .map(str::to_string)
            .chain(TECHNICAL_KEEP_WORDS.iter().map(|w| w.to_string()));

        let keep: HashSet<&str> = TECHNICAL_KEEP_WORDS.iter().copied().collect();
        let stop_words = STOP_WORDS
            .iter()
            .copied()
            .filter(|w| !keep.contains(w))
            .collect();

        Self {
            stop_words,
            lemmatizer: Lemmatizer::with_protected(protected),
            ngram_size: DEFAULT_NGRAM_SIZE,
        }
    }

    /// Set the phrase window; values below 2 disable phrase generation
    pub fn with_ngram_size(mut self, ngram_size: usize) -> Self {
        self.ngram_size = ngram_size;
        self
    }

    /// Check detached plural forms against a noun dictionary
    pub fn with_lexicon(mut self, lexicon: Arc<dyn Lexicon>) -> Self {
        self.lemmatizer = self.lemmatizer.with_lexicon(lexicon);
        self
    }

    pub fn ngram_size(&self) -> usize {
        self.ngram_size
    }

    /// Lower-case, drop everything but letters, digits and technical symbols, collapse whitespace
    pub fn clean(&self, text: &str) -> String {
        let lowered = Self::normalize_unicode(text).to_lowercase();
        let filtered = DISALLOWED_CHARS.replace_all(&lowered, " ");
        WHITESPACE.replace_all(&filtered, " ").trim().to_string()
    }

    /// Split on Unicode word boundaries, keeping technical tokens such as
    /// `c++`, `c#` and `scikit-learn` whole
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let segments: Vec<&str> = text.split_word_bounds().collect();
        let mut tokens = Vec::new();
        let mut current = String::new();

        for (i, segment) in segments.iter().enumerate() {
            if is_word_segment(segment) {
                current.push_str(segment);
                continue;
            }

            let next_is_word = segments.get(i + 1).is_some_and(|next| is_word_segment(next));
            match *segment {
                // Suffix symbols: c++, c#, f#
                "+" | "#" if !current.is_empty() && !next_is_word => current.push_str(segment),
                // Infix joiners: scikit-learn, snake_case, asp.net
                "-" | "_" | "." if !current.is_empty() && next_is_word => current.push_str(segment),
                _ => flush_token(&mut current, &mut tokens),
            }
        }
        flush_token(&mut current, &mut tokens);

        tokens
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Clean, tokenize, drop stop-words, lemmatize, and add n-gram phrases
    pub fn normalize(&self, text: &str) -> DocumentTokens {
        let cleaned = self.clean(text);
        let tokens: Vec<String> = self
            .tokenize(&cleaned)
            .into_iter()
            .filter(|t| !self.is_stop_word(t))
            .collect();

        let lemmas = tokens.iter().map(|t| self.lemmatizer.lemmatize(t)).collect();

        DocumentTokens {
            lemmas,
            phrases: self.phrases(&tokens),
        }
    }

    /// Single space-joined string of lemmas followed by phrases
    pub fn clean_and_lemmatize(&self, text: &str) -> String {
        self.normalize(text).to_text()
    }

    /// Adjacent windows over the stop-filtered, pre-lemmatized stream
    fn phrases(&self, tokens: &[String]) -> Vec<String> {
        if self.ngram_size < 2 {
            return Vec::new();
        }

        tokens.windows(self.ngram_size).map(|window| window.join(" ")).collect()
    }

    /// Map typographic punctuation to ASCII so hyphenated names survive cleaning
    fn normalize_unicode(text: &str) -> String {
        text.chars()
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' => '\'',
                '\u{201C}' | '\u{201D}' => '"',
                '\u{2010}' | '\u{2011}' | '\u{2013}' | '\u{2014}' => '-',
                '\u{2026}' => '.',
                _ => c,
            })
            .collect()
    }
}

fn is_word_segment(segment: &str) -> bool {
    segment.chars().any(|c| c.is_alphanumeric())
}

fn flush_token(current: &mut String, tokens: &mut Vec<String>) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean() {
        let processor = TextProcessor::new();
        let cleaned = processor.clean("  Senior C++/C# Engineer!!  (Node.js, scikit-learn) \n\t 5+ years ");

        assert_eq!(cleaned, "senior c++/c# engineer node.js scikit-learn 5+ years");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let processor = TextProcessor::new();
        let once = processor.clean("Looking for Python, Machine Learning, and AWS experience.");
        let twice = processor.clean(&once);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_tokenize_keeps_technical_tokens() {
        let processor = TextProcessor::new();
        let tokens = processor.tokenize("c++ c# node.js scikit-learn snake_case ci/cd aws.");

        assert_eq!(
            tokens,
            vec!["c++", "c#", "node.js", "scikit-learn", "snake_case", "ci", "cd", "aws"]
        );
    }

    #[test]
    fn test_stop_words_with_technical_override() {
        let processor = TextProcessor::new();

        assert!(processor.is_stop_word("the"));
        assert!(processor.is_stop_word("and"));
        assert!(!processor.is_stop_word("d"));
        assert!(!processor.is_stop_word("sql"));
        assert!(!processor.is_stop_word("python"));
    }

    #[test]
    fn test_normalize_orders_lemmas_before_phrases() {
        let processor = TextProcessor::new();
        let tokens = processor.normalize("Looking for Python, Machine Learning, and AWS experience");

        assert_eq!(
            tokens.lemmas,
            vec!["looking", "python", "machine", "learning", "aws", "experience"]
        );
        assert_eq!(
            tokens.phrases,
            vec!["looking python", "python machine", "machine learning", "learning aws", "aws experience"]
        );
        assert_eq!(
            processor.clean_and_lemmatize("Looking for Python, Machine Learning, and AWS experience"),
            "looking python machine learning aws experience \
             looking python python machine machine learning learning aws aws experience"
        );
    }

    #[test]
    fn test_phrases_skip_removed_stop_words() {
        let processor = TextProcessor::new();
        let tokens = processor.normalize("experience with the cloud");

        assert_eq!(tokens.lemmas, vec!["experience", "cloud"]);
        assert_eq!(tokens.phrases, vec!["experience cloud"]);
    }

    #[test]
    fn test_phrases_use_pre_lemmatized_tokens() {
        let processor = TextProcessor::new();
        let tokens = processor.normalize("Strong communication skills required");

        assert!(tokens.lemmas.contains(&"skill".to_string()));
        assert!(tokens.phrases.contains(&"communication skills".to_string()));
    }

    #[test]
    fn test_ngram_size_disabled() {
        let processor = TextProcessor::new().with_ngram_size(1);
        let tokens = processor.normalize("machine learning engineer");

        assert!(tokens.phrases.is_empty());
        assert_eq!(tokens.lemmas.len(), 3);
    }

    #[test]
    fn test_trigram_window() {
        let processor = TextProcessor::new().with_ngram_size(3);
        let tokens = processor.normalize("natural language processing");

        assert_eq!(tokens.phrases, vec!["natural language processing"]);
    }

    #[test]
    fn test_empty_after_cleaning() {
        let processor = TextProcessor::new();

        assert!(processor.normalize("   !!! ??? ").is_empty());
        assert!(processor.normalize("the and of").is_empty());
    }

    #[test]
    fn test_deterministic_output() {
        let processor = TextProcessor::new();
        let text = "Built ETL pipelines in Spark and Airflow; deployed models with Docker.";

        assert_eq!(processor.clean_and_lemmatize(text), processor.clean_and_lemmatize(text));
    }
}
