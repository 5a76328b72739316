//! Fit scoring between two normalized documents

use crate::error::{Result, SkillGapError};
use crate::processing::embeddings::EmbeddingHandle;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use log::debug;

/// Terms are runs of at least two word characters
static TERM_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("Invalid term regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringStrategy {
    /// TF-IDF over the two documents
    Lexical,
    /// Dense sentence embeddings
    #[default]
    Semantic,
}

impl fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringStrategy::Lexical => f.write_str("lexical"),
            ScoringStrategy::Semantic => f.write_str("semantic"),
        }
    }
}

impl FromStr for ScoringStrategy {
    type Err = SkillGapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lexical" | "tfidf" | "tf-idf" => Ok(ScoringStrategy::Lexical),
            "semantic" | "embedding" | "embeddings" | "sbert" => Ok(ScoringStrategy::Semantic),
            _ => Err(SkillGapError::Configuration(format!(
                "Invalid scoring strategy: {}. Supported: lexical, semantic",
                s
            ))),
        }
    }
}

/// Cosine-derived fit between resume and job description
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitScore {
    /// In [0, 1]
    pub score: f32,
    pub strategy: ScoringStrategy,
}

impl FitScore {
    pub fn percentage(&self) -> f32 {
        self.score * 100.0
    }
}

/// Parameters of the TF-IDF vector space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LexicalParams {
    /// Smallest and largest n-gram length, in terms
    pub ngram_range: (usize, usize),
    /// Minimum number of documents a term must occur in
    pub min_df: usize,
}

impl Default for LexicalParams {
    fn default() -> Self {
        Self {
            ngram_range: (1, 2),
            min_df: 2,
        }
    }
}

/// TF-IDF vectorizer fitted on exactly the documents it compares
#[derive(Debug, Clone, Default)]
pub struct TfIdfScorer {
    params: LexicalParams,
}

impl TfIdfScorer {
    pub fn new(params: LexicalParams) -> Self {
        Self { params }
    }

    /// Cosine similarity of the two TF-IDF vectors.
    ///
    /// With two documents and `min_df = 2` only shared terms survive, so the
    /// score measures shared vocabulary. No surviving term means no overlap
    /// and scores 0.0. A document without a single term has no vector at all
    /// and is an `EmptyDocument` error.
    pub fn score(&self, a: &str, b: &str) -> Result<f32> {
        let counts = [self.term_counts(a), self.term_counts(b)];
        if let Some(position) = counts.iter().position(BTreeMap::is_empty) {
            let which = if position == 0 { "first" } else { "second" };
            return Err(SkillGapError::EmptyDocument(format!(
                "{} document has no terms of two or more characters",
                which
            )));
        }

        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        for doc in &counts {
            for term in doc.keys() {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let n_docs = counts.len() as f32;
        let idf: HashMap<&str, f32> = document_frequency
            .into_iter()
            .filter(|(_, df)| *df >= self.params.min_df)
            .map(|(term, df)| (term, ((1.0 + n_docs) / (1.0 + df as f32)).ln() + 1.0))
            .collect();

        if idf.is_empty() {
            debug!("No terms survive min_df={}, lexical score is 0", self.params.min_df);
            return Ok(0.0);
        }

        let vectors: Vec<HashMap<&str, f32>> = counts
            .iter()
            .map(|doc| {
                let weights: HashMap<&str, f32> = doc
                    .iter()
                    .filter_map(|(term, count)| {
                        idf.get(term.as_str()).map(|w| (term.as_str(), *count as f32 * w))
                    })
                    .collect();
                l2_normalize(weights)
            })
            .collect();

        let dot: f32 = vectors[0]
            .iter()
            .filter_map(|(term, w)| vectors[1].get(term).map(|v| w * v))
            .sum();

        Ok(dot.clamp(0.0, 1.0))
    }

    /// Whether the text yields at least one term
    pub fn has_terms(&self, text: &str) -> bool {
        !self.term_counts(text).is_empty()
    }

    /// Term -> raw count for unigrams through the configured n-gram length
    fn term_counts(&self, text: &str) -> BTreeMap<String, usize> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = TERM_PATTERN.find_iter(&lowered).map(|m| m.as_str()).collect();
        let (min_n, max_n) = self.params.ngram_range;

        let mut counts = BTreeMap::new();
        for n in min_n.max(1)..=max_n {
            for window in words.windows(n) {
                *counts.entry(window.join(" ")).or_insert(0) += 1;
            }
        }
        counts
    }
}

fn l2_normalize(mut weights: HashMap<&str, f32>) -> HashMap<&str, f32> {
    let norm = weights.values().map(|w| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for w in weights.values_mut() {
            *w /= norm;
        }
    }
    weights
}

/// Cosine similarity of two dense vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(SkillGapError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}

/// Scores two documents with the configured strategy
pub struct SimilarityScorer {
    strategy: ScoringStrategy,
    lexical: TfIdfScorer,
    embeddings: Arc<EmbeddingHandle>,
}

impl SimilarityScorer {
    pub fn new(strategy: ScoringStrategy, lexical: LexicalParams, embeddings: Arc<EmbeddingHandle>) -> Self {
        Self {
            strategy,
            lexical: TfIdfScorer::new(lexical),
            embeddings,
        }
    }

    /// Lexical scorer that never touches an embedding model
    pub fn lexical(params: LexicalParams) -> Self {
        Self::new(ScoringStrategy::Lexical, params, Arc::new(EmbeddingHandle::unconfigured()))
    }

    pub fn strategy(&self) -> ScoringStrategy {
        self.strategy
    }

    pub fn embedding_model(&self) -> Option<&str> {
        self.embeddings.model()
    }

    /// Whether the configured strategy can build a vector from this text
    pub fn can_score(&self, text: &str) -> bool {
        match self.strategy {
            ScoringStrategy::Lexical => self.lexical.has_terms(text),
            ScoringStrategy::Semantic => !text.trim().is_empty(),
        }
    }

    pub fn score(&self, a: &str, b: &str) -> Result<FitScore> {
        let score = match self.strategy {
            ScoringStrategy::Lexical => self.lexical.score(a, b)?,
            ScoringStrategy::Semantic => {
                let encoder = self.embeddings.encoder()?;
                let vectors = encoder.encode(&[a.to_string(), b.to_string()])?;
                let (first, second) = match vectors.as_slice() {
                    [first, second] => (first, second),
                    other => {
                        return Err(SkillGapError::Embedding(format!(
                            "Expected 2 embeddings, got {}",
                            other.len()
                        )))
                    }
                };
                cosine_similarity(first, second)?.clamp(0.0, 1.0)
            }
        };

        debug!("{} similarity: {:.4}", self.strategy, score);
        Ok(FitScore {
            score,
            strategy: self.strategy,
        })
    }
}
