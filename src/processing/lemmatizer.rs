//! Rule-based English lemmatizer for noun inflections

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use once_cell::sync::Lazy;

/// Irregular and rule-breaking plurals
static IRREGULAR_FORMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("children", "child"),
        ("people", "person"),
        ("men", "man"),
        ("women", "woman"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("mice", "mouse"),
        ("geese", "goose"),
        ("analyses", "analysis"),
        ("bases", "basis"),
        ("crises", "crisis"),
        ("hypotheses", "hypothesis"),
        ("theses", "thesis"),
        ("criteria", "criterion"),
        ("phenomena", "phenomenon"),
        ("indices", "index"),
        ("matrices", "matrix"),
        ("vertices", "vertex"),
        ("appendices", "appendix"),
        ("lives", "life"),
        ("wives", "wife"),
        ("knives", "knife"),
        ("leaves", "leaf"),
        ("halves", "half"),
        ("selves", "self"),
        ("shelves", "shelf"),
        ("caches", "cache"),
        ("niches", "niche"),
        ("avalanches", "avalanche"),
        ("series", "series"),
        ("species", "species"),
    ]
    .into_iter()
    .collect()
});

/// Endings that look plural but are not
const INVARIANT_SUFFIXES: &[&str] = &["ss", "us", "is", "ous", "ics"];

/// Noun detachment rules, applied to the inflected form as `(suffix, replacement)`
const NOUN_DETACHMENTS: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// Dictionary of known noun base forms
pub trait Lexicon: Send + Sync {
    fn is_noun(&self, lemma: &str) -> bool;
}

/// Maps inflected nouns to their base form.
///
/// Protected words (skill names, technical tokens) are returned unchanged so
/// that `aws` or `kubernetes` are never mistaken for plurals. With a lexicon,
/// a detached form is accepted only if the lexicon knows it as a noun; without
/// one, plural rules are applied blindly.
#[derive(Clone, Default)]
pub struct Lemmatizer {
    protected: HashSet<String>,
    lexicon: Option<Arc<dyn Lexicon>>,
}

impl Lemmatizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_protected<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            protected: words.into_iter().map(Into::into).collect(),
            lexicon: None,
        }
    }

    pub fn with_lexicon(mut self, lexicon: Arc<dyn Lexicon>) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    /// Lemmatize a single lower-case token
    pub fn lemmatize(&self, word: &str) -> String {
        if self.protected.contains(word) {
            return word.to_string();
        }
        if let Some(base) = IRREGULAR_FORMS.get(word) {
            return base.to_string();
        }
        // Only plain alphabetic words inflect; c++, node.js, 3d stay as they are
        if word.chars().count() <= 3 || !word.chars().all(|c| c.is_ascii_alphabetic()) {
            return word.to_string();
        }

        match &self.lexicon {
            Some(lexicon) => dictionary_form(word, lexicon.as_ref()).unwrap_or_else(|| word.to_string()),
            None => rule_form(word),
        }
    }
}

/// Shortest of the word and its detached forms that the lexicon lists as a noun
fn dictionary_form(word: &str, lexicon: &dyn Lexicon) -> Option<String> {
    let detached = NOUN_DETACHMENTS.iter().filter_map(|(suffix, replacement)| {
        word.strip_suffix(suffix)
            .filter(|stem| !stem.is_empty())
            .map(|stem| format!("{}{}", stem, replacement))
    });

    std::iter::once(word.to_string())
        .chain(detached)
        .filter(|form| lexicon.is_noun(form))
        .min_by_key(|form| form.len())
}

fn rule_form(word: &str) -> String {
    if INVARIANT_SUFFIXES.iter().any(|s| word.ends_with(s)) {
        return word.to_string();
    }

    for suffix in ["sses", "ches", "shes", "xes", "zes"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            return format!("{}{}", stem, &suffix[..suffix.len() - 2]);
        }
    }

    if let Some(stem) = word.strip_suffix("ies") {
        if stem.len() >= 2 {
            return format!("{}y", stem);
        }
    }

    match word.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_plurals() {
        let lemmatizer = Lemmatizer::new();

        assert_eq!(lemmatizer.lemmatize("skills"), "skill");
        assert_eq!(lemmatizer.lemmatize("databases"), "database");
        assert_eq!(lemmatizer.lemmatize("processes"), "process");
        assert_eq!(lemmatizer.lemmatize("matches"), "match");
        assert_eq!(lemmatizer.lemmatize("boxes"), "box");
        assert_eq!(lemmatizer.lemmatize("companies"), "company");
    }

    #[test]
    fn test_irregular_and_invariant() {
        let lemmatizer = Lemmatizer::new();

        assert_eq!(lemmatizer.lemmatize("analyses"), "analysis");
        assert_eq!(lemmatizer.lemmatize("children"), "child");
        assert_eq!(lemmatizer.lemmatize("business"), "business");
        assert_eq!(lemmatizer.lemmatize("status"), "status");
        assert_eq!(lemmatizer.lemmatize("analytics"), "analytics");
        assert_eq!(lemmatizer.lemmatize("experienced"), "experienced");
    }

    #[test]
    fn test_short_and_technical_tokens_untouched() {
        let lemmatizer = Lemmatizer::new();

        assert_eq!(lemmatizer.lemmatize("gas"), "gas");
        assert_eq!(lemmatizer.lemmatize("c++"), "c++");
        assert_eq!(lemmatizer.lemmatize("node.js"), "node.js");
    }

    #[test]
    fn test_protected_words() {
        let lemmatizer = Lemmatizer::with_protected(["aws", "kubernetes", "pandas"]);

        assert_eq!(lemmatizer.lemmatize("aws"), "aws");
        assert_eq!(lemmatizer.lemmatize("kubernetes"), "kubernetes");
        assert_eq!(lemmatizer.lemmatize("pandas"), "pandas");
        assert_eq!(Lemmatizer::new().lemmatize("pandas"), "panda");
    }

    struct Nouns(&'static [&'static str]);

    impl Lexicon for Nouns {
        fn is_noun(&self, lemma: &str) -> bool {
            self.0.iter().any(|noun| *noun == lemma)
        }
    }

    fn with_nouns(nouns: &'static [&'static str]) -> Lemmatizer {
        Lemmatizer::new().with_lexicon(Arc::new(Nouns(nouns)))
    }

    #[test]
    fn test_lexicon_checks_detached_forms() {
        let lemmatizer = with_nouns(&["movie", "cookie", "company", "skill", "class"]);

        assert_eq!(lemmatizer.lemmatize("movies"), "movie");
        assert_eq!(lemmatizer.lemmatize("cookies"), "cookie");
        assert_eq!(lemmatizer.lemmatize("companies"), "company");
        assert_eq!(lemmatizer.lemmatize("skills"), "skill");
        assert_eq!(lemmatizer.lemmatize("classes"), "class");

        // Without a lexicon the rules cannot tell
        assert_eq!(Lemmatizer::new().lemmatize("movies"), "movy");
    }

    #[test]
    fn test_lexicon_keeps_unknown_words() {
        let lemmatizer = with_nouns(&["analytics", "status"]);

        assert_eq!(lemmatizer.lemmatize("analytics"), "analytics");
        assert_eq!(lemmatizer.lemmatize("status"), "status");
        assert_eq!(lemmatizer.lemmatize("kubectls"), "kubectls");
    }

    #[test]
    fn test_lexicon_prefers_shortest_known_form() {
        let lemmatizer = with_nouns(&["glasses", "glass"]);

        assert_eq!(lemmatizer.lemmatize("glasses"), "glass");
    }
}
