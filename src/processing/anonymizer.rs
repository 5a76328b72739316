//! PII masking applied to raw text before normalization

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("Invalid email regex")
});

static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:\+?1[-. ]?)?\(?[0-9]{3}\)?[-. ]?[0-9]{3}[-. ]?[0-9]{4}\b")
        .expect("Invalid phone regex")
});

pub trait Anonymizer: Send + Sync {
    /// Mask personal data. Must never fail; on trouble return the text unchanged.
    fn anonymize(&self, text: &str) -> String;
}

/// Pass-through, used when anonymization is turned off
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnonymizer;

impl Anonymizer for NoopAnonymizer {
    fn anonymize(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Replaces e-mail addresses and phone numbers with `*` of the same length
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexAnonymizer;

impl RegexAnonymizer {
    fn mask(caps: &Captures) -> String {
        "*".repeat(caps[0].chars().count())
    }
}

impl Anonymizer for RegexAnonymizer {
    fn anonymize(&self, text: &str) -> String {
        let masked = EMAIL.replace_all(text, Self::mask);
        PHONE.replace_all(&masked, Self::mask).into_owned()
    }
}
