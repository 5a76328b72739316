//! Error handling for the skill-gap analyzer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillGapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Document is empty after preprocessing: {0}")]
    EmptyDocument(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("WordNet dictionary error: {0}")]
    Dictionary(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, SkillGapError>;

/// Model2Vec reports load failures through anyhow
impl From<anyhow::Error> for SkillGapError {
    fn from(err: anyhow::Error) -> Self {
        SkillGapError::Embedding(format!("{:#}", err))
    }
}

impl SkillGapError {
    /// Input errors are the caller's fault and are reported without a stack of context
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SkillGapError::InvalidInput(_)
                | SkillGapError::EmptyDocument(_)
                | SkillGapError::UnsupportedFormat(_)
                | SkillGapError::PdfExtraction(_)
        )
    }
}
