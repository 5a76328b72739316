//! Text processing and analysis module

pub mod ontology;
pub mod synonyms;
pub mod wordnet;
pub mod lemmatizer;
pub mod text_processor;
pub mod skill_extractor;
pub mod embeddings;
pub mod similarity;
pub mod gap;
pub mod courses;
pub mod anonymizer;
pub mod analyzer;
