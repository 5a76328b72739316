//! Configuration management for skill-gap

use crate::error::{Result, SkillGapError};
use crate::processing::similarity::{LexicalParams, ScoringStrategy};
use crate::processing::skill_extractor::SynonymExpansion;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ontology: OntologyConfig,
    pub processing: ProcessingConfig,
    pub scoring: ScoringConfig,
    pub models: ModelConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OntologyConfig {
    /// CSV with `skill` and `aliases` columns; built-in aliases when unset
    pub path: Option<PathBuf>,
    /// Extra synonym groups, one comma-separated group per line
    pub synonyms_path: Option<PathBuf>,
    /// WordNet `dict` directory for synonyms and noun lemmas; built-in
    /// synonym groups and plural rules when unset or unreadable
    pub wordnet_dir: Option<PathBuf>,
    pub synonym_expansion: SynonymExpansion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Phrase length built from adjacent tokens; below 2 disables phrases
    pub ngram_size: usize,
    pub anonymize: bool,
    pub cache_inputs: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub strategy: ScoringStrategy,
    pub min_df: usize,
    pub ngram_range: (usize, usize),
    /// Percentage a fit score must exceed to count as a good fit
    pub fit_threshold: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub embedding_model: String,
    pub models_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
    Markdown,
}

impl Default for OntologyConfig {
    fn default() -> Self {
        Self {
            path: None,
            synonyms_path: None,
            wordnet_dir: Some(data_dir().join("wordnet")),
            synonym_expansion: SynonymExpansion::default(),
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            ngram_size: 2,
            anonymize: true,
            cache_inputs: true,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let lexical = LexicalParams::default();
        Self {
            strategy: ScoringStrategy::Semantic,
            min_df: lexical.min_df,
            ngram_range: lexical.ngram_range,
            fit_threshold: 70.0,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            embedding_model: "minishlab/M2V_base_output".to_string(),
            models_dir: data_dir().join("models"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color: true,
        }
    }
}

/// `~/.skill-gap`, home of downloaded models and dictionaries
fn data_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".skill-gap")
}

impl Config {
    /// Load from the default location, writing defaults there on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Load an explicit config file; it must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| SkillGapError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| SkillGapError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("skill-gap")
            .join("config.toml")
    }

    /// Reject values the analysis cannot work with
    pub fn validate(&self) -> Result<()> {
        let threshold = self.scoring.fit_threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(SkillGapError::Configuration(format!(
                "fit_threshold must be between 0 and 100, got {}",
                threshold
            )));
        }

        let (min_n, max_n) = self.scoring.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(SkillGapError::Configuration(format!(
                "Invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }

        if self.scoring.min_df == 0 {
            return Err(SkillGapError::Configuration("min_df must be at least 1".to_string()));
        }

        if self.scoring.strategy == ScoringStrategy::Semantic && self.models.embedding_model.trim().is_empty() {
            return Err(SkillGapError::Configuration(
                "Semantic scoring requires models.embedding_model".to_string(),
            ));
        }

        Ok(())
    }

    pub fn lexical_params(&self) -> LexicalParams {
        LexicalParams {
            ngram_range: self.scoring.ngram_range,
            min_df: self.scoring.min_df,
        }
    }
}
