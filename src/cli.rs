//! CLI interface for skill-gap

use crate::config::OutputFormat;
use crate::processing::similarity::ScoringStrategy;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "skill-gap")]
#[command(about = "Resume and job description fit score with skill gap analysis")]
#[command(long_about = "Score how well a resume fits a job description and list matched, missing and extra skills against a closed skill vocabulary")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a resume against a job description
    Analyze {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (PDF, TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Scoring strategy: lexical or semantic
        #[arg(short, long)]
        strategy: Option<String>,

        /// Ontology CSV with `skill` and `aliases` columns
        #[arg(long)]
        ontology: Option<PathBuf>,

        /// Synonym file, one comma-separated group per line
        #[arg(long)]
        synonyms: Option<PathBuf>,

        /// WordNet dictionary directory (the one holding index.noun, data.noun, ...)
        #[arg(long)]
        wordnet: Option<PathBuf>,

        /// Fit score percentage above which the fit is good (0-100)
        #[arg(short, long)]
        threshold: Option<f32>,

        /// Only expand synonyms of tokens that are already skills
        #[arg(long)]
        strict_synonyms: bool,

        /// Keep e-mail addresses and phone numbers in the analyzed text
        #[arg(long)]
        no_anonymize: bool,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// List the skill vocabulary with aliases
    Skills {
        /// Ontology CSV with `skill` and `aliases` columns
        #[arg(long)]
        ontology: Option<PathBuf>,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

pub fn parse_strategy(strategy: &str) -> Result<ScoringStrategy, String> {
    strategy.parse::<ScoringStrategy>().map_err(|e| e.to_string())
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
