//! skill-gap: resume and job description fit score with skill gap analysis

use clap::Parser;
use log::{error, info, warn};
use skill_gap::cli::{self, Cli, Commands, ConfigAction};
use skill_gap::config::Config;
use skill_gap::error::{Result, SkillGapError};
use skill_gap::input::{FileType, InputManager};
use skill_gap::output::formatter::{format_for_path, save_report_to_file, ReportGenerator};
use skill_gap::processing::analyzer::AnalysisEngine;
use skill_gap::processing::embeddings::EmbeddingHandle;
use skill_gap::processing::ontology::Ontology;
use skill_gap::processing::skill_extractor::SynonymExpansion;
use skill_gap::processing::similarity::ScoringStrategy;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level)
    ).init();

    let config = match &cli.config {
        Some(path) if path.exists() => Config::load_from(path),
        Some(path) => {
            warn!("Config file {} not found, using defaults", path.display());
            Ok(Config::default())
        }
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(2);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        // Bad documents and bad settings are the caller's to fix
        let code = if e.is_input_error() || matches!(e, SkillGapError::Configuration(_)) { 2 } else { 1 };
        process::exit(code);
    }
}

async fn run_command(command: Commands, mut config: Config, config_file: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            strategy,
            ontology,
            synonyms,
            wordnet,
            threshold,
            strict_synonyms,
            no_anonymize,
            output,
            save,
        } => {
            for (label, path) in [("Resume", &resume), ("Job description", &job)] {
                cli::validate_file_extension(path, FileType::SUPPORTED_EXTENSIONS)
                    .map_err(|e| SkillGapError::InvalidInput(format!("{} file: {}", label, e)))?;
            }

            // Flags override the config file
            if let Some(strategy) = strategy {
                config.scoring.strategy = cli::parse_strategy(&strategy).map_err(SkillGapError::Configuration)?;
            }
            if let Some(threshold) = threshold {
                config.scoring.fit_threshold = threshold;
            }
            if ontology.is_some() {
                config.ontology.path = ontology;
            }
            if synonyms.is_some() {
                config.ontology.synonyms_path = synonyms;
            }
            if wordnet.is_some() {
                config.ontology.wordnet_dir = wordnet;
            }
            if strict_synonyms {
                config.ontology.synonym_expansion = SynonymExpansion::AdmittedOnly;
            }
            if no_anonymize {
                config.processing.anonymize = false;
            }
            let output_format = match (output, save.as_deref().and_then(format_for_path)) {
                (Some(format), _) => cli::parse_output_format(&format).map_err(SkillGapError::Configuration)?,
                (None, Some(format)) => format,
                (None, None) => config.output.format,
            };
            config.validate()?;

            info!("Starting skill gap analysis");
            info!("Resume: {} | Job description: {}", resume.display(), job.display());

            let mut input = InputManager::new().with_cache(config.processing.cache_inputs);
            let resume_text = input.extract_text(&resume).await?;
            let job_text = input.extract_text(&job).await?;

            let embeddings = Arc::new(EmbeddingHandle::new(
                config.models.embedding_model.clone(),
                Some(config.models.models_dir.clone()),
            ));
            if config.scoring.strategy == ScoringStrategy::Semantic {
                info!("Using embedding model: {}", config.models.embedding_model);
            }

            let engine = AnalysisEngine::from_config(&config, embeddings)?;
            let report = engine.analyze(&resume_text, &job_text)?.with_sources(&resume, &job);

            let use_colors = config.output.color && save.is_none();
            let rendered = ReportGenerator::new(use_colors).generate_report(&report, output_format)?;

            match save {
                Some(path) => {
                    save_report_to_file(&rendered, &path)?;
                    println!("Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Skills { ontology } => {
            let path = ontology.or(config.ontology.path);
            let ontology = Ontology::load(path.as_deref());
            let aliases = ontology.alias_table();

            println!("{} skills\n", ontology.vocabulary().len());
            for skill in ontology.vocabulary() {
                match aliases.get(skill) {
                    Some(names) if !names.is_empty() => println!("  {} ({})", skill, names.join(", ")),
                    _ => println!("  {}", skill),
                }
            }
        }

        Commands::Config { action } => {
            let path = config_file.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    let content = toml::to_string_pretty(&config)
                        .map_err(|e| SkillGapError::Configuration(format!("Failed to serialize config: {}", e)))?;
                    println!("# {}\n", path.display());
                    println!("{}", content);
                }

                Some(ConfigAction::Reset) => {
                    if path.exists() {
                        warn!("Overwriting {}", path.display());
                    }
                    Config::default().save_to(&path)?;
                    println!("Configuration reset: {}", path.display());
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}
