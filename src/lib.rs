//! Skill gap analysis between resumes and job descriptions

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod output;

pub use error::{Result, SkillGapError};
pub use config::Config;
pub use processing::analyzer::AnalysisEngine;
pub use processing::ontology::{Ontology, SkillId};
