//! Report structures produced by one resume/job analysis

use crate::processing::courses::CourseRecommendation;
use crate::processing::gap::GapResult;
use crate::processing::similarity::FitScore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Whether the fit score clears the configured threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Good,
    Poor,
}

impl Verdict {
    /// `Good` only when the percentage is strictly above the threshold
    pub fn from_percentage(percentage: f32, threshold: f32) -> Self {
        if percentage > threshold {
            Verdict::Good
        } else {
            Verdict::Poor
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Good => f.write_str("Good"),
            Verdict::Poor => f.write_str("Poor"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub fit: FitScore,
    pub verdict: Verdict,
    /// Threshold in percent the verdict was taken against
    pub threshold: f32,
    pub skills: GapResult,
    pub recommendations: Vec<CourseRecommendation>,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub tool_version: String,
    pub embedding_model: Option<String>,
    pub resume_file: Option<String>,
    pub job_file: Option<String>,
}

impl AnalysisReport {
    pub fn fit_percentage(&self) -> f32 {
        self.fit.percentage()
    }

    /// Record where the two documents came from
    pub fn with_sources(mut self, resume: &Path, job: &Path) -> Self {
        self.metadata.resume_file = Some(resume.display().to_string());
        self.metadata.job_file = Some(job.display().to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_threshold_is_strict() {
        assert_eq!(Verdict::from_percentage(70.0, 70.0), Verdict::Poor);
        assert_eq!(Verdict::from_percentage(70.01, 70.0), Verdict::Good);
        assert_eq!(Verdict::from_percentage(0.0, 0.0), Verdict::Poor);
        assert_eq!(Verdict::Good.to_string(), "Good");
    }
}
