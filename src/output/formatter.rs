//! Output formatters for analysis reports

use crate::config::OutputFormat;
use crate::error::{Result, SkillGapError};
use crate::output::report::{AnalysisReport, Verdict};
use crate::processing::ontology::SkillId;
use colored::{Color, Colorize};
use std::path::Path;

pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Terminal output with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON for scripting and integration
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Dispatches a report to the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn join_skills(skills: &[SkillId]) -> String {
    if skills.is_empty() {
        "-".to_string()
    } else {
        skills.iter().map(SkillId::as_str).collect::<Vec<_>>().join(", ")
    }
}

/// First letter upper-cased, as skill headings are shown
fn capitalize(skill: &str) -> String {
    let mut chars = skill.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "▓".blue().bold(), title.blue().bold())
        } else {
            format!("\n▓ {}\n", title)
        }
    }

    fn format_verdict(&self, verdict: Verdict) -> String {
        let color = match verdict {
            Verdict::Good => Color::Green,
            Verdict::Poor => Color::Red,
        };

        if self.use_colors {
            format!("[{}]", verdict.to_string().color(color).bold())
        } else {
            format!("[{}]", verdict)
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("SKILL GAP ANALYSIS"));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));

        output.push_str(&self.format_header("Fit Score"));
        output.push_str(&format!(
            "Fit Score: {:.2}% {}\n",
            report.fit_percentage(),
            self.format_verdict(report.verdict)
        ));
        output.push_str(&format!(
            "Strategy: {} | Good fit above {:.0}%\n",
            report.fit.strategy, report.threshold
        ));

        output.push_str(&self.format_header("Skills"));
        output.push_str(&format!(
            "{} {}\n",
            self.colorize("Matched:", Color::Green),
            join_skills(&report.skills.matched)
        ));
        output.push_str(&format!(
            "{} {}\n",
            self.colorize("Missing:", Color::Red),
            join_skills(&report.skills.missing)
        ));
        output.push_str(&format!(
            "{} {}\n",
            self.colorize("Extra in resume:", Color::Cyan),
            join_skills(&report.skills.extra)
        ));
        if let Some(coverage) = report.skills.coverage() {
            output.push_str(&format!("Coverage of job skills: {:.0}%\n", coverage * 100.0));
        }

        if !report.recommendations.is_empty() {
            output.push_str(&self.format_header("Recommended Courses"));
            for rec in &report.recommendations {
                output.push_str(&format!(
                    "  • {}: {}\n",
                    self.colorize(&capitalize(rec.skill.as_str()), Color::Yellow),
                    rec.courses.join(", ")
                ));
            }
        }

        output.push_str(&format!(
            "\n{} Tailor your resume to include missing skills and align it with the job's keywords.\n",
            self.colorize("Tip:", Color::BrightBlack)
        ));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# Skill Gap Analysis\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms
            ));
            if let (Some(resume), Some(job)) = (&report.metadata.resume_file, &report.metadata.job_file) {
                let file_name = |p: &str| {
                    Path::new(p)
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| p.to_string())
                };
                output.push_str(&format!("**Resume:** `{}` | **Job:** `{}`\n", file_name(resume), file_name(job)));
            }
            output.push('\n');
        }

        output.push_str(&format!(
            "**Fit Score:** {:.2}% ({}, {} strategy)\n\n",
            report.fit_percentage(),
            report.verdict,
            report.fit.strategy
        ));

        output.push_str("## Skills\n\n");
        output.push_str("| | Skills |\n");
        output.push_str("|---|---|\n");
        output.push_str(&format!("| Matched | {} |\n", join_skills(&report.skills.matched)));
        output.push_str(&format!("| Missing | {} |\n", join_skills(&report.skills.missing)));
        output.push_str(&format!("| Extra | {} |\n\n", join_skills(&report.skills.extra)));

        if !report.recommendations.is_empty() {
            output.push_str("## Recommended Courses\n\n");
            for rec in &report.recommendations {
                output.push_str(&format!("- **{}**: {}\n", capitalize(rec.skill.as_str()), rec.courses.join(", ")));
            }
            output.push('\n');
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new(use_colors: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(true)
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content).map_err(|e| {
        SkillGapError::OutputFormatting(format!("Failed to write report to {}: {}", file_path.display(), e))
    })
}

/// Output format implied by a file name, if any
pub fn format_for_path(path: &Path) -> Option<OutputFormat> {
    match path.extension()?.to_str()?.to_lowercase().as_str() {
        "json" => Some(OutputFormat::Json),
        "md" | "markdown" => Some(OutputFormat::Markdown),
        "txt" => Some(OutputFormat::Console),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::analyzer::AnalysisEngine;
    use tempfile::TempDir;

    fn sample_report() -> AnalysisReport {
        AnalysisEngine::new()
            .analyze(
                "Experienced Python developer with SQL and AWS skills",
                "Looking for Python, Machine Learning, and AWS experience",
            )
            .unwrap()
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false).format_report(&sample_report()).unwrap();

        assert!(output.contains("Matched: aws, python"));
        assert!(output.contains("Missing: machine learning"));
        assert!(output.contains("Extra in resume: sql"));
        assert!(output.contains("Machine learning: Machine Learning by Andrew Ng (Coursera)"));
        assert!(!output.contains("\u{1b}["));
    }

    #[test]
    fn test_json_is_parseable() {
        let json = JsonFormatter::new(false).format_report(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["skills"]["missing"][0], "machine learning");
        assert_eq!(value["fit"]["strategy"], "lexical");
        assert!(value["verdict"] == "Good" || value["verdict"] == "Poor");
    }

    #[test]
    fn test_markdown_lists_skills() {
        let report = sample_report().with_sources(Path::new("cv/resume.txt"), Path::new("job.md"));
        let markdown = MarkdownFormatter::new(true).format_report(&report).unwrap();

        assert!(markdown.contains("| Matched | aws, python |"));
        assert!(markdown.contains("`resume.txt`"));
        assert!(markdown.contains("## Recommended Courses"));
    }

    #[test]
    fn test_save_and_format_for_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("report.json");

        save_report_to_file("{}", &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
        assert_eq!(format_for_path(&path), Some(OutputFormat::Json));
        assert_eq!(format_for_path(Path::new("report.pdf")), None);
    }
}
