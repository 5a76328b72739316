//! Document loading: picks an extractor by file type and remembers what it read

use crate::error::{Result, SkillGapError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use log::{debug, info};

/// Reads resumes and job descriptions as plain text.
///
/// A document read once is served from memory afterwards unless caching is
/// turned off, so the same file passed as both resume and job is read once.
#[derive(Debug, Default)]
pub struct InputManager {
    documents: HashMap<PathBuf, String>,
    no_cache: bool,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.no_cache = !enable;
        self
    }

    /// Plain text of a PDF, text or Markdown document; never blank
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if let Some(text) = self.documents.get(path) {
            debug!("{} already read", path.display());
            return Ok(text.clone());
        }

        if !path.is_file() {
            return Err(SkillGapError::InvalidInput(format!("No such file: {}", path.display())));
        }

        let file_type = FileType::from_path(path);
        debug!("{} detected as {:?}", path.display(), file_type);

        let text = match file_type {
            FileType::Pdf => PdfExtractor.extract(path).await?,
            FileType::Text => PlainTextExtractor.extract(path).await?,
            FileType::Markdown => MarkdownExtractor.extract(path).await?,
            FileType::Docx => {
                return Err(SkillGapError::UnsupportedFormat(format!(
                    "{}: Word documents cannot be read, save it as PDF or plain text",
                    path.display()
                )))
            }
            FileType::Unknown => {
                return Err(SkillGapError::UnsupportedFormat(format!(
                    "{}: expected one of {}",
                    path.display(),
                    FileType::SUPPORTED_EXTENSIONS.join(", ")
                )))
            }
        };

        if text.trim().is_empty() {
            return Err(SkillGapError::InvalidInput(format!("{} contains no text", path.display())));
        }
        info!("Read {} characters from {}", text.chars().count(), path.display());

        if !self.no_cache {
            self.documents.insert(path.to_path_buf(), text.clone());
        }
        Ok(text)
    }

    pub fn clear_cache(&mut self) {
        self.documents.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.documents.len()
    }
}
