//! Analysis engine: fit score, skill gap and course suggestions for one resume/job pair

use crate::config::Config;
use crate::error::{Result, SkillGapError};
use crate::output::report::{AnalysisReport, ReportMetadata, Verdict};
use crate::processing::anonymizer::{Anonymizer, NoopAnonymizer, RegexAnonymizer};
use crate::processing::courses;
use crate::processing::embeddings::EmbeddingHandle;
use crate::processing::gap::GapAnalyzer;
use crate::processing::lemmatizer::Lexicon;
use crate::processing::ontology::Ontology;
use crate::processing::similarity::{LexicalParams, ScoringStrategy, SimilarityScorer};
use crate::processing::skill_extractor::{SkillExtractor, SynonymExpansion};
use crate::processing::synonyms::{CombinedSynonyms, SynonymSource, SynonymTable};
use crate::processing::text_processor::TextProcessor;
use crate::processing::wordnet::WordNetDictionary;
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use log::{debug, info, warn};

pub const DEFAULT_FIT_THRESHOLD: f32 = 70.0;

/// Coordinates normalization, scoring, extraction and gap analysis.
///
/// Holds only read-only state after construction, so one engine can serve
/// any number of analyses, including concurrent ones.
pub struct AnalysisEngine {
    ontology: Ontology,
    synonyms: Box<dyn SynonymSource>,
    lexicon: Option<Arc<dyn Lexicon>>,
    processor: TextProcessor,
    scorer: SimilarityScorer,
    anonymizer: Box<dyn Anonymizer>,
    expansion: SynonymExpansion,
    threshold: f32,
}

impl AnalysisEngine {
    /// Engine with built-in ontology and synonyms, lexical scoring and no model
    pub fn new() -> Self {
        let ontology = Ontology::builtin();
        let processor = TextProcessor::for_ontology(&ontology);

        Self {
            ontology,
            synonyms: Box::new(SynonymTable::builtin()),
            lexicon: None,
            processor,
            scorer: SimilarityScorer::lexical(LexicalParams::default()),
            anonymizer: Box::new(RegexAnonymizer),
            expansion: SynonymExpansion::default(),
            threshold: DEFAULT_FIT_THRESHOLD,
        }
    }

    /// Build every component from configuration. The embedding model, if the
    /// strategy needs one, is loaded lazily through the shared handle.
    pub fn from_config(config: &Config, embeddings: Arc<EmbeddingHandle>) -> Result<Self> {
        config.validate()?;

        let ontology = Ontology::load(config.ontology.path.as_deref());
        let (synonyms, lexicon) = lexical_resources(
            config.ontology.wordnet_dir.as_deref(),
            config.ontology.synonyms_path.as_deref(),
        );
        let processor = build_processor(&ontology, config.processing.ngram_size, lexicon.clone());
        let scorer = SimilarityScorer::new(config.scoring.strategy, config.lexical_params(), embeddings);

        let anonymizer: Box<dyn Anonymizer> = if config.processing.anonymize {
            Box::new(RegexAnonymizer)
        } else {
            Box::new(NoopAnonymizer)
        };

        info!(
            "Analysis engine ready: {} skills, {} strategy, synonyms {}",
            ontology.vocabulary().len(),
            config.scoring.strategy,
            config.ontology.synonym_expansion
        );

        Ok(Self {
            ontology,
            synonyms,
            lexicon,
            processor,
            scorer,
            anonymizer,
            expansion: config.ontology.synonym_expansion,
            threshold: config.scoring.fit_threshold,
        })
    }

    pub fn with_ontology(mut self, ontology: Ontology) -> Self {
        self.processor = build_processor(&ontology, self.processor.ngram_size(), self.lexicon.clone());
        self.ontology = ontology;
        self
    }

    /// Noun dictionary consulted by the lemmatizer
    pub fn with_lexicon(mut self, lexicon: Arc<dyn Lexicon>) -> Self {
        self.processor = build_processor(&self.ontology, self.processor.ngram_size(), Some(lexicon.clone()));
        self.lexicon = Some(lexicon);
        self
    }

    pub fn with_synonyms(mut self, synonyms: Box<dyn SynonymSource>) -> Self {
        self.synonyms = synonyms;
        self
    }

    pub fn with_scorer(mut self, scorer: SimilarityScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_anonymizer(mut self, anonymizer: Box<dyn Anonymizer>) -> Self {
        self.anonymizer = anonymizer;
        self
    }

    pub fn with_expansion(mut self, expansion: SynonymExpansion) -> Self {
        self.expansion = expansion;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Result<Self> {
        if !(0.0..=100.0).contains(&threshold) {
            return Err(SkillGapError::Configuration(format!(
                "Threshold must be between 0 and 100, got {}",
                threshold
            )));
        }
        self.threshold = threshold;
        Ok(self)
    }

    pub fn ontology(&self) -> &Ontology {
        &self.ontology
    }

    pub fn strategy(&self) -> ScoringStrategy {
        self.scorer.strategy()
    }

    /// Analyze a resume against a job description
    pub fn analyze(&self, resume_text: &str, job_text: &str) -> Result<AnalysisReport> {
        let start_time = Instant::now();

        if resume_text.trim().is_empty() {
            return Err(SkillGapError::InvalidInput("Resume text is empty".to_string()));
        }
        if job_text.trim().is_empty() {
            return Err(SkillGapError::InvalidInput("Job description text is empty".to_string()));
        }

        let resume_text = self.anonymizer.anonymize(resume_text);
        let job_text = self.anonymizer.anonymize(job_text);

        let resume = self.processor.normalize(&resume_text);
        let job = self.processor.normalize(&job_text);
        if resume.is_empty() {
            return Err(SkillGapError::EmptyDocument("resume".to_string()));
        }
        if job.is_empty() {
            return Err(SkillGapError::EmptyDocument("job description".to_string()));
        }
        debug!("Normalized resume to {} tokens, job to {} tokens", resume.len(), job.len());

        let (resume_doc, job_doc) = (resume.to_text(), job.to_text());
        for (label, doc) in [("resume", &resume_doc), ("job description", &job_doc)] {
            if !self.scorer.can_score(doc) {
                return Err(SkillGapError::EmptyDocument(format!(
                    "{} has no terms the {} scorer can use",
                    label,
                    self.scorer.strategy()
                )));
            }
        }
        let fit = self.scorer.score(&resume_doc, &job_doc)?;

        let extractor = SkillExtractor::new(&self.ontology, &*self.synonyms).with_expansion(self.expansion);
        let resume_skills = extractor.extract(resume.iter());
        let job_skills = extractor.extract(job.iter());
        let gap = GapAnalyzer::diff(&resume_skills, &job_skills);

        let recommendations = courses::recommend(&gap.missing);
        let verdict = Verdict::from_percentage(fit.percentage(), self.threshold);

        info!(
            "Fit {:.2}% ({}): {} matched, {} missing, {} extra",
            fit.percentage(),
            verdict,
            gap.matched.len(),
            gap.missing.len(),
            gap.extra.len()
        );

        let embedding_model = match fit.strategy {
            ScoringStrategy::Semantic => self.scorer.embedding_model().map(str::to_string),
            ScoringStrategy::Lexical => None,
        };

        Ok(AnalysisReport {
            fit,
            verdict,
            threshold: self.threshold,
            skills: gap,
            recommendations,
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                processing_time_ms: start_time.elapsed().as_millis() as u64,
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
                embedding_model,
                resume_file: None,
                job_file: None,
            },
        })
    }
}

fn build_processor(ontology: &Ontology, ngram_size: usize, lexicon: Option<Arc<dyn Lexicon>>) -> TextProcessor {
    let processor = TextProcessor::for_ontology(ontology).with_ngram_size(ngram_size);
    match lexicon {
        Some(lexicon) => processor.with_lexicon(lexicon),
        None => processor,
    }
}

/// WordNet synonyms and noun lemmas when the dictionary loads, otherwise the
/// built-in synonym groups and plural rules. File groups are added either way.
fn lexical_resources(
    wordnet_dir: Option<&Path>,
    synonyms_path: Option<&Path>,
) -> (Box<dyn SynonymSource>, Option<Arc<dyn Lexicon>>) {
    let wordnet = match wordnet_dir.map(WordNetDictionary::load) {
        Some(Ok(wordnet)) => wordnet,
        Some(Err(e)) => {
            warn!("{}; using built-in synonym groups and plural rules", e);
            return (Box::new(SynonymTable::load(synonyms_path)), None);
        }
        None => {
            debug!("No WordNet directory configured, using built-in synonym groups");
            return (Box::new(SynonymTable::load(synonyms_path)), None);
        }
    };

    let mut synonyms = CombinedSynonyms::new().with(wordnet.clone());
    if let Some(path) = synonyms_path {
        synonyms = synonyms.with(SynonymTable::from_file(path));
    }
    let lexicon: Arc<dyn Lexicon> = Arc::new(wordnet);
    (Box::new(synonyms), Some(lexicon))
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(skills: &[crate::processing::ontology::SkillId]) -> Vec<&str> {
        skills.iter().map(|s| s.as_str()).collect()
    }

    #[test]
    fn test_resume_and_job_gap() {
        let engine = AnalysisEngine::new();
        let report = engine
            .analyze(
                "Experienced Python developer with SQL and AWS skills",
                "Looking for Python, Machine Learning, and AWS experience",
            )
            .unwrap();

        assert_eq!(names(&report.skills.matched), vec!["aws", "python"]);
        assert_eq!(names(&report.skills.missing), vec!["machine learning"]);
        assert_eq!(names(&report.skills.extra), vec!["sql"]);
        assert_eq!(report.recommendations.len(), 1);
        assert!((0.0..=1.0).contains(&report.fit.score));
        assert_eq!(report.fit.strategy, ScoringStrategy::Lexical);
    }

    #[test]
    fn test_blank_input_is_rejected() {
        let engine = AnalysisEngine::new();

        assert!(matches!(engine.analyze("   ", "python"), Err(SkillGapError::InvalidInput(_))));
        assert!(matches!(engine.analyze("python", ""), Err(SkillGapError::InvalidInput(_))));
    }

    #[test]
    fn test_job_empty_after_cleaning() {
        let engine = AnalysisEngine::new();
        let err = engine.analyze("Python developer", "!!! ??? ...").unwrap_err();

        assert!(matches!(err, SkillGapError::EmptyDocument(_)));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_stop_words_only_is_empty() {
        let engine = AnalysisEngine::new();

        assert!(matches!(
            engine.analyze("Python developer", "and the of with"),
            Err(SkillGapError::EmptyDocument(_))
        ));
    }

    #[test]
    fn test_single_letter_documents_have_no_lexical_score() {
        let engine = AnalysisEngine::new();
        let err = engine.analyze("C and R", "C and R").unwrap_err();

        assert!(matches!(err, SkillGapError::EmptyDocument(_)));
        assert!(err.to_string().contains("resume"));

        let report = engine.analyze("C and R with SQL", "C and R with SQL").unwrap();
        assert!((report.fit.score - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_missing_wordnet_falls_back_to_builtin_synonyms() {
        let (synonyms, lexicon) = lexical_resources(Some(Path::new("no/such/wordnet/dict")), None);

        assert!(lexicon.is_none());
        assert!(synonyms.synonyms("trigger").contains("spark"));
    }

    struct Nouns(&'static [&'static str]);

    impl Lexicon for Nouns {
        fn is_noun(&self, lemma: &str) -> bool {
            self.0.iter().any(|noun| *noun == lemma)
        }
    }

    #[test]
    fn test_lexicon_survives_ontology_swap() {
        let engine = AnalysisEngine::new()
            .with_lexicon(Arc::new(Nouns(&["movie"])))
            .with_ontology(Ontology::builtin());

        assert_eq!(engine.processor.normalize("movies").lemmas, vec!["movie"]);
        assert_eq!(AnalysisEngine::new().processor.normalize("movies").lemmas, vec!["movy"]);
    }

    #[test]
    fn test_threshold_controls_verdict() {
        let text = "python sql aws docker";
        let lenient = AnalysisEngine::new().with_threshold(0.0).unwrap();
        let strict = AnalysisEngine::new().with_threshold(100.0).unwrap();

        assert_eq!(lenient.analyze(text, text).unwrap().verdict, Verdict::Good);
        assert_eq!(strict.analyze(text, text).unwrap().verdict, Verdict::Poor);
        assert!(AnalysisEngine::new().with_threshold(101.0).is_err());
    }

    #[test]
    fn test_pii_does_not_reach_skills() {
        let engine = AnalysisEngine::new();
        let report = engine
            .analyze("python.dev@aws.com writes Python", "Python and AWS")
            .unwrap();

        assert_eq!(names(&report.skills.matched), vec!["python"]);
        assert_eq!(names(&report.skills.missing), vec!["aws"]);
    }
}
