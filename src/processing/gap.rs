//! Skill gap analysis between a resume and a job description

use crate::processing::ontology::SkillId;
use crate::processing::skill_extractor::SkillSet;
use serde::{Deserialize, Serialize};

/// Three disjoint, sorted skill lists derived from two skill sets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapResult {
    /// In both resume and job description
    pub matched: Vec<SkillId>,
    /// Required by the job description, absent from the resume
    pub missing: Vec<SkillId>,
    /// In the resume only
    pub extra: Vec<SkillId>,
}

impl GapResult {
    /// Share of job skills the resume covers; `None` when the job names no skills
    pub fn coverage(&self) -> Option<f32> {
        let required = self.matched.len() + self.missing.len();
        if required == 0 {
            None
        } else {
            Some(self.matched.len() as f32 / required as f32)
        }
    }
}

pub struct GapAnalyzer;

impl GapAnalyzer {
    /// Exact set algebra on canonical skills
    pub fn diff(resume: &SkillSet, job: &SkillSet) -> GapResult {
        // BTreeSet iteration is already lexicographic
        GapResult {
            matched: resume.intersection(job).cloned().collect(),
            missing: job.difference(resume).cloned().collect(),
            extra: resume.difference(job).cloned().collect(),
        }
    }
}
