//! Course suggestions for missing skills

use crate::processing::ontology::SkillId;
use serde::{Deserialize, Serialize};

/// Only this many missing skills get suggestions
pub const MAX_RECOMMENDED_SKILLS: usize = 3;

pub const NO_COURSES: &str = "No courses found";

const COURSE_MAP: &[(&str, &[&str])] = &[
    (
        "python",
        &["Python for Everybody (Coursera)", "Learn Python - FreeCodeCamp (YouTube)"],
    ),
    (
        "sql",
        &["SQL for Data Science (Coursera)", "SQL Tutorial for Beginners (YouTube)"],
    ),
    (
        "machine learning",
        &["Machine Learning by Andrew Ng (Coursera)", "ML Crash Course (Google)"],
    ),
    (
        "aws",
        &["AWS Certified Solutions Architect (Udemy)", "AWS Fundamentals (YouTube)"],
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecommendation {
    pub skill: SkillId,
    pub courses: Vec<String>,
}

pub fn courses_for(skill: &str) -> Vec<String> {
    COURSE_MAP
        .iter()
        .find(|(name, _)| *name == skill)
        .map(|(_, courses)| courses.iter().map(|c| c.to_string()).collect())
        .unwrap_or_else(|| vec![NO_COURSES.to_string()])
}

/// Suggestions for the first few missing skills, in the order given
pub fn recommend(missing: &[SkillId]) -> Vec<CourseRecommendation> {
    missing
        .iter()
        .take(MAX_RECOMMENDED_SKILLS)
        .map(|skill| CourseRecommendation {
            skill: skill.clone(),
            courses: courses_for(skill.as_str()),
        })
        .collect()
}
