//! Skill extraction: maps normalized tokens and phrases to canonical skills

use crate::processing::ontology::{Ontology, SkillId};
use crate::processing::synonyms::SynonymSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use log::debug;

/// Skills found in one document, sorted and deduplicated
pub type SkillSet = BTreeSet<SkillId>;

/// Which tokens get their synonyms expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SynonymExpansion {
    /// Every token, including tokens that are not skills themselves.
    /// A general word whose synonym is a skill name ("trigger" -> "spark")
    /// adds that skill.
    #[default]
    All,
    /// Only tokens that were already admitted as skills
    AdmittedOnly,
    /// No synonym expansion
    Disabled,
}

impl fmt::Display for SynonymExpansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SynonymExpansion::All => "all",
            SynonymExpansion::AdmittedOnly => "admitted-only",
            SynonymExpansion::Disabled => "disabled",
        };
        f.write_str(name)
    }
}

impl FromStr for SynonymExpansion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(SynonymExpansion::All),
            "admitted-only" | "admitted_only" | "strict" => Ok(SynonymExpansion::AdmittedOnly),
            "disabled" | "none" | "off" => Ok(SynonymExpansion::Disabled),
            _ => Err(format!(
                "Invalid synonym expansion: {}. Supported: all, admitted-only, disabled",
                s
            )),
        }
    }
}

pub struct SkillExtractor<'a> {
    ontology: &'a Ontology,
    synonyms: &'a dyn SynonymSource,
    expansion: SynonymExpansion,
}

impl<'a> SkillExtractor<'a> {
    pub fn new(ontology: &'a Ontology, synonyms: &'a dyn SynonymSource) -> Self {
        Self {
            ontology,
            synonyms,
            expansion: SynonymExpansion::default(),
        }
    }

    pub fn with_expansion(mut self, expansion: SynonymExpansion) -> Self {
        self.expansion = expansion;
        self
    }

    /// Extract the set of canonical skills mentioned by a token sequence
    pub fn extract<'t, I>(&self, tokens: I) -> SkillSet
    where
        I: IntoIterator<Item = &'t str>,
    {
        let mut found = SkillSet::new();

        for token in tokens {
            let normalized = self.ontology.canonicalize(token);
            let admitted = self.ontology.resolve(&normalized);
            let expand = match self.expansion {
                SynonymExpansion::All => true,
                SynonymExpansion::AdmittedOnly => admitted.is_some(),
                SynonymExpansion::Disabled => false,
            };

            if let Some(skill) = admitted {
                found.insert(skill);
            }

            if expand {
                // Synonyms must be skill names themselves, never aliases
                let synonyms = self.synonyms.synonyms(&normalized);
                for synonym in synonyms.iter().filter(|s| self.ontology.is_key_or_core(s)) {
                    if let Some(skill) = self.ontology.resolve(synonym) {
                        if !found.contains(&skill) {
                            debug!("Skill '{}' added via synonym of '{}'", skill, normalized);
                        }
                        found.insert(skill);
                    }
                }
            }
        }

        found
    }
}
