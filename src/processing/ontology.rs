//! Skill ontology: canonical skill names, their aliases, and the closed vocabulary

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::path::Path;
use log::{debug, info, warn};

/// Canonical skill identifier (lower-case, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(String);

impl SkillId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SkillId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Skills recognized even when no ontology row names them
pub const CORE_SKILLS: &[&str] = &[
    "python", "java", "c++", "c#", "sql", "nosql", "mysql", "postgresql", "mongodb",
    "pandas", "numpy", "scikit-learn", "sklearn", "matplotlib", "seaborn",
    "tensorflow", "pytorch", "keras", "nlp", "bert", "transformers",
    "machine learning", "deep learning", "statistics", "data analysis",
    "power bi", "tableau", "excel", "aws", "gcp", "azure",
    "spark", "hadoop", "airflow", "docker", "kubernetes", "git",
];

/// Alias table used when no ontology file is available; also merged over file rows
pub const BUILTIN_ALIASES: &[(&str, &[&str])] = &[
    ("scikit-learn", &["sklearn"]),
    ("tensorflow", &["tf"]),
    ("pytorch", &["torch"]),
    ("machine learning", &["ml"]),
];

#[derive(Debug, Deserialize)]
struct OntologyRecord {
    skill: String,
    aliases: String,
}

/// Immutable skill ontology with a merged closed vocabulary
#[derive(Debug, Clone)]
pub struct Ontology {
    /// Canonical skill -> aliases, in first-seen row order
    entries: Vec<(SkillId, BTreeSet<String>)>,
    /// Lower-cased surface form -> canonical skill
    lookup: HashMap<String, SkillId>,
    /// Core skills plus ontology keys, after alias folding
    vocabulary: BTreeSet<SkillId>,
    /// Core skill names and ontology keys as written, before folding
    names: BTreeSet<String>,
}

impl Default for Ontology {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Ontology {
    /// Load the ontology from an optional CSV source.
    ///
    /// Any failure (missing file, unreadable file, malformed rows) is logged and
    /// answered with the built-in table. This never returns an error.
    pub fn load(source: Option<&Path>) -> Self {
        let Some(path) = source else {
            debug!("No ontology source configured, using built-in aliases");
            return Self::builtin();
        };

        match Self::read_csv(path) {
            Ok(rows) => {
                info!("Loaded {} ontology rows from {}", rows.len(), path.display());
                Self::from_rows(rows)
            }
            Err(e) => {
                warn!("Failed to load ontology from {}: {}; using built-in aliases", path.display(), e);
                Self::builtin()
            }
        }
    }

    /// Built-in fallback ontology
    pub fn builtin() -> Self {
        Self::from_rows(Vec::<(&str, Vec<&str>)>::new())
    }

    /// Build an ontology from `(skill, aliases)` rows. Built-in aliases are applied last.
    pub fn from_rows<S, I>(rows: Vec<(S, I)>) -> Self
    where
        S: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let builtin = BUILTIN_ALIASES
            .iter()
            .map(|(skill, aliases)| (skill.to_string(), aliases.iter().map(|a| a.to_string()).collect::<Vec<_>>()));

        let rows: Vec<(String, Vec<String>)> = rows
            .into_iter()
            .map(|(skill, aliases)| {
                (
                    skill.as_ref().to_string(),
                    aliases.into_iter().map(|a| a.as_ref().to_string()).collect(),
                )
            })
            .chain(builtin)
            .collect();

        let mut entries: Vec<(SkillId, BTreeSet<String>)> = Vec::new();
        let mut positions: HashMap<SkillId, usize> = HashMap::new();
        let mut alias_lookup: HashMap<String, SkillId> = HashMap::new();

        for (skill, aliases) in rows {
            let skill = normalize_surface(&skill);
            if skill.is_empty() {
                continue;
            }
            let id = SkillId(skill);
            let idx = *positions.entry(id.clone()).or_insert_with(|| {
                entries.push((id.clone(), BTreeSet::new()));
                entries.len() - 1
            });

            for alias in aliases {
                let alias = normalize_surface(&alias);
                if alias.is_empty() {
                    continue;
                }
                // Later rows win for aliases claimed twice
                alias_lookup.insert(alias.clone(), id.clone());
                entries[idx].1.insert(alias);
            }
        }

        // Ontology keys always resolve to themselves
        let mut lookup = alias_lookup;
        for (id, _) in &entries {
            lookup.insert(id.0.clone(), id.clone());
        }

        // A core skill that is also an alias (sklearn) folds into its canonical skill
        let mut vocabulary: BTreeSet<SkillId> = entries.iter().map(|(id, _)| id.clone()).collect();
        for skill in CORE_SKILLS {
            let id = lookup
                .entry(skill.to_string())
                .or_insert_with(|| SkillId(skill.to_string()))
                .clone();
            vocabulary.insert(id);
        }

        let names = entries
            .iter()
            .map(|(id, _)| id.0.clone())
            .chain(CORE_SKILLS.iter().map(|s| s.to_string()))
            .collect();

        // Keep each entry's alias list consistent with what the lookup resolves
        for (id, aliases) in entries.iter_mut() {
            let id: &SkillId = id;
            aliases.retain(|a| lookup.get(a) == Some(id));
        }

        Self {
            entries,
            lookup,
            vocabulary,
            names,
        }
    }

    fn read_csv(path: &Path) -> std::result::Result<Vec<(String, Vec<String>)>, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut rows = Vec::new();
        for record in reader.deserialize() {
            let record: OntologyRecord = record?;
            let aliases = record
                .aliases
                .split(',')
                .map(|a| a.to_string())
                .collect();
            rows.push((record.skill, aliases));
        }
        Ok(rows)
    }

    /// Map a surface form to its canonical name; unknown forms come back normalized but unchanged
    pub fn canonicalize(&self, token: &str) -> String {
        let surface = normalize_surface(token);
        match self.lookup.get(&surface) {
            Some(id) => id.0.clone(),
            None => surface,
        }
    }

    /// Canonicalize and admit only members of the closed vocabulary
    pub fn resolve(&self, token: &str) -> Option<SkillId> {
        let canonical = self.canonicalize(token);
        self.vocabulary.get(canonical.as_str()).cloned()
    }

    /// Whether a canonical name belongs to the closed vocabulary
    pub fn is_known(&self, canonical: &str) -> bool {
        self.vocabulary.contains(canonical)
    }

    /// Whether a name is itself a core skill or an ontology key. Aliases do
    /// not count, and `sklearn` still does although it folds into `scikit-learn`.
    pub fn is_key_or_core(&self, name: &str) -> bool {
        self.names.contains(&normalize_surface(name))
    }

    /// Every string that resolves to a skill: canonical names and aliases
    pub fn surface_forms(&self) -> impl Iterator<Item = &str> {
        self.lookup.keys().map(|k| k.as_str())
    }

    pub fn vocabulary(&self) -> &BTreeSet<SkillId> {
        &self.vocabulary
    }

    /// Ontology keys in row order
    pub fn canonical_skills(&self) -> impl Iterator<Item = &SkillId> {
        self.entries.iter().map(|(id, _)| id)
    }

    pub fn aliases_of(&self, skill: &str) -> Option<&BTreeSet<String>> {
        self.entries
            .iter()
            .find(|(id, _)| id.as_str() == skill)
            .map(|(_, aliases)| aliases)
    }

    /// Vocabulary with aliases, for listing
    pub fn alias_table(&self) -> BTreeMap<&SkillId, Vec<&str>> {
        self.vocabulary
            .iter()
            .map(|id| {
                let aliases = self
                    .aliases_of(id.as_str())
                    .map(|set| set.iter().map(|a| a.as_str()).filter(|a| *a != id.as_str()).collect())
                    .unwrap_or_default();
                (id, aliases)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::borrow::Borrow<str> for SkillId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

fn normalize_surface(token: &str) -> String {
    token.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_source_uses_builtin() {
        let ontology = Ontology::load(Some(Path::new("does/not/exist.csv")));

        assert_eq!(ontology.canonicalize("ml"), "machine learning");
        assert_eq!(ontology.canonicalize("sklearn"), "scikit-learn");
        assert_eq!(ontology.len(), BUILTIN_ALIASES.len());
    }

    #[test]
    fn test_every_alias_canonicalizes_to_its_skill() {
        let ontology = Ontology::from_rows(vec![
            ("kubernetes", vec!["k8s", "kube"]),
            ("javascript", vec!["js", "ecmascript"]),
        ]);

        for skill in ontology.canonical_skills() {
            for alias in ontology.aliases_of(skill.as_str()).unwrap() {
                assert_eq!(ontology.canonicalize(alias), skill.as_str());
            }
        }
    }

    #[test]
    fn test_csv_loading() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "skill,aliases").unwrap();
        writeln!(file, "JavaScript,\"js, ecmascript\"").unwrap();
        writeln!(file, "kubernetes,k8s").unwrap();

        let ontology = Ontology::load(Some(file.path()));

        assert_eq!(ontology.canonicalize("JS"), "javascript");
        assert_eq!(ontology.canonicalize("ecmascript"), "javascript");
        assert_eq!(ontology.resolve("k8s").unwrap().as_str(), "kubernetes");
        // Built-in aliases are merged over file rows
        assert_eq!(ontology.canonicalize("ml"), "machine learning");
        assert!(ontology.is_known("javascript"));
    }

    #[test]
    fn test_malformed_csv_falls_back() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "name,other").unwrap();
        writeln!(file, "rust,rs").unwrap();

        let ontology = Ontology::load(Some(file.path()));

        assert!(!ontology.is_known("rust"));
        assert_eq!(ontology.canonicalize("ml"), "machine learning");
    }

    #[test]
    fn test_csv_without_aliases_column_falls_back() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "skill").unwrap();
        writeln!(file, "rust").unwrap();
        writeln!(file, "terraform").unwrap();

        let ontology = Ontology::load(Some(file.path()));

        assert!(!ontology.is_known("rust"));
        assert_eq!(ontology.len(), BUILTIN_ALIASES.len());
    }

    #[test]
    fn test_keys_and_core_names_versus_aliases() {
        let ontology = Ontology::from_rows(vec![("kubernetes", vec!["k8s"])]);

        assert!(ontology.is_key_or_core("kubernetes"));
        assert!(ontology.is_key_or_core("Python"));
        assert!(ontology.is_key_or_core("sklearn"));
        assert!(!ontology.is_key_or_core("k8s"));
        assert!(!ontology.is_key_or_core("torch"));
        assert!(!ontology.is_key_or_core("ml"));
    }

    #[test]
    fn test_alias_claimed_twice_last_row_wins() {
        let ontology = Ontology::from_rows(vec![
            ("golang", vec!["go"]),
            ("google go", vec!["go"]),
        ]);

        assert_eq!(ontology.canonicalize("go"), "google go");
        assert!(!ontology.aliases_of("golang").unwrap().contains("go"));
    }

    #[test]
    fn test_canonical_name_resolves_to_itself() {
        let ontology = Ontology::from_rows(vec![
            ("python", Vec::<&str>::new()),
            ("data science", vec!["python"]),
        ]);

        assert_eq!(ontology.canonicalize("python"), "python");
    }

    #[test]
    fn test_core_skill_alias_folds_into_canonical() {
        let ontology = Ontology::builtin();

        assert_eq!(ontology.canonicalize("sklearn"), "scikit-learn");
        assert!(!ontology.is_known("sklearn"));
        assert!(ontology.is_known("scikit-learn"));
    }

    #[test]
    fn test_unknown_token_is_unchanged() {
        let ontology = Ontology::builtin();

        assert_eq!(ontology.canonicalize("  Cobol "), "cobol");
        assert!(ontology.resolve("cobol").is_none());
        assert_eq!(ontology.resolve("Python").unwrap().as_str(), "python");
    }
}
