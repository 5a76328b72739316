use proptest::prelude::*;
use skill_gap::processing::gap::GapAnalyzer;
use skill_gap::processing::ontology::{Ontology, CORE_SKILLS};
use skill_gap::error::SkillGapError;
use skill_gap::processing::similarity::TfIdfScorer;
use skill_gap::processing::skill_extractor::SkillSet;
use skill_gap::processing::text_processor::TextProcessor;

fn skill_set() -> impl Strategy<Value = SkillSet> {
    let ontology = Ontology::builtin();
    prop::collection::vec(prop::sample::select(CORE_SKILLS.to_vec()), 0..12).prop_map(move |names| {
        names.iter().filter_map(|name| ontology.resolve(name)).collect()
    })
}

/// Ordinary words mixed with the single-letter technical tokens
fn word_or_letter() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{2,8}",
        prop::sample::select(vec!["c", "r", "d"]).prop_map(str::to_string),
    ]
}

proptest! {
    #[test]
    fn clean_is_idempotent(s in ".*") {
        let processor = TextProcessor::new();
        let once = processor.clean(&s);
        let twice = processor.clean(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalize_is_deterministic(s in "[a-zA-Z0-9 +#.,-]{0,200}") {
        let processor = TextProcessor::new();
        prop_assert_eq!(processor.normalize(&s), processor.normalize(&s));
    }

    #[test]
    fn gap_is_symmetric(a in skill_set(), b in skill_set()) {
        let ab = GapAnalyzer::diff(&a, &b);
        let ba = GapAnalyzer::diff(&b, &a);
        prop_assert_eq!(&ab.matched, &ba.matched);
        prop_assert_eq!(&ab.missing, &ba.extra);
        prop_assert_eq!(&ab.extra, &ba.missing);
    }

    #[test]
    fn gap_partitions_both_sets(resume in skill_set(), job in skill_set()) {
        let gap = GapAnalyzer::diff(&resume, &job);

        let job_side: SkillSet = gap.matched.iter().chain(&gap.missing).cloned().collect();
        let resume_side: SkillSet = gap.matched.iter().chain(&gap.extra).cloned().collect();
        prop_assert_eq!(job_side, job.clone());
        prop_assert_eq!(resume_side, resume.clone());

        prop_assert_eq!(gap.matched.len() + gap.missing.len(), job.len());
        prop_assert_eq!(gap.matched.len() + gap.extra.len(), resume.len());
        prop_assert!(gap.missing.iter().all(|s| !gap.extra.contains(s)));
    }

    #[test]
    fn lexical_score_in_bounds(a in "[a-z ]{0,120}", b in "[a-z ]{0,120}") {
        match TfIdfScorer::default().score(&a, &b) {
            Ok(score) => prop_assert!((0.0..=1.0).contains(&score)),
            Err(e) => prop_assert!(matches!(e, SkillGapError::EmptyDocument(_))),
        }
    }

    #[test]
    fn lexical_self_similarity(words in prop::collection::vec(word_or_letter(), 1..20)) {
        let text = words.join(" ");
        let result = TfIdfScorer::default().score(&text, &text);

        if words.iter().any(|w| w.len() >= 2) {
            let score = result.unwrap();
            prop_assert!((score - 1.0).abs() < 1e-4);
        } else {
            prop_assert!(matches!(result, Err(SkillGapError::EmptyDocument(_))));
        }
    }
}
