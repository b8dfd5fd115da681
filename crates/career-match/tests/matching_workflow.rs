mod common;

use std::sync::Arc;

use career_match::catalog::JobId;
use career_match::registry::SkillRegistry;
use career_match::scorer::MatchScorer;
use career_match::skills::SkillSet;
use career_match::MatchError;
use common::{numbered_skills, posting};

#[test]
fn partial_coverage_reports_missing_skills_in_requirement_order() {
    let user = SkillSet::from_names(["JavaScript", "React", "Node.js"]).expect("valid skills");
    let job = Arc::new(posting(
        1,
        "Senior Full-Stack Developer",
        &["JavaScript", "React", "Node.js", "TypeScript", "AWS"],
        2,
    ));

    let result = MatchScorer::new().score(&user, &job);

    assert_eq!(result.score, 60);
    assert_eq!(result.matched, vec!["JavaScript", "React", "Node.js"]);
    assert_eq!(result.missing, vec!["TypeScript", "AWS"]);
}

#[test]
fn rank_returns_exactly_the_top_two_by_score() {
    let user_names = numbered_skills(1..=23);
    let user = SkillSet::from_names(&user_names).expect("valid skills");

    // 19/20, 23/25, 22/25, 17/20 coverage
    let mut high = numbered_skills(1..=19);
    high.push("skill-24".to_string());
    let second = numbered_skills(1..=25);
    let mut third = numbered_skills(1..=22);
    third.extend(numbered_skills(24..=26));
    let mut low = numbered_skills(1..=17);
    low.extend(numbered_skills(24..=26));

    fn as_refs(names: &[String]) -> Vec<&str> {
        names.iter().map(String::as_str).collect()
    }
    let jobs = vec![
        Arc::new(posting(4, "Eighty-five", &as_refs(&low), 1)),
        Arc::new(posting(3, "Eighty-eight", &as_refs(&third), 1)),
        Arc::new(posting(1, "Ninety-five", &as_refs(&high), 1)),
        Arc::new(posting(2, "Ninety-two", &as_refs(&second), 1)),
    ];

    let scorer = MatchScorer::new();
    let all = scorer.rank(&user, &jobs, 4).expect("ranks");
    let scores: Vec<u8> = all.iter().map(|result| result.score).collect();
    assert_eq!(scores, vec![95, 92, 88, 85]);

    let top = scorer.rank(&user, &jobs, 2).expect("ranks");
    let ids: Vec<JobId> = top.iter().map(|result| result.job.id).collect();
    assert_eq!(ids, vec![JobId(1), JobId(2)]);
}

#[test]
fn ranking_is_reproducible_and_breaks_ties_deterministically() {
    let user = SkillSet::from_names(["Rust"]).expect("valid skills");
    let jobs = vec![
        Arc::new(posting(9, "Older", &["Rust", "Go"], 10)),
        Arc::new(posting(7, "Newer", &["Rust", "Zig"], 1)),
        Arc::new(posting(8, "Same day, higher id", &["Rust", "C"], 1)),
        Arc::new(posting(3, "No requirements", &[], 30)),
    ];

    let scorer = MatchScorer::new();
    let first = scorer.rank(&user, &jobs, 10).expect("ranks");
    let second = scorer.rank(&user, &jobs, 10).expect("ranks");
    assert_eq!(first, second);

    let ids: Vec<u64> = first.iter().map(|result| result.job.id.0).collect();
    assert_eq!(ids, vec![3, 7, 8, 9]);
    assert_eq!(first[0].score, 100);
}

#[test]
fn rank_rejects_non_positive_top_n() {
    let user = SkillSet::from_names(["Rust"]).expect("valid skills");
    let jobs = vec![Arc::new(posting(1, "Any", &["Rust"], 0))];

    assert!(matches!(
        MatchScorer::new().rank(&user, &jobs, 0),
        Err(MatchError::InvalidInput(_))
    ));
}

#[test]
fn suggest_ranks_prefix_matches_before_substring_matches() {
    let registry = SkillRegistry::new(
        &["Ajax Java Bridge", "JavaScript", "Java", "Python"],
        &SkillSet::new(),
        20,
    );

    let names: Vec<String> = registry
        .suggest("java", &SkillSet::new())
        .expect("suggests")
        .iter()
        .map(|skill| skill.display().to_string())
        .collect();

    assert_eq!(names, vec!["Java", "JavaScript", "Ajax Java Bridge"]);
}

#[test]
fn suggest_respects_exclusions_and_rejects_empty_prefix() {
    let registry = SkillRegistry::new(&["JavaScript", "Java"], &SkillSet::new(), 20);
    let owned = SkillSet::from_names(["java"]).expect("valid skills");

    let suggestions = registry.suggest("JAVA", &owned).expect("suggests");
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].display(), "JavaScript");

    assert!(matches!(
        registry.suggest("   ", &owned),
        Err(MatchError::InvalidInput(_))
    ));
}
