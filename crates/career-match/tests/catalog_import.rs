mod common;

use career_match::catalog::{CatalogError, EmploymentType, JobCatalog, JobId};
use career_match::registry::SkillRegistry;
use career_match::scorer::MatchScorer;
use career_match::skills::SkillSet;
use career_match::MatchError;
use common::{catalog_fixture, reference};

#[test]
fn csv_export_loads_into_catalog() {
    let catalog = catalog_fixture();

    assert_eq!(catalog.len(), 5);
    let sre = catalog.get(JobId(105)).expect("posting present");
    assert_eq!(sre.title, "Site Reliability Engineer");
    assert_eq!(sre.employment_type, EmploymentType::FullTime);
    assert_eq!(sre.compensation.label(), "$140K - $185K");
    assert_eq!(sre.required_skills.len(), 5);

    let intern = catalog.get(JobId(104)).expect("posting present");
    assert_eq!(intern.employment_type, EmploymentType::Internship);
    assert_eq!(intern.posted_label(reference()), "1 week ago");
}

#[test]
fn missing_ids_surface_not_found() {
    let catalog = catalog_fixture();
    assert_eq!(
        catalog.get(JobId(999)).map(|posting| posting.id),
        Err(MatchError::NotFound(JobId(999)))
    );
}

#[test]
fn imported_catalog_ranks_by_coverage_then_recency() {
    let catalog = catalog_fixture();
    let user = SkillSet::from_names(["Rust", "Docker", "AWS", "Kubernetes"]).expect("valid");

    let ranked = MatchScorer::new()
        .rank(&user, catalog.all(), 10)
        .expect("ranks");

    let summary: Vec<(u64, u8)> = ranked
        .iter()
        .map(|result| (result.job.id.0, result.score))
        .collect();
    assert_eq!(
        summary,
        vec![(101, 75), (105, 60), (102, 25), (103, 0), (104, 0)]
    );
}

#[test]
fn registry_merges_catalog_skills_with_seed_vocabulary() {
    let catalog = catalog_fixture();
    let registry = SkillRegistry::from_catalog(&catalog, 20);

    assert_eq!(registry.len(), 17);
    let suggestions = registry
        .suggest("ru", &SkillSet::new())
        .expect("suggests");
    assert_eq!(suggestions[0].display(), "Rust");
}

#[test]
fn duplicate_ids_are_rejected() {
    let csv = "id,title,employer,location,employment_type,salary_min,salary_max,currency,skills,posted_at,applicants\n\
        1,A,Acme,Remote,Full-time,1,2,USD,Rust,2025-09-01,0\n\
        1,B,Acme,Remote,Full-time,1,2,USD,Go,2025-09-02,0\n";

    match JobCatalog::from_reader(csv.as_bytes()) {
        Err(CatalogError::DuplicateId(id)) => assert_eq!(id, JobId(1)),
        other => panic!("expected duplicate id error, got {other:?}"),
    }
}

#[test]
fn inverted_compensation_is_rejected() {
    let csv = "id,title,employer,location,employment_type,salary_min,salary_max,currency,skills,posted_at,applicants\n\
        5,A,Acme,Remote,Contract,90000,80000,,Rust,2025-09-01,0\n";

    assert!(matches!(
        JobCatalog::from_reader(csv.as_bytes()),
        Err(CatalogError::InvalidCompensation { id: JobId(5) })
    ));
}
