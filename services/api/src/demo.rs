use crate::infra::{catalog_path, load_catalog, InMemorySessionStore};
use career_match::config::{AppConfig, MatchingConfig};
use career_match::error::AppError;
use career_match::registry::SkillRegistry;
use career_match::scorer::{MatchResult, MatchView};
use career_match::session::{AnalysisOutcome, MatchingService};
use career_match::skills::{Skill, SkillSet};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const FEATURED_CHIPS: usize = 6;

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// Skill to match with; repeat the flag or separate names with commas
    #[arg(long = "skill", value_delimiter = ',', required = true)]
    pub(crate) skills: Vec<String>,
    /// Number of postings to return (defaults to MATCH_DEFAULT_TOP_N)
    #[arg(long)]
    pub(crate) top_n: Option<usize>,
    /// Job catalog CSV export
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Emit the ranking as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SuggestArgs {
    /// Case-insensitive prefix to complete
    pub(crate) prefix: String,
    /// Skills already selected; repeat the flag or separate names with commas
    #[arg(long, value_delimiter = ',')]
    pub(crate) exclude: Vec<String>,
    /// Job catalog CSV export whose skills extend the vocabulary
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Job catalog CSV export
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Simulated analysis latency in milliseconds
    #[arg(long, default_value_t = 250)]
    pub(crate) delay_ms: u64,
    /// Number of postings shown in the final ranking
    #[arg(long)]
    pub(crate) top_n: Option<usize>,
}

#[derive(Debug, Serialize)]
struct MatchReport {
    generated_at: DateTime<Utc>,
    skills: Vec<String>,
    matches: Vec<MatchView>,
}

fn build_service(
    catalog: Option<PathBuf>,
    overrides: impl FnOnce(&mut MatchingConfig),
) -> Result<MatchingService<InMemorySessionStore>, AppError> {
    let mut matching = AppConfig::load()?.matching;
    overrides(&mut matching);

    let now = Utc::now();
    let catalog = load_catalog(catalog_path(catalog.as_deref(), &matching), now)?;
    Ok(MatchingService::new(
        Arc::new(InMemorySessionStore::with_capacity(
            matching.session_capacity,
        )),
        Arc::new(catalog),
        matching,
    ))
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let MatchArgs {
        skills,
        top_n,
        catalog,
        json,
    } = args;

    let service = build_service(catalog, |_| {})?;
    let skills = SkillSet::from_names(&skills)?;
    let results = service.compute_matches(&skills, top_n)?;
    let now = Utc::now();

    if json {
        let report = MatchReport {
            generated_at: now,
            skills: skills.display_names(),
            matches: results.iter().map(MatchResult::view).collect(),
        };
        let rendered = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        println!("Top matches for {}", skills.display_names().join(", "));
        render_matches(&results, now);
    }

    Ok(())
}

pub(crate) fn run_suggest(args: SuggestArgs) -> Result<(), AppError> {
    let SuggestArgs {
        prefix,
        exclude,
        catalog,
    } = args;

    let service = build_service(catalog, |_| {})?;
    let excluding = SkillSet::from_names(&exclude)?;
    let suggestions = suggestions_for(service.registry(), &prefix, &excluding)?;

    if suggestions.is_empty() {
        println!("No skills match '{prefix}'");
    }
    for skill in suggestions {
        println!("{}", skill.display());
    }

    Ok(())
}

fn suggestions_for(
    registry: &SkillRegistry,
    prefix: &str,
    excluding: &SkillSet,
) -> Result<Vec<Skill>, AppError> {
    Ok(registry.suggest(prefix, excluding)?)
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        catalog,
        delay_ms,
        top_n,
    } = args;

    let service = build_service(catalog, |matching| {
        matching.analysis_delay = Duration::from_millis(delay_ms);
    })?;

    println!("Career match demo");
    println!(
        "Catalog: {} postings, vocabulary of {} skills",
        service.catalog().len(),
        service.registry().len()
    );

    let view = service.open_session(["JavaScript", "React"])?;
    let session_id = view.session_id;
    println!(
        "\nOpened {session_id} ({:?}) with {}",
        view.state,
        view.skills.join(", ")
    );

    let featured = service.featured(&session_id, FEATURED_CHIPS)?;
    println!("Featured skills: {}", join_display(&featured));

    let suggestions = service.suggest(&session_id, "node")?;
    println!("Suggestions for 'node': {}", join_display(&suggestions));

    service.add_skill(&session_id, "Node.js")?;
    let first = service.start_analysis(&session_id, top_n)?;
    println!(
        "\nAnalysis #{} requested for {}",
        first.generation(),
        service.current_skills(&session_id)?.display_names().join(", ")
    );

    let view = service.add_skill(&session_id, "TypeScript")?;
    let latest = service.start_analysis(&session_id, top_n)?;
    println!(
        "Added TypeScript before it finished; analysis #{} requested for {}",
        latest.generation(),
        view.skills.join(", ")
    );

    let first_generation = first.generation();
    let latest_generation = latest.generation();
    if first.outcome().await == AnalysisOutcome::Superseded {
        println!("Analysis #{first_generation} was superseded and discarded");
    }

    match latest.outcome().await {
        AnalysisOutcome::Completed(results) => {
            println!("\nAnalysis #{latest_generation} results");
            render_matches(&results, Utc::now());
        }
        AnalysisOutcome::Superseded => println!("Latest analysis was superseded"),
    }

    service.close_session(&session_id)?;
    println!("\nClosed {session_id}");
    Ok(())
}

fn join_display(skills: &[Skill]) -> String {
    if skills.is_empty() {
        return "(none)".to_string();
    }
    skills
        .iter()
        .map(Skill::display)
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn render_matches(results: &[MatchResult], now: DateTime<Utc>) {
    if results.is_empty() {
        println!("  no postings in the catalog");
        return;
    }

    for (position, result) in results.iter().enumerate() {
        let job = &result.job;
        println!(
            "  {}. {} at {} ({})",
            position + 1,
            job.title,
            job.employer,
            job.location
        );
        println!(
            "     {}% match | {} | {} | posted {} | {} applicants",
            result.score,
            job.employment_type.label(),
            job.compensation.label(),
            job.posted_label(now),
            job.applicants
        );
        if !result.matched.is_empty() {
            println!("     matched: {}", result.matched.join(", "));
        }
        if !result.missing.is_empty() {
            println!("     missing: {}", result.missing.join(", "));
        }
    }
}
