//! Skill coverage scoring and deterministic ranking of job postings.
//!
//! A job's score is the rounded percentage of its required skills present in the user's
//! skill set. A job without requirements is a full match. Ranking sorts by score, then by
//! recency, then by ascending job id, so identical inputs always produce identical output.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::{JobCatalog, JobId, JobPosting};
use crate::error::MatchError;
use crate::skills::SkillSet;

pub const MAX_SCORE: u8 = 100;

/// Derived match between one user skill set and one posting. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub job: Arc<JobPosting>,
    pub score: u8,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

impl MatchResult {
    pub fn view(&self) -> MatchView {
        MatchView {
            job_id: self.job.id,
            title: self.job.title.clone(),
            employer: self.job.employer.clone(),
            location: self.job.location.clone(),
            employment_type: self.job.employment_type.label(),
            salary: self.job.compensation.label(),
            posted_at: self.job.posted_at,
            applicants: self.job.applicants,
            score: self.score,
            matched_skills: self.matched.clone(),
            missing_skills: self.missing.clone(),
        }
    }
}

/// Serializable projection of a [`MatchResult`] for API and CLI output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchView {
    pub job_id: JobId,
    pub title: String,
    pub employer: String,
    pub location: String,
    pub employment_type: &'static str,
    pub salary: String,
    pub posted_at: DateTime<Utc>,
    pub applicants: u32,
    pub score: u8,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

/// Stateless scorer; safe to share across any number of concurrent requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchScorer;

impl MatchScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, user_skills: &SkillSet, job: &Arc<JobPosting>) -> MatchResult {
        let mut matched = Vec::new();
        let mut missing = Vec::new();

        for skill in &job.required_skills {
            if user_skills.contains(skill) {
                matched.push(skill.display().to_string());
            } else {
                missing.push(skill.display().to_string());
            }
        }

        MatchResult {
            job: Arc::clone(job),
            score: coverage_score(matched.len(), job.required_skills.len()),
            matched,
            missing,
        }
    }

    /// Scores every job and returns the best `top_n`.
    pub fn rank(
        &self,
        user_skills: &SkillSet,
        jobs: &[Arc<JobPosting>],
        top_n: usize,
    ) -> Result<Vec<MatchResult>, MatchError> {
        validate_top_n(top_n)?;
        Ok(self.ranked(user_skills, jobs, top_n))
    }

    /// `rank` without the `top_n` check; callers validate up front.
    pub(crate) fn ranked(
        &self,
        user_skills: &SkillSet,
        jobs: &[Arc<JobPosting>],
        top_n: usize,
    ) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = jobs
            .iter()
            .map(|job| self.score(user_skills, job))
            .collect();
        results.sort_by(rank_order);
        results.truncate(top_n);
        results
    }

    /// Re-scores previously ranked results against the current catalog.
    ///
    /// Fails with [`MatchError::NotFound`] when a referenced job has left the catalog; the
    /// caller recovers by ranking again.
    pub fn refresh(
        &self,
        user_skills: &SkillSet,
        results: &[MatchResult],
        catalog: &JobCatalog,
    ) -> Result<Vec<MatchResult>, MatchError> {
        let mut refreshed = results
            .iter()
            .map(|result| {
                catalog
                    .get(result.job.id)
                    .map(|job| self.score(user_skills, job))
            })
            .collect::<Result<Vec<_>, _>>()?;
        refreshed.sort_by(rank_order);
        Ok(refreshed)
    }
}

pub(crate) fn validate_top_n(top_n: usize) -> Result<(), MatchError> {
    if top_n == 0 {
        return Err(MatchError::InvalidInput(
            "top_n must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

fn coverage_score(matched: usize, required: usize) -> u8 {
    if required == 0 {
        return MAX_SCORE;
    }

    // round half up on integers: floor((200m + r) / 2r)
    let matched = matched.min(required) as u64;
    let required = required as u64;
    let rounded = (200 * matched + required) / (2 * required);
    if matched < required {
        // only full coverage may report 100
        rounded.min(u64::from(MAX_SCORE) - 1) as u8
    } else {
        MAX_SCORE
    }
}

fn rank_order(left: &MatchResult, right: &MatchResult) -> Ordering {
    right
        .score
        .cmp(&left.score)
        .then_with(|| right.job.posted_at.cmp(&left.job.posted_at))
        .then_with(|| left.job.id.cmp(&right.job.id))
}
