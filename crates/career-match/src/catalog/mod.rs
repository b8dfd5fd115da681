//! Read-only store of job postings.
//!
//! A catalog is loaded once (embedded seed table or CSV export) and then shared behind an
//! `Arc`; nothing in the crate mutates a posting after load.

mod parser;
mod seed;

use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MatchError;
use crate::skills::{Skill, SkillSet};

/// Identifier wrapper for catalog postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl EmploymentType {
    pub fn parse(value: &str) -> Option<Self> {
        let key: String = value
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect();

        match key.as_str() {
            "fulltime" => Some(Self::FullTime),
            "parttime" => Some(Self::PartTime),
            "contract" | "contractor" => Some(Self::Contract),
            "internship" | "intern" => Some(Self::Internship),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            EmploymentType::FullTime => "Full-time",
            EmploymentType::PartTime => "Part-time",
            EmploymentType::Contract => "Contract",
            EmploymentType::Internship => "Internship",
        }
    }
}

/// Annual compensation band. `lower <= upper` holds for every loaded posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationRange {
    pub lower: u32,
    pub upper: u32,
    pub currency: String,
}

impl CompensationRange {
    pub fn label(&self) -> String {
        if self.currency.eq_ignore_ascii_case("USD")
            && self.lower % 1000 == 0
            && self.upper % 1000 == 0
        {
            format!("${}K - ${}K", self.lower / 1000, self.upper / 1000)
        } else {
            format!("{}-{} {}", self.lower, self.upper, self.currency)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub title: String,
    pub employer: String,
    pub location: String,
    pub employment_type: EmploymentType,
    pub compensation: CompensationRange,
    pub required_skills: SkillSet,
    pub posted_at: DateTime<Utc>,
    pub applicants: u32,
}

impl JobPosting {
    /// Relative age of the posting, e.g. "3 days ago" or "1 week ago".
    pub fn posted_label(&self, now: DateTime<Utc>) -> String {
        let days = (now - self.posted_at).num_days().max(0);
        match days {
            0 => "today".to_string(),
            1 => "1 day ago".to_string(),
            2..=6 => format!("{days} days ago"),
            7..=13 => "1 week ago".to_string(),
            _ => format!("{} weeks ago", days / 7),
        }
    }
}

/// Error enumeration for catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("catalog line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
    #[error("duplicate job id {0}")]
    DuplicateId(JobId),
    #[error("job {id} has a compensation lower bound above its upper bound")]
    InvalidCompensation { id: JobId },
}

#[derive(Debug, Clone, Default)]
pub struct JobCatalog {
    postings: Vec<Arc<JobPosting>>,
}

impl JobCatalog {
    pub fn new(postings: Vec<JobPosting>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for posting in &postings {
            if !seen.insert(posting.id) {
                return Err(CatalogError::DuplicateId(posting.id));
            }
            if posting.compensation.lower > posting.compensation.upper {
                return Err(CatalogError::InvalidCompensation { id: posting.id });
            }
        }

        Ok(Self {
            postings: postings.into_iter().map(Arc::new).collect(),
        })
    }

    /// The built-in demo postings, timestamped relative to `reference`.
    pub fn seed(reference: DateTime<Utc>) -> Self {
        Self {
            postings: seed::postings(reference).into_iter().map(Arc::new).collect(),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let postings = parser::parse_postings(reader)?;
        Self::new(postings)
    }

    pub fn all(&self) -> &[Arc<JobPosting>] {
        &self.postings
    }

    pub fn get(&self, id: JobId) -> Result<&Arc<JobPosting>, MatchError> {
        self.postings
            .iter()
            .find(|posting| posting.id == id)
            .ok_or(MatchError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Every required skill across the catalog, in posting then declaration order.
    pub fn skills(&self) -> impl Iterator<Item = &Skill> {
        self.postings
            .iter()
            .flat_map(|posting| posting.required_skills.iter())
    }
}
