#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use career_match::catalog::{CompensationRange, EmploymentType, JobCatalog, JobId, JobPosting};
use career_match::session::{SessionHandle, SessionId, SessionStore, StoreError};
use career_match::skills::SkillSet;
use chrono::{DateTime, Duration, TimeZone, Utc};

pub fn reference() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0)
        .single()
        .expect("valid reference")
}

pub fn posting(id: u64, title: &str, skills: &[&str], age_days: i64) -> JobPosting {
    JobPosting {
        id: JobId(id),
        title: title.to_string(),
        employer: "Example Co".to_string(),
        location: "Remote".to_string(),
        employment_type: EmploymentType::FullTime,
        compensation: CompensationRange {
            lower: 100_000,
            upper: 120_000,
            currency: "USD".to_string(),
        },
        required_skills: SkillSet::from_names(skills).expect("valid skills"),
        posted_at: reference() - Duration::days(age_days),
        applicants: 0,
    }
}

pub fn numbered_skills(range: std::ops::RangeInclusive<u32>) -> Vec<String> {
    range.map(|n| format!("skill-{n:02}")).collect()
}

pub fn catalog_fixture() -> JobCatalog {
    let csv = include_str!("../data/jobs.csv");
    JobCatalog::from_reader(csv.as_bytes()).expect("fixture catalog parses")
}

#[derive(Default)]
pub struct InMemoryStore {
    sessions: Mutex<HashMap<SessionId, SessionHandle>>,
}

impl InMemoryStore {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

impl SessionStore for InMemoryStore {
    fn insert(&self, handle: SessionHandle) -> Result<SessionHandle, StoreError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        if guard.contains_key(handle.id()) {
            return Err(StoreError::Conflict);
        }
        guard.insert(handle.id().clone(), handle.clone());
        Ok(handle)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionHandle>, StoreError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<Option<SessionHandle>, StoreError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        Ok(guard.remove(id))
    }
}
