//! Per-user skill selection, cancellable match analysis, and the HTTP boundary that drives
//! them.

pub mod analysis;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::task::AbortHandle;

use crate::error::MatchError;
use crate::scorer::{MatchResult, MatchView};
use crate::skills::{Skill, SkillSet};

pub use analysis::{AnalysisOutcome, AnalysisTicket, MatchAnalyzer};
pub use router::matching_router;
pub use service::{MatchingService, MatchingServiceError};
pub use store::{SessionStore, StoreError};

/// Identifier wrapper for live sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("sess-{id:06}"))
}

/// Observable session states. Matching is only enabled once a skill is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Empty,
    Populated,
}

/// One user's skill selection and most recent match results.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    skills: SkillSet,
    last_results: Option<Vec<MatchResult>>,
    generation: u64,
    in_flight: Option<AbortHandle>,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            skills: SkillSet::new(),
            last_results: None,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn with_skills<I, S>(id: SessionId, names: I) -> Result<Self, MatchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut session = Self::new(id);
        session.skills = SkillSet::from_names(names)?;
        Ok(session)
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Adds a skill, returning `false` when an equivalent one is already selected.
    pub fn add_skill(&mut self, name: &str) -> Result<bool, MatchError> {
        let skill = Skill::parse(name)?;
        let added = self.skills.insert(skill);
        if added {
            self.invalidate();
        }
        Ok(added)
    }

    /// Removes a skill if present. Unknown or blank names are ignored.
    pub fn remove_skill(&mut self, name: &str) -> bool {
        let Ok(skill) = Skill::parse(name) else {
            return false;
        };
        let removed = self.skills.remove(&skill);
        if removed {
            self.invalidate();
        }
        removed
    }

    pub fn current_skills(&self) -> &SkillSet {
        &self.skills
    }

    pub fn state(&self) -> SessionState {
        if self.skills.is_empty() {
            SessionState::Empty
        } else {
            SessionState::Populated
        }
    }

    pub fn last_results(&self) -> Option<&[MatchResult]> {
        self.last_results.as_deref()
    }

    pub fn is_analyzing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id.clone(),
            state: self.state(),
            skills: self.skills.display_names(),
            analyzing: self.is_analyzing(),
            results: self
                .last_results
                .as_ref()
                .map(|results| results.iter().map(MatchResult::view).collect()),
        }
    }

    /// Cancels any outstanding analysis and opens a new generation for the next one.
    pub(crate) fn begin_analysis(&mut self) -> u64 {
        self.cancel_pending();
        self.generation += 1;
        self.generation
    }

    pub(crate) fn track(&mut self, handle: AbortHandle) {
        self.in_flight = Some(handle);
    }

    /// Stores results from `generation` if it is still the newest request.
    pub(crate) fn deliver(&mut self, generation: u64, results: Vec<MatchResult>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.last_results = Some(results);
        self.in_flight = None;
        true
    }

    pub(crate) fn cancel_pending(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }

    fn invalidate(&mut self) {
        self.cancel_pending();
        self.generation += 1;
        self.last_results = None;
    }
}

/// Shared handle to a session, cloned into in-flight analysis tasks.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    inner: Arc<Mutex<Session>>,
}

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self {
            id: session.id.clone(),
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Aborts the outstanding analysis, if any, for a session that is being dropped.
    pub fn cancel_analysis(&self) {
        self.lock().cancel_pending();
    }
}

/// Serializable snapshot of a session for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub state: SessionState,
    pub skills: Vec<String>,
    pub analyzing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<MatchView>>,
}
