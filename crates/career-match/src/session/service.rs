use std::sync::Arc;

use super::analysis::{AnalysisTicket, MatchAnalyzer};
use super::store::{SessionStore, StoreError};
use super::{next_session_id, Session, SessionHandle, SessionId, SessionView};
use crate::catalog::{JobCatalog, JobPosting};
use crate::config::MatchingConfig;
use crate::error::MatchError;
use crate::registry::SkillRegistry;
use crate::scorer::{MatchResult, MatchScorer};
use crate::skills::{Skill, SkillSet};

/// Service composing the session store, skill registry, catalog, and analyzer.
pub struct MatchingService<S> {
    store: Arc<S>,
    catalog: Arc<JobCatalog>,
    registry: Arc<SkillRegistry>,
    scorer: MatchScorer,
    analyzer: MatchAnalyzer,
    config: MatchingConfig,
}

impl<S> MatchingService<S>
where
    S: SessionStore + 'static,
{
    pub fn new(store: Arc<S>, catalog: Arc<JobCatalog>, config: MatchingConfig) -> Self {
        let registry = Arc::new(SkillRegistry::from_catalog(
            &catalog,
            config.suggestion_limit,
        ));
        let analyzer = MatchAnalyzer::new(Arc::clone(&catalog), config.analysis_delay);

        Self {
            store,
            catalog,
            registry,
            scorer: MatchScorer::new(),
            analyzer,
            config,
        }
    }

    pub fn catalog(&self) -> &Arc<JobCatalog> {
        &self.catalog
    }

    pub fn registry(&self) -> &Arc<SkillRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    pub fn jobs(&self) -> &[Arc<JobPosting>] {
        self.catalog.all()
    }

    /// Open a session seeded with `initial` skills.
    pub fn open_session<I, N>(&self, initial: I) -> Result<SessionView, MatchingServiceError>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let session = Session::with_skills(next_session_id(), initial)?;
        let stored = self.store.insert(SessionHandle::new(session))?;
        let view = stored.lock().view();
        Ok(view)
    }

    /// Discard a session, cancelling any outstanding analysis.
    pub fn close_session(&self, id: &SessionId) -> Result<(), MatchingServiceError> {
        let handle = self
            .store
            .remove(id)?
            .ok_or_else(|| MatchingServiceError::SessionNotFound(id.clone()))?;
        handle.cancel_analysis();
        Ok(())
    }

    pub fn add_skill(&self, id: &SessionId, name: &str) -> Result<SessionView, MatchingServiceError> {
        let handle = self.handle(id)?;
        let mut session = handle.lock();
        session.add_skill(name)?;
        Ok(session.view())
    }

    pub fn remove_skill(
        &self,
        id: &SessionId,
        name: &str,
    ) -> Result<SessionView, MatchingServiceError> {
        let handle = self.handle(id)?;
        let mut session = handle.lock();
        session.remove_skill(name);
        Ok(session.view())
    }

    pub fn current_skills(&self, id: &SessionId) -> Result<SkillSet, MatchingServiceError> {
        let handle = self.handle(id)?;
        let skills = handle.lock().current_skills().clone();
        Ok(skills)
    }

    pub fn view(&self, id: &SessionId) -> Result<SessionView, MatchingServiceError> {
        let handle = self.handle(id)?;
        let view = handle.lock().view();
        Ok(view)
    }

    /// Autocomplete `prefix` against the vocabulary, skipping skills the session already has.
    pub fn suggest(&self, id: &SessionId, prefix: &str) -> Result<Vec<Skill>, MatchingServiceError> {
        let skills = self.current_skills(id)?;
        Ok(self.registry.suggest(prefix, &skills)?)
    }

    pub fn featured(&self, id: &SessionId, count: usize) -> Result<Vec<Skill>, MatchingServiceError> {
        let skills = self.current_skills(id)?;
        Ok(self.registry.featured(&skills, count))
    }

    /// Stateless ranking query; `top_n` falls back to the configured default.
    pub fn compute_matches(
        &self,
        skills: &SkillSet,
        top_n: Option<usize>,
    ) -> Result<Vec<MatchResult>, MatchError> {
        let top_n = top_n.unwrap_or(self.config.default_top_n);
        self.scorer.rank(skills, self.catalog.all(), top_n)
    }

    /// Start a delayed analysis for the session. Earlier outstanding requests are cancelled.
    pub fn start_analysis(
        &self,
        id: &SessionId,
        top_n: Option<usize>,
    ) -> Result<AnalysisTicket, MatchingServiceError> {
        let handle = self.handle(id)?;
        let top_n = top_n.unwrap_or(self.config.default_top_n);
        Ok(self.analyzer.submit(&handle, top_n)?)
    }

    fn handle(&self, id: &SessionId) -> Result<SessionHandle, MatchingServiceError> {
        self.store
            .fetch(id)?
            .ok_or_else(|| MatchingServiceError::SessionNotFound(id.clone()))
    }
}

/// Error raised by the matching service.
#[derive(Debug, thiserror::Error)]
pub enum MatchingServiceError {
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("session {0} not found")]
    SessionNotFound(SessionId),
}
