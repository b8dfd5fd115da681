use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use super::{SessionHandle, SessionId, SessionState};
use crate::catalog::JobCatalog;
use crate::error::MatchError;
use crate::scorer::{validate_top_n, MatchResult, MatchScorer};

/// Runs delayed ranking requests for sessions, last request wins.
#[derive(Debug, Clone)]
pub struct MatchAnalyzer {
    catalog: Arc<JobCatalog>,
    scorer: MatchScorer,
    delay: Duration,
}

impl MatchAnalyzer {
    pub fn new(catalog: Arc<JobCatalog>, delay: Duration) -> Self {
        Self {
            catalog,
            scorer: MatchScorer::new(),
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Starts ranking the session's current skills, cancelling any earlier request.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(
        &self,
        session: &SessionHandle,
        top_n: usize,
    ) -> Result<AnalysisTicket, MatchError> {
        validate_top_n(top_n)?;

        let mut guard = session.lock();
        if guard.state() == SessionState::Empty {
            return Err(MatchError::InvalidInput(
                "add at least one skill before requesting matches".to_string(),
            ));
        }

        let skills = guard.current_skills().clone();
        let generation = guard.begin_analysis();
        let catalog = Arc::clone(&self.catalog);
        let scorer = self.scorer;
        let delay = self.delay;
        let target = session.clone();

        debug!(session = %session.id(), generation, top_n, "analysis started");

        let task = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let results = scorer.ranked(&skills, catalog.all(), top_n);
            if target.lock().deliver(generation, results.clone()) {
                debug!(session = %target.id(), generation, matches = results.len(), "analysis delivered");
                AnalysisOutcome::Completed(results)
            } else {
                debug!(session = %target.id(), generation, "analysis superseded");
                AnalysisOutcome::Superseded
            }
        });

        guard.track(task.abort_handle());
        drop(guard);

        Ok(AnalysisTicket {
            session: session.id().clone(),
            generation,
            task,
        })
    }
}

/// Result of one analysis request.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Completed(Vec<MatchResult>),
    /// A newer request or a skill change replaced this one before it finished.
    Superseded,
}

/// Handle to an in-flight analysis. Dropping it does not cancel the task.
#[derive(Debug)]
pub struct AnalysisTicket {
    session: SessionId,
    generation: u64,
    task: JoinHandle<AnalysisOutcome>,
}

impl AnalysisTicket {
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn outcome(self) -> AnalysisOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => AnalysisOutcome::Superseded,
            Err(err) => std::panic::resume_unwind(err.into_panic()),
        }
    }
}
