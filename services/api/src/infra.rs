use career_match::catalog::{CatalogError, JobCatalog};
use career_match::config::MatchingConfig;
use career_match::session::{SessionHandle, SessionId, SessionStore, StoreError};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Bounded session map. Inserting past capacity evicts the least recently used session.
#[derive(Clone)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<Mutex<SessionTable>>,
}

struct SessionTable {
    entries: HashMap<SessionId, StoredSession>,
    capacity: usize,
    clock: u64,
}

struct StoredSession {
    handle: SessionHandle,
    last_used: u64,
}

impl SessionTable {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, stored)| stored.last_used)
            .map(|(id, _)| id.clone());
        if let Some(id) = oldest {
            if let Some(stored) = self.entries.remove(&id) {
                stored.handle.cancel_analysis();
                debug!(session = %id, "evicted idle session");
            }
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::with_capacity(MatchingConfig::default().session_capacity)
    }
}

impl InMemorySessionStore {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(SessionTable {
                entries: HashMap::new(),
                capacity: capacity.max(1),
                clock: 0,
            })),
        }
    }

    fn guard(&self) -> Result<MutexGuard<'_, SessionTable>, StoreError> {
        self.sessions
            .lock()
            .map_err(|_| StoreError::Unavailable("session map poisoned".to_string()))
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, handle: SessionHandle) -> Result<SessionHandle, StoreError> {
        let mut table = self.guard()?;
        if table.entries.contains_key(handle.id()) {
            return Err(StoreError::Conflict);
        }
        while table.entries.len() >= table.capacity {
            table.evict_least_recent();
        }
        let last_used = table.tick();
        table.entries.insert(
            handle.id().clone(),
            StoredSession {
                handle: handle.clone(),
                last_used,
            },
        );
        Ok(handle)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionHandle>, StoreError> {
        let mut table = self.guard()?;
        let now = table.tick();
        Ok(table.entries.get_mut(id).map(|stored| {
            stored.last_used = now;
            stored.handle.clone()
        }))
    }

    fn remove(&self, id: &SessionId) -> Result<Option<SessionHandle>, StoreError> {
        Ok(self.guard()?.entries.remove(id).map(|stored| stored.handle))
    }
}

/// Loads the CSV catalog when one is configured, otherwise the built-in seed postings.
pub(crate) fn load_catalog(
    csv: Option<&Path>,
    reference: DateTime<Utc>,
) -> Result<JobCatalog, CatalogError> {
    match csv {
        Some(path) => {
            let catalog = JobCatalog::from_path(path)?;
            info!(path = %path.display(), postings = catalog.len(), "loaded job catalog");
            Ok(catalog)
        }
        None => Ok(JobCatalog::seed(reference)),
    }
}

/// CLI flags take precedence over the environment-driven matching config.
pub(crate) fn catalog_path<'a>(
    flag: Option<&'a Path>,
    config: &'a MatchingConfig,
) -> Option<&'a Path> {
    flag.or(config.catalog_csv.as_deref())
}
