use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::catalog::JobCatalog;
use crate::config::MatchingConfig;
use crate::session::store::{SessionStore, StoreError};
use crate::session::{matching_router, MatchingService, SessionHandle, SessionId};

pub(super) const ANALYSIS_DELAY: Duration = Duration::from_millis(2000);

pub(super) fn reference() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0)
        .single()
        .expect("valid reference")
}

pub(super) fn catalog() -> Arc<JobCatalog> {
    Arc::new(JobCatalog::seed(reference()))
}

pub(super) fn matching_config() -> MatchingConfig {
    MatchingConfig {
        suggestion_limit: 20,
        default_top_n: 10,
        analysis_delay: ANALYSIS_DELAY,
        catalog_csv: None,
        session_capacity: 16,
    }
}

pub(super) fn build_service() -> (MatchingService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = MatchingService::new(store.clone(), catalog(), matching_config());
    (service, store)
}

pub(super) fn starter_skills() -> [&'static str; 3] {
    ["JavaScript", "React", "Node.js"]
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) sessions: Arc<Mutex<HashMap<SessionId, SessionHandle>>>,
}

impl SessionStore for MemoryStore {
    fn insert(&self, handle: SessionHandle) -> Result<SessionHandle, StoreError> {
        let mut guard = self.sessions.lock().expect("store mutex poisoned");
        if guard.contains_key(handle.id()) {
            return Err(StoreError::Conflict);
        }
        guard.insert(handle.id().clone(), handle.clone());
        Ok(handle)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionHandle>, StoreError> {
        let guard = self.sessions.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<Option<SessionHandle>, StoreError> {
        let mut guard = self.sessions.lock().expect("store mutex poisoned");
        Ok(guard.remove(id))
    }
}

pub(super) struct ConflictStore;

impl SessionStore for ConflictStore {
    fn insert(&self, _handle: SessionHandle) -> Result<SessionHandle, StoreError> {
        Err(StoreError::Conflict)
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionHandle>, StoreError> {
        Ok(None)
    }

    fn remove(&self, _id: &SessionId) -> Result<Option<SessionHandle>, StoreError> {
        Ok(None)
    }
}

pub(super) struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn insert(&self, _handle: SessionHandle) -> Result<SessionHandle, StoreError> {
        Err(StoreError::Unavailable("cache offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionHandle>, StoreError> {
        Err(StoreError::Unavailable("cache offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<Option<SessionHandle>, StoreError> {
        Err(StoreError::Unavailable("cache offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: MatchingService<MemoryStore>) -> axum::Router {
    matching_router(Arc::new(service))
}
