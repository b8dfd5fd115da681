use super::{SessionHandle, SessionId};

/// Storage abstraction for live sessions so the service can be exercised in isolation.
pub trait SessionStore: Send + Sync {
    fn insert(&self, handle: SessionHandle) -> Result<SessionHandle, StoreError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionHandle>, StoreError>;
    fn remove(&self, id: &SessionId) -> Result<Option<SessionHandle>, StoreError>;
}

/// Error enumeration for session store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
