//! Skill-to-job matching: a canonical skill vocabulary, a job catalog, deterministic
//! coverage scoring, and per-user sessions with cancellable match analysis.

pub mod catalog;
pub mod config;
pub mod error;
pub mod registry;
pub mod scorer;
pub mod session;
pub mod skills;
pub mod telemetry;

pub use catalog::{JobCatalog, JobId, JobPosting};
pub use error::{AppError, MatchError};
pub use registry::SkillRegistry;
pub use scorer::{MatchResult, MatchScorer, MatchView};
pub use skills::{Skill, SkillSet};
