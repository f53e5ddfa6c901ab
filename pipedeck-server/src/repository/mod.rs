//! Repository Module
//!
//! Data access layer for the server.
//! Each repository handles database operations for a specific domain entity.

pub mod agent;
pub mod execution;
pub mod feedback;
pub mod pipeline;
pub mod repo;
pub mod template;

// Re-export for convenience
pub use agent as agent_repository;
pub use execution as execution_repository;
pub use feedback as feedback_repository;
pub use pipeline as pipeline_repository;
pub use repo as repo_repository;
pub use template as template_repository;

use pipedeck_core::domain::UnknownVariant;

/// Parse an enum column, surfacing unknown values as decode errors
fn decode_enum<T>(value: &str) -> Result<T, sqlx::Error>
where
    T: std::str::FromStr<Err = UnknownVariant>,
{
    value.parse::<T>().map_err(|e| sqlx::Error::Decode(Box::new(e)))
}
