//! Service Module
//!
//! Business logic layer for the server.
//! Services orchestrate between repositories and contain domain logic.

pub mod agent;
pub mod dashboard;
pub mod execution;
pub mod pipeline;
pub mod repo;
pub mod template;

// Re-export for convenience
pub use agent as agent_service;
pub use dashboard as dashboard_service;
pub use execution as execution_service;
pub use pipeline as pipeline_service;
pub use repo as repo_service;
pub use template as template_service;
