//! Data Transfer Objects
//!
//! Request bodies accepted by the HTTP API and the projections it returns.
//! Projections flatten the domain entity and add the shallow relations a
//! listing needs (owning pipeline, repository name, counts).

pub mod agent;
pub mod dashboard;
pub mod execution;
pub mod pipeline;
pub mod repository;
