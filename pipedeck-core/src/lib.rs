//! Pipedeck Core
//!
//! Core types and abstractions for the Pipedeck pipeline dashboard.
//!
//! This crate contains:
//! - Domain types: Core business entities (Pipeline, PipelineExecution, Repository, etc.)
//! - DTOs: Request and response shapes shared by the server, client and CLI
//! - Lifecycle: The simulated execution state machine
//! - Render: Export of stored pipeline configs to workflow YAML and Markdown

pub mod domain;
pub mod dto;
pub mod lifecycle;
pub mod render;
