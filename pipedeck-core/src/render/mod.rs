//! Pipeline config export
//!
//! Turns the free-form `config` stored on a pipeline into files a user can
//! commit: GitHub Actions workflows for CI/CD pipelines, a Markdown plan and a
//! phase diagram for DMIAC workflows.

pub mod cicd;
pub mod dmiac;

use thiserror::Error;

use crate::domain::pipeline::{Pipeline, PipelineType};
use crate::dto::pipeline::ExportedFile;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{0} pipelines have no exportable config")]
    Unsupported(PipelineType),

    #[error("pipeline config has no '{0}' section")]
    MissingSection(&'static str),

    #[error("invalid '{section}' config: {source}")]
    InvalidConfig {
        section: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("CI config defines no jobs")]
    NoJobs,

    #[error("invalid CI job name '{0}'")]
    BadJobName(String),

    #[error("failed to write YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Render the export files for a pipeline
pub fn export(pipeline: &Pipeline) -> Result<Vec<ExportedFile>, RenderError> {
    match pipeline.pipeline_type {
        PipelineType::CiCd => cicd::render(&pipeline.name, &pipeline.config, false),
        PipelineType::Combined => cicd::render(&pipeline.name, &pipeline.config, true),
        PipelineType::Dmiac => dmiac::render(pipeline),
        PipelineType::Refactor => Err(RenderError::Unsupported(PipelineType::Refactor)),
    }
}

/// Take one named section of a config object, failing when it is absent
fn section<'a>(
    config: &'a serde_json::Value,
    name: &'static str,
) -> Result<&'a serde_json::Value, RenderError> {
    config
        .get(name)
        .filter(|v| !v.is_null())
        .ok_or(RenderError::MissingSection(name))
}
