//! Pipeline DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::pipeline::{Pipeline, PipelineType};

/// Request to create a new pipeline
///
/// Required fields are optional here so that a missing value surfaces as a
/// validation message rather than a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePipeline {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub pipeline_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ascii_visualization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown_export: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_template: Option<bool>,
}

impl CreatePipeline {
    pub fn new(name: impl Into<String>, pipeline_type: PipelineType) -> Self {
        Self {
            name: Some(name.into()),
            pipeline_type: Some(pipeline_type.as_str().to_string()),
            ..Default::default()
        }
    }
}

/// Validated pipeline creation input
#[derive(Debug, Clone)]
pub struct NewPipeline {
    pub name: String,
    pub pipeline_type: PipelineType,
    pub description: Option<String>,
    pub config: serde_json::Value,
    pub ascii_visualization: Option<String>,
    pub markdown_export: Option<String>,
    pub repository_id: Option<Uuid>,
    pub is_template: bool,
}

/// Repository fields shown next to a pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub name: String,
    pub owner: String,
}

/// A pipeline with its repository projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDetails {
    #[serde(flatten)]
    pub pipeline: Pipeline,
    pub repository: Option<RepositoryRef>,
}

/// Pipeline listing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSummary {
    #[serde(flatten)]
    pub pipeline: Pipeline,
    pub repository: Option<RepositoryRef>,
    pub execution_count: i64,
}

impl From<PipelineSummary> for PipelineDetails {
    fn from(summary: PipelineSummary) -> Self {
        PipelineDetails {
            pipeline: summary.pipeline,
            repository: summary.repository,
        }
    }
}

/// One rendered file of a pipeline export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedFile {
    pub path: String,
    pub content: String,
}

/// Result of exporting a stored pipeline config
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineExport {
    pub pipeline_id: Uuid,
    pub files: Vec<ExportedFile>,
}
