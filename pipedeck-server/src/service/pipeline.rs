//! Pipeline Service
//!
//! Business logic for pipeline management and export.

use pipedeck_core::domain::execution::PipelineExecution;
use pipedeck_core::domain::feedback::PipelineFeedback;
use pipedeck_core::domain::pipeline::PipelineType;
use pipedeck_core::dto::pipeline::{
    CreatePipeline, NewPipeline, PipelineDetails, PipelineExport, PipelineSummary, RepositoryRef,
};
use pipedeck_core::render;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::repository::{
    execution_repository, feedback_repository, pipeline_repository, repo_repository,
};

const MAX_NAME_LEN: usize = 255;

/// Service error type
#[derive(Debug)]
pub enum PipelineError {
    NotFound(Uuid),
    ValidationError(String),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for PipelineError {
    fn from(err: sqlx::Error) -> Self {
        PipelineError::DatabaseError(err)
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Create a new pipeline
pub async fn create_pipeline(pool: &PgPool, req: CreatePipeline) -> Result<PipelineDetails> {
    let new = validate_pipeline_request(req)?;

    let repository = match new.repository_id {
        Some(repo_id) => {
            let repo = repo_repository::find_by_id(pool, repo_id)
                .await?
                .ok_or_else(|| {
                    PipelineError::ValidationError(format!("Repository {} not found", repo_id))
                })?;
            Some(RepositoryRef {
                name: repo.name,
                owner: repo.owner,
            })
        }
        None => None,
    };

    let pipeline = pipeline_repository::create(pool, new).await?;

    tracing::info!(
        "Pipeline created: {} ({}, {})",
        pipeline.name,
        pipeline.pipeline_type,
        pipeline.id
    );

    Ok(PipelineDetails {
        pipeline,
        repository,
    })
}

/// Get a pipeline by ID
pub async fn get_pipeline(pool: &PgPool, id: Uuid) -> Result<PipelineDetails> {
    let pipeline = pipeline_repository::find_details(pool, id)
        .await?
        .ok_or(PipelineError::NotFound(id))?;

    Ok(pipeline)
}

/// List all pipelines
pub async fn list_pipelines(pool: &PgPool) -> Result<Vec<PipelineSummary>> {
    let pipelines = pipeline_repository::list_summaries(pool).await?;
    Ok(pipelines)
}

/// List the executions of one pipeline
pub async fn list_executions(pool: &PgPool, id: Uuid) -> Result<Vec<PipelineExecution>> {
    // Verify pipeline exists
    let _pipeline = pipeline_repository::find_by_id(pool, id)
        .await?
        .ok_or(PipelineError::NotFound(id))?;

    let executions = execution_repository::find_by_pipeline(pool, id).await?;
    Ok(executions)
}

/// List the feedback left on one pipeline
pub async fn list_feedback(pool: &PgPool, id: Uuid) -> Result<Vec<PipelineFeedback>> {
    let _pipeline = pipeline_repository::find_by_id(pool, id)
        .await?
        .ok_or(PipelineError::NotFound(id))?;

    let feedback = feedback_repository::find_by_pipeline(pool, id).await?;
    Ok(feedback)
}

/// Render the stored config of a pipeline into exportable files
pub async fn export_pipeline(pool: &PgPool, id: Uuid) -> Result<PipelineExport> {
    let pipeline = pipeline_repository::find_by_id(pool, id)
        .await?
        .ok_or(PipelineError::NotFound(id))?;

    let files = render::export(&pipeline).map_err(|e| {
        tracing::debug!("Export of pipeline {} rejected: {}", id, e);
        PipelineError::ValidationError(e.to_string())
    })?;

    Ok(PipelineExport {
        pipeline_id: id,
        files,
    })
}

// =============================================================================
// Validation
// =============================================================================

/// Check a creation request and fill in defaults
///
/// Blank optional strings are stored as null, a missing config as `{}`.
fn validate_pipeline_request(req: CreatePipeline) -> Result<NewPipeline> {
    let name = non_blank(req.name);
    let (Some(name), Some(pipeline_type)) = (name, non_blank(req.pipeline_type)) else {
        return Err(PipelineError::ValidationError(
            "Name and type are required".to_string(),
        ));
    };

    if name.chars().count() > MAX_NAME_LEN {
        return Err(PipelineError::ValidationError(format!(
            "Pipeline name cannot exceed {} characters",
            MAX_NAME_LEN
        )));
    }

    let pipeline_type: PipelineType = pipeline_type
        .parse()
        .map_err(|_| PipelineError::ValidationError("Invalid pipeline type".to_string()))?;

    Ok(NewPipeline {
        name,
        pipeline_type,
        description: non_blank(req.description),
        config: req.config.filter(|c| !c.is_null()).unwrap_or_else(|| json!({})),
        ascii_visualization: non_blank(req.ascii_visualization),
        markdown_export: non_blank(req.markdown_export),
        repository_id: req.repository_id,
        is_template: req.is_template.unwrap_or(false),
    })
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, pipeline_type: &str) -> CreatePipeline {
        CreatePipeline {
            name: Some(name.to_string()),
            pipeline_type: Some(pipeline_type.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_fills_defaults() {
        let new = validate_pipeline_request(request("Build", "CI_CD")).unwrap();
        assert_eq!(new.name, "Build");
        assert_eq!(new.pipeline_type, PipelineType::CiCd);
        assert_eq!(new.config, json!({}));
        assert!(!new.is_template);
        assert!(new.description.is_none());
    }

    #[test]
    fn test_validate_requires_name_and_type() {
        let mut req = request("Build", "DMIAC");
        req.name = None;
        assert!(matches!(
            validate_pipeline_request(req),
            Err(PipelineError::ValidationError(msg)) if msg == "Name and type are required"
        ));

        assert!(validate_pipeline_request(request("  ", "DMIAC")).is_err());
        assert!(validate_pipeline_request(request("Build", "")).is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_type() {
        assert!(matches!(
            validate_pipeline_request(request("Build", "ci_cd")),
            Err(PipelineError::ValidationError(msg)) if msg == "Invalid pipeline type"
        ));
    }

    #[test]
    fn test_validate_name_length() {
        let long = "x".repeat(256);
        assert!(validate_pipeline_request(request(&long, "REFACTOR")).is_err());
        let max = "x".repeat(255);
        assert!(validate_pipeline_request(request(&max, "REFACTOR")).is_ok());
    }

    #[test]
    fn test_validate_blank_optionals_become_null() {
        let mut req = request("Quality", "COMBINED");
        req.description = Some(String::new());
        req.markdown_export = Some("# Plan".to_string());
        req.is_template = Some(true);
        let new = validate_pipeline_request(req).unwrap();
        assert!(new.description.is_none());
        assert_eq!(new.markdown_export.as_deref(), Some("# Plan"));
        assert!(new.is_template);
    }
}
