//! Pipeline API Handlers
//!
//! HTTP endpoints for pipeline management.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use pipedeck_core::domain::execution::PipelineExecution;
use pipedeck_core::domain::feedback::PipelineFeedback;
use pipedeck_core::dto::pipeline::{
    CreatePipeline, PipelineDetails, PipelineExport, PipelineSummary,
};

use super::AppState;
use crate::api::error::ApiResult;
use crate::api::extract::IdPath;
use crate::service::pipeline_service;

/// POST /pipelines
/// Create a new pipeline
pub async fn create_pipeline(
    State(state): State<AppState>,
    payload: Result<Json<CreatePipeline>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PipelineDetails>)> {
    let Json(req) = payload?;
    tracing::info!("Creating pipeline: {:?}", req.name);

    let pipeline = pipeline_service::create_pipeline(&state.pool, req).await?;

    Ok((StatusCode::CREATED, Json(pipeline)))
}

/// GET /pipelines
/// List all pipelines
pub async fn list_pipelines(State(state): State<AppState>) -> ApiResult<Json<Vec<PipelineSummary>>> {
    tracing::debug!("Listing all pipelines");

    let pipelines = pipeline_service::list_pipelines(&state.pool).await?;

    Ok(Json(pipelines))
}

/// GET /pipelines/{id}
/// Get pipeline by ID
pub async fn get_pipeline(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<PipelineDetails>> {
    tracing::debug!("Getting pipeline: {}", id);

    let pipeline = pipeline_service::get_pipeline(&state.pool, id).await?;

    Ok(Json(pipeline))
}

/// GET /pipelines/{id}/executions
/// List the executions of a pipeline, newest first
pub async fn list_pipeline_executions(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Vec<PipelineExecution>>> {
    tracing::debug!("Listing executions for pipeline: {}", id);

    let executions = pipeline_service::list_executions(&state.pool, id).await?;

    Ok(Json(executions))
}

/// GET /pipelines/{id}/feedback
pub async fn list_pipeline_feedback(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Vec<PipelineFeedback>>> {
    let feedback = pipeline_service::list_feedback(&state.pool, id).await?;
    Ok(Json(feedback))
}

/// GET /pipelines/{id}/export
/// Render the pipeline config into workflow or document files
pub async fn export_pipeline(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<PipelineExport>> {
    tracing::debug!("Exporting pipeline: {}", id);

    let export = pipeline_service::export_pipeline(&state.pool, id).await?;

    Ok(Json(export))
}
