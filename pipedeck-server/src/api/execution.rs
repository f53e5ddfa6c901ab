//! Execution API Handlers
//!
//! HTTP endpoints for triggering and inspecting pipeline executions.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use pipedeck_core::dto::execution::{CreateExecution, ExecutionDetails};

use super::AppState;
use crate::api::error::ApiResult;
use crate::api::extract::IdPath;
use crate::service::execution_service;

/// POST /pipeline-executions
/// Trigger a new execution; it starts QUEUED
pub async fn trigger_execution(
    State(state): State<AppState>,
    payload: Result<Json<CreateExecution>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ExecutionDetails>)> {
    let Json(req) = payload?;
    tracing::info!(
        "Triggering execution for pipeline: {:?} ({:?})",
        req.pipeline_id,
        req.trigger_type
    );

    let execution = execution_service::trigger_execution(&state.pool, &state.timing, req).await?;

    Ok((StatusCode::CREATED, Json(execution)))
}

/// GET /pipeline-executions
/// List the most recent executions
pub async fn list_executions(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ExecutionDetails>>> {
    tracing::debug!("Listing recent executions");

    let executions = execution_service::list_recent_executions(&state.pool).await?;

    Ok(Json(executions))
}

/// GET /pipeline-executions/{id}
pub async fn get_execution(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ExecutionDetails>> {
    tracing::debug!("Getting execution: {}", id);

    let execution = execution_service::get_execution(&state.pool, id).await?;

    Ok(Json(execution))
}
