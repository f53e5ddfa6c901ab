//! Repository API Handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use pipedeck_core::domain::repository::Repository;
use pipedeck_core::dto::repository::{CreateRepository, RepositorySummary};

use super::AppState;
use crate::api::error::ApiResult;
use crate::service::repo_service;

/// POST /repositories
/// Register a source repository
pub async fn create_repository(
    State(state): State<AppState>,
    payload: Result<Json<CreateRepository>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Repository>)> {
    let Json(req) = payload?;
    tracing::info!("Registering repository: {:?}/{:?}", req.owner, req.name);

    let repository = repo_service::create_repository(&state.pool, req).await?;

    Ok((StatusCode::CREATED, Json(repository)))
}

/// GET /repositories
pub async fn list_repositories(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RepositorySummary>>> {
    tracing::debug!("Listing repositories");

    let repositories = repo_service::list_repositories(&state.pool).await?;

    Ok(Json(repositories))
}
