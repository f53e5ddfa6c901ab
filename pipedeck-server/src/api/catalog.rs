//! Read-only catalog endpoints: templates, agents, dashboard counters

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use pipedeck_core::domain::agent::Agent;
use pipedeck_core::domain::template::RefactorTemplate;
use pipedeck_core::dto::agent::MonitoringSample;
use pipedeck_core::dto::dashboard::DashboardStats;
use serde::Deserialize;

use super::AppState;
use crate::api::error::ApiResult;
use crate::service::{agent_service, dashboard_service, template_service};

/// GET /refactor-templates
pub async fn list_templates(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RefactorTemplate>>> {
    Ok(Json(template_service::list_templates(&state.pool).await?))
}

/// GET /agents
pub async fn list_agents(State(state): State<AppState>) -> ApiResult<Json<Vec<Agent>>> {
    Ok(Json(agent_service::list_agents(&state.pool).await?))
}

/// GET /agent-monitoring
/// Latest monitoring samples with their agent
///
/// Query parameters:
/// - `limit` (optional): number of samples, at most 100
pub async fn list_monitoring(
    State(state): State<AppState>,
    query: Result<Query<MonitoringQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<MonitoringSample>>> {
    let Query(params) = query?;
    tracing::debug!("Listing monitoring samples (limit: {:?})", params.limit);

    Ok(Json(
        agent_service::list_monitoring(&state.pool, params.limit).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct MonitoringQuery {
    pub limit: Option<i64>,
}

/// GET /dashboard/stats
pub async fn dashboard_stats(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    tracing::debug!("Collecting dashboard stats");
    Ok(Json(dashboard_service::stats(&state.pool).await?))
}
