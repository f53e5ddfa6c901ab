//! Dashboard Service

use pipedeck_core::domain::execution::ExecutionStatus;
use pipedeck_core::dto::dashboard::{self, DashboardStats};
use sqlx::PgPool;

use crate::repository::{
    agent_repository, execution_repository, pipeline_repository, repo_repository,
};

/// Collect the headline counters
pub async fn stats(pool: &PgPool) -> Result<DashboardStats, sqlx::Error> {
    let (repositories, pipelines, active_executions, agents, (completed, successful)) = tokio::try_join!(
        repo_repository::count_active(pool),
        pipeline_repository::count_active(pool),
        execution_repository::count_by_status(pool, ExecutionStatus::Running),
        agent_repository::count(pool),
        execution_repository::completion_counts(pool),
    )?;

    Ok(DashboardStats {
        repositories,
        pipelines,
        active_executions,
        agents,
        success_rate: dashboard::success_rate(completed, successful),
    })
}
