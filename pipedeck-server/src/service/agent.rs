//! Agent Service
//!
//! Read access to deployed agents and their monitoring samples.

use pipedeck_core::domain::agent::Agent;
use pipedeck_core::dto::agent::MonitoringSample;
use sqlx::PgPool;

use crate::repository::agent_repository;

/// Most monitoring samples returned by one listing
pub const MONITORING_LIMIT: i64 = 100;

/// List all agents
pub async fn list_agents(pool: &PgPool) -> Result<Vec<Agent>, sqlx::Error> {
    agent_repository::list_all(pool).await
}

/// List the latest monitoring samples across all agents
pub async fn list_monitoring(
    pool: &PgPool,
    limit: Option<i64>,
) -> Result<Vec<MonitoringSample>, sqlx::Error> {
    agent_repository::list_monitoring(pool, monitoring_limit(limit)).await
}

/// Requested sample count, kept within 1..=MONITORING_LIMIT
fn monitoring_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(MONITORING_LIMIT)
        .clamp(1, MONITORING_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitoring_limit() {
        assert_eq!(monitoring_limit(None), 100);
        assert_eq!(monitoring_limit(Some(20)), 20);
        assert_eq!(monitoring_limit(Some(5000)), 100);
        assert_eq!(monitoring_limit(Some(0)), 1);
        assert_eq!(monitoring_limit(Some(-3)), 1);
    }
}
