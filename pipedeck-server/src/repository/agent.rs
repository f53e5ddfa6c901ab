//! Agent Repository
//!
//! Agents and the monitoring samples they report.

use pipedeck_core::domain::agent::{Agent, AgentMonitoring};
use pipedeck_core::dto::agent::{AgentRef, MonitoringSample};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::decode_enum;

/// Insert an agent as given
pub async fn create<'e>(executor: impl PgExecutor<'e>, agent: &Agent) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO agents (
            id, name, type, status, endpoint, version, config, deployed_at, last_seen, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(agent.id)
    .bind(&agent.name)
    .bind(&agent.agent_type)
    .bind(agent.status.as_str())
    .bind(&agent.endpoint)
    .bind(&agent.version)
    .bind(&agent.config)
    .bind(agent.deployed_at)
    .bind(agent.last_seen)
    .bind(agent.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// Insert one monitoring sample
pub async fn create_sample<'e>(
    executor: impl PgExecutor<'e>,
    sample: &AgentMonitoring,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO agent_monitoring (
            id, agent_id, timestamp, status, cpu_usage, memory_usage, error_count, metrics
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(sample.id)
    .bind(sample.agent_id)
    .bind(sample.timestamp)
    .bind(&sample.status)
    .bind(sample.cpu_usage)
    .bind(sample.memory_usage)
    .bind(sample.error_count)
    .bind(&sample.metrics)
    .execute(executor)
    .await?;

    Ok(())
}

/// List all agents, newest first
pub async fn list_all(pool: &PgPool) -> Result<Vec<Agent>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AgentRow>(
        r#"
        SELECT id, name, type AS agent_type, status, endpoint, version, config,
               deployed_at, last_seen, created_at
        FROM agents
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Agent::try_from).collect()
}

/// Latest monitoring samples across all agents
pub async fn list_monitoring(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<MonitoringSample>, sqlx::Error> {
    let rows = sqlx::query_as::<_, MonitoringRow>(
        r#"
        SELECT m.id, m.agent_id, m.timestamp, m.status, m.cpu_usage, m.memory_usage,
               m.error_count, m.metrics,
               a.name AS agent_name, a.type AS agent_type
        FROM agent_monitoring m
        JOIN agents a ON a.id = m.agent_id
        ORDER BY m.timestamp DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Count registered agents
pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM agents")
        .fetch_one(pool)
        .await
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct AgentRow {
    id: Uuid,
    name: String,
    agent_type: String,
    status: String,
    endpoint: Option<String>,
    version: Option<String>,
    config: serde_json::Value,
    deployed_at: Option<chrono::DateTime<chrono::Utc>>,
    last_seen: Option<chrono::DateTime<chrono::Utc>>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<AgentRow> for Agent {
    type Error = sqlx::Error;

    fn try_from(row: AgentRow) -> Result<Self, Self::Error> {
        Ok(Agent {
            id: row.id,
            name: row.name,
            agent_type: row.agent_type,
            status: decode_enum(&row.status)?,
            endpoint: row.endpoint,
            version: row.version,
            config: row.config,
            deployed_at: row.deployed_at,
            last_seen: row.last_seen,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MonitoringRow {
    id: Uuid,
    agent_id: Uuid,
    timestamp: chrono::DateTime<chrono::Utc>,
    status: String,
    cpu_usage: Option<f64>,
    memory_usage: Option<f64>,
    error_count: i32,
    metrics: serde_json::Value,
    agent_name: String,
    agent_type: String,
}

impl From<MonitoringRow> for MonitoringSample {
    fn from(row: MonitoringRow) -> Self {
        MonitoringSample {
            sample: AgentMonitoring {
                id: row.id,
                agent_id: row.agent_id,
                timestamp: row.timestamp,
                status: row.status,
                cpu_usage: row.cpu_usage,
                memory_usage: row.memory_usage,
                error_count: row.error_count,
                metrics: row.metrics,
            },
            agent: AgentRef {
                name: row.agent_name,
                agent_type: row.agent_type,
            },
        }
    }
}
