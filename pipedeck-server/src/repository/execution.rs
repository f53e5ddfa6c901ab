//! Execution Repository
//!
//! Handles all database operations related to pipeline executions.

use chrono::{DateTime, Utc};
use pipedeck_core::domain::execution::{ExecutionStatus, PipelineExecution};
use pipedeck_core::dto::execution::{ExecutionDetails, PipelineRef};
use pipedeck_core::lifecycle::Transition;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::decode_enum;

/// Insert a freshly built execution
pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    exec: &PipelineExecution,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO pipeline_executions (
            id, pipeline_id, status, trigger_type, started_at, completed_at,
            logs, output, error_msg, next_transition_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(exec.id)
    .bind(exec.pipeline_id)
    .bind(exec.status.as_str())
    .bind(exec.trigger_type.as_str())
    .bind(exec.started_at)
    .bind(exec.completed_at)
    .bind(&exec.logs)
    .bind(&exec.output)
    .bind(&exec.error_msg)
    .bind(exec.next_transition_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// Find an execution by ID together with its pipeline projection
pub async fn find_details(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<ExecutionDetails>, sqlx::Error> {
    let row = sqlx::query_as::<_, ExecutionDetailsRow>(
        r#"
        SELECT e.id, e.pipeline_id, e.status, e.trigger_type, e.started_at, e.completed_at,
               e.logs, e.output, e.error_msg, e.next_transition_at,
               p.name AS pipeline_name, p.type AS pipeline_type
        FROM pipeline_executions e
        JOIN pipelines p ON p.id = e.pipeline_id
        WHERE e.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(ExecutionDetails::try_from).transpose()
}

/// List the most recently started executions across all pipelines
pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<ExecutionDetails>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ExecutionDetailsRow>(
        r#"
        SELECT e.id, e.pipeline_id, e.status, e.trigger_type, e.started_at, e.completed_at,
               e.logs, e.output, e.error_msg, e.next_transition_at,
               p.name AS pipeline_name, p.type AS pipeline_type
        FROM pipeline_executions e
        JOIN pipelines p ON p.id = e.pipeline_id
        ORDER BY e.started_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(ExecutionDetails::try_from).collect()
}

/// Find executions by pipeline ID, newest first
pub async fn find_by_pipeline(
    pool: &PgPool,
    pipeline_id: Uuid,
) -> Result<Vec<PipelineExecution>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ExecutionRow>(
        r#"
        SELECT id, pipeline_id, status, trigger_type, started_at, completed_at,
               logs, output, error_msg, next_transition_at
        FROM pipeline_executions
        WHERE pipeline_id = $1
        ORDER BY started_at DESC
        "#,
    )
    .bind(pipeline_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(PipelineExecution::try_from).collect()
}

/// Executions whose next transition is due, oldest fire time first
pub async fn find_due(
    pool: &PgPool,
    now: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<(Uuid, ExecutionStatus)>, sqlx::Error> {
    let rows: Vec<(Uuid, String)> = sqlx::query_as(
        r#"
        SELECT id, status
        FROM pipeline_executions
        WHERE next_transition_at IS NOT NULL
          AND next_transition_at <= $1
          AND status IN ('QUEUED', 'RUNNING')
        ORDER BY next_transition_at ASC
        LIMIT $2
        "#,
    )
    .bind(now)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|(id, status)| Ok((id, decode_enum(&status)?)))
        .collect()
}

/// Apply a lifecycle transition if the execution still has `transition.from`
///
/// Returns false when another writer already moved the execution on.
pub async fn apply_transition(
    pool: &PgPool,
    id: Uuid,
    transition: &Transition,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE pipeline_executions
        SET status = $1,
            logs = $2,
            output = COALESCE($3, output),
            error_msg = $4,
            completed_at = $5,
            next_transition_at = $6
        WHERE id = $7 AND status = $8
        "#,
    )
    .bind(transition.to.as_str())
    .bind(&transition.logs)
    .bind(&transition.output)
    .bind(&transition.error_msg)
    .bind(transition.completed_at)
    .bind(transition.next_transition_at)
    .bind(id)
    .bind(transition.from.as_str())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Count executions in a given status
pub async fn count_by_status(pool: &PgPool, status: ExecutionStatus) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM pipeline_executions WHERE status = $1")
        .bind(status.as_str())
        .fetch_one(pool)
        .await
}

/// Number of completed executions and how many of them succeeded
pub async fn completion_counts(pool: &PgPool) -> Result<(i64, i64), sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT COUNT(*) FILTER (WHERE completed_at IS NOT NULL),
               COUNT(*) FILTER (WHERE status = 'SUCCESS')
        FROM pipeline_executions
        "#,
    )
    .fetch_one(pool)
    .await
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct ExecutionRow {
    id: Uuid,
    pipeline_id: Uuid,
    status: String,
    trigger_type: String,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    logs: String,
    output: serde_json::Value,
    error_msg: Option<String>,
    next_transition_at: Option<DateTime<Utc>>,
}

impl TryFrom<ExecutionRow> for PipelineExecution {
    type Error = sqlx::Error;

    fn try_from(row: ExecutionRow) -> Result<Self, Self::Error> {
        Ok(PipelineExecution {
            id: row.id,
            pipeline_id: row.pipeline_id,
            status: decode_enum(&row.status)?,
            trigger_type: decode_enum(&row.trigger_type)?,
            started_at: row.started_at,
            completed_at: row.completed_at,
            logs: row.logs,
            output: row.output,
            error_msg: row.error_msg,
            next_transition_at: row.next_transition_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ExecutionDetailsRow {
    #[sqlx(flatten)]
    execution: ExecutionRow,
    pipeline_name: String,
    pipeline_type: String,
}

impl TryFrom<ExecutionDetailsRow> for ExecutionDetails {
    type Error = sqlx::Error;

    fn try_from(row: ExecutionDetailsRow) -> Result<Self, Self::Error> {
        let execution = PipelineExecution::try_from(row.execution)?;
        let pipeline = PipelineRef {
            id: execution.pipeline_id,
            name: row.pipeline_name,
            pipeline_type: decode_enum(&row.pipeline_type)?,
        };
        Ok(ExecutionDetails {
            execution,
            pipeline,
        })
    }
}
