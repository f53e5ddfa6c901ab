//! Execution Service
//!
//! Triggering executions and advancing them through the simulated lifecycle.

use chrono::{DateTime, Utc};
use pipedeck_core::domain::execution::TriggerType;
use pipedeck_core::dto::execution::{CreateExecution, ExecutionDetails, PipelineRef};
use pipedeck_core::lifecycle::{self, LifecycleTiming, OutcomeSource};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repository::{execution_repository, pipeline_repository};

/// Number of executions returned by the global listing
pub const RECENT_LIMIT: i64 = 50;

/// Service error type
#[derive(Debug)]
pub enum ExecutionError {
    NotFound(Uuid),
    /// The requested pipeline ID, as sent
    PipelineNotFound(String),
    ValidationError(String),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for ExecutionError {
    fn from(err: sqlx::Error) -> Self {
        ExecutionError::DatabaseError(err)
    }
}

pub type Result<T> = std::result::Result<T, ExecutionError>;

/// Validated trigger request
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerRequest {
    pub pipeline_id: Uuid,
    pub trigger_type: TriggerType,
    pub logs: Option<String>,
    pub output: Option<serde_json::Value>,
}

/// Create a QUEUED execution for a pipeline
///
/// The execution starts moving once the worker picks up its fire time.
pub async fn trigger_execution(
    pool: &PgPool,
    timing: &LifecycleTiming,
    req: CreateExecution,
) -> Result<ExecutionDetails> {
    let req = validate_trigger_request(req)?;

    let pipeline = pipeline_repository::find_by_id(pool, req.pipeline_id)
        .await?
        .ok_or_else(|| ExecutionError::PipelineNotFound(req.pipeline_id.to_string()))?;

    let execution = lifecycle::queued_execution(
        pipeline.id,
        req.trigger_type,
        req.logs,
        req.output,
        Utc::now(),
        timing,
    );
    execution_repository::create(pool, &execution).await?;

    tracing::info!(
        "Execution {} queued for pipeline {} ({})",
        execution.id,
        pipeline.id,
        execution.trigger_type
    );

    Ok(ExecutionDetails {
        execution,
        pipeline: PipelineRef {
            id: pipeline.id,
            name: pipeline.name,
            pipeline_type: pipeline.pipeline_type,
        },
    })
}

/// Get an execution by ID
pub async fn get_execution(pool: &PgPool, id: Uuid) -> Result<ExecutionDetails> {
    let execution = execution_repository::find_details(pool, id)
        .await?
        .ok_or(ExecutionError::NotFound(id))?;

    Ok(execution)
}

/// List the most recent executions
pub async fn list_recent_executions(pool: &PgPool) -> Result<Vec<ExecutionDetails>> {
    let executions = execution_repository::list_recent(pool, RECENT_LIMIT).await?;
    Ok(executions)
}

/// Advance every execution whose next transition is due at `now`
///
/// Returns how many executions moved. A failure on one execution is logged
/// and does not stop the others.
pub async fn advance_due_executions(
    pool: &PgPool,
    timing: &LifecycleTiming,
    outcomes: &dyn OutcomeSource,
    now: DateTime<Utc>,
    batch_size: i64,
) -> Result<usize> {
    let due = execution_repository::find_due(pool, now, batch_size).await?;
    let mut advanced = 0;

    for (id, status) in due {
        let Some(transition) = lifecycle::next_transition(status, now, timing, outcomes) else {
            continue;
        };

        match execution_repository::apply_transition(pool, id, &transition).await {
            Ok(true) => {
                advanced += 1;
                tracing::info!("Execution {} moved {} -> {}", id, transition.from, transition.to);
            }
            Ok(false) => {
                tracing::debug!("Execution {} already left {}", id, transition.from);
            }
            Err(e) => {
                tracing::error!("Failed to advance execution {}: {}", id, e);
            }
        }
    }

    Ok(advanced)
}

// =============================================================================
// Validation
// =============================================================================

/// Check a trigger request
///
/// The trigger type is checked before the pipeline is looked up. A pipeline
/// ID that is not a UUID cannot match any pipeline and reports not found.
pub fn validate_trigger_request(req: CreateExecution) -> Result<TriggerRequest> {
    let pipeline_id = req.pipeline_id.filter(|id| !id.trim().is_empty());
    let trigger_type = req.trigger_type.filter(|t| !t.is_empty());
    let (Some(pipeline_id), Some(trigger_type)) = (pipeline_id, trigger_type) else {
        return Err(ExecutionError::ValidationError(
            "Pipeline ID and trigger type are required".to_string(),
        ));
    };

    let trigger_type: TriggerType = trigger_type
        .parse()
        .map_err(|_| ExecutionError::ValidationError("Invalid trigger type".to_string()))?;

    let pipeline_id = Uuid::parse_str(pipeline_id.trim())
        .map_err(|_| ExecutionError::PipelineNotFound(pipeline_id))?;

    Ok(TriggerRequest {
        pipeline_id,
        trigger_type,
        logs: req.logs,
        output: req.output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use pipedeck_core::domain::execution::ExecutionStatus;
    use pipedeck_core::domain::pipeline::PipelineType;
    use pipedeck_core::dto::pipeline::CreatePipeline;
    use pipedeck_core::lifecycle::{FixedOutcome, Outcome};
    use serde_json::json;

    use crate::service::pipeline_service;

    #[test]
    fn test_validate_trigger_request() {
        let pipeline_id = Uuid::new_v4();
        let req = validate_trigger_request(CreateExecution::new(pipeline_id, TriggerType::Webhook))
            .unwrap();
        assert_eq!(req.pipeline_id, pipeline_id);
        assert_eq!(req.trigger_type, TriggerType::Webhook);
        assert!(req.logs.is_none());
    }

    #[test]
    fn test_validate_trigger_keeps_payload() {
        let mut create = CreateExecution::new(Uuid::new_v4(), TriggerType::Manual);
        create.logs = Some("manual run".to_string());
        create.output = Some(json!({"ref": "main"}));
        let req = validate_trigger_request(create).unwrap();
        assert_eq!(req.logs.as_deref(), Some("manual run"));
        assert_eq!(req.output, Some(json!({"ref": "main"})));
    }

    #[test]
    fn test_validate_trigger_missing_fields() {
        let missing_pipeline = CreateExecution {
            trigger_type: Some("MANUAL".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_trigger_request(missing_pipeline),
            Err(ExecutionError::ValidationError(msg))
                if msg == "Pipeline ID and trigger type are required"
        ));

        let missing_trigger = CreateExecution {
            pipeline_id: Some(Uuid::new_v4().to_string()),
            ..Default::default()
        };
        assert!(validate_trigger_request(missing_trigger).is_err());
    }

    #[test]
    fn test_validate_trigger_unparseable_pipeline_id() {
        let req = CreateExecution {
            pipeline_id: Some("does-not-exist".to_string()),
            trigger_type: Some("MANUAL".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_trigger_request(req),
            Err(ExecutionError::PipelineNotFound(id)) if id == "does-not-exist"
        ));

        // The trigger type is still checked first
        let req = CreateExecution {
            pipeline_id: Some("does-not-exist".to_string()),
            trigger_type: Some("CRON".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_trigger_request(req),
            Err(ExecutionError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_trigger_unknown_type() {
        let req = CreateExecution {
            pipeline_id: Some(Uuid::new_v4().to_string()),
            trigger_type: Some("CRON".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_trigger_request(req),
            Err(ExecutionError::ValidationError(msg)) if msg == "Invalid trigger type"
        ));
    }

    #[tokio::test]
    #[ignore = "needs PostgreSQL at DATABASE_URL"]
    async fn test_lifecycle_against_database() {
        let (pool, _guard) = crate::db::testing::database().await;
        let timing = LifecycleTiming::default();
        let outcomes = FixedOutcome(Outcome::Failure);
        // Large enough that rows left by earlier runs cannot crowd ours out
        let batch = 10_000;

        let pipeline = pipeline_service::create_pipeline(
            &pool,
            CreatePipeline::new("X", PipelineType::CiCd),
        )
        .await
        .unwrap();
        assert!(pipeline.pipeline.is_active);

        let queued = trigger_execution(
            &pool,
            &timing,
            CreateExecution::new(pipeline.pipeline.id, TriggerType::Manual),
        )
        .await
        .unwrap();
        let id = queued.execution.id;
        let start = queued.execution.started_at;
        assert_eq!(queued.execution.status, ExecutionStatus::Queued);
        assert!(queued.execution.completed_at.is_none());

        // Not due yet
        advance_due_executions(&pool, &timing, &outcomes, start + TimeDelta::seconds(1), batch)
            .await
            .unwrap();
        let current = get_execution(&pool, id).await.unwrap().execution;
        assert_eq!(current.status, ExecutionStatus::Queued);

        // Past the queue delay
        let started = start + timing.queue_delay + TimeDelta::seconds(1);
        advance_due_executions(&pool, &timing, &outcomes, started, batch)
            .await
            .unwrap();
        let current = get_execution(&pool, id).await.unwrap().execution;
        assert_eq!(current.status, ExecutionStatus::Running);
        assert!(current.completed_at.is_none());
        assert!(current.logs.starts_with("Pipeline execution started..."));

        // A stale QUEUED -> RUNNING step no longer matches the row
        let stale =
            lifecycle::next_transition(ExecutionStatus::Queued, started, &timing, &outcomes)
                .unwrap();
        assert!(
            !execution_repository::apply_transition(&pool, id, &stale)
                .await
                .unwrap()
        );

        // Past the run duration
        let finished = started + timing.run_duration + TimeDelta::seconds(1);
        advance_due_executions(&pool, &timing, &outcomes, finished, batch)
            .await
            .unwrap();
        let done = get_execution(&pool, id).await.unwrap().execution;
        assert_eq!(done.status, ExecutionStatus::Failed);
        assert!(done.completed_at.is_some());
        assert!(done.next_transition_at.is_none());
        assert!(done.is_consistent());
        assert_eq!(
            done.error_msg.as_deref(),
            Some("Build process failed with exit code 1")
        );
        assert_eq!(done.output["failedStep"], "build");

        // Terminal executions are never picked up again
        let later = finished + TimeDelta::hours(1);
        advance_due_executions(&pool, &timing, &outcomes, later, batch)
            .await
            .unwrap();
        let after = get_execution(&pool, id).await.unwrap().execution;
        assert_eq!(after.completed_at, done.completed_at);
    }
}
