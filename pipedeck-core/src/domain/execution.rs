//! Pipeline execution domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One triggered run of a pipeline
///
/// `completed_at` is set exactly when `status` is terminal. While the
/// execution is still moving, `next_transition_at` holds the persisted fire
/// time of its next simulated transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineExecution {
    pub id: Uuid,
    pub pipeline_id: Uuid,
    pub status: ExecutionStatus,
    pub trigger_type: TriggerType,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub logs: String,
    pub output: serde_json::Value,
    pub error_msg: Option<String>,
    pub next_transition_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl PipelineExecution {
    /// Whether the record honours the completion invariant
    pub fn is_consistent(&self) -> bool {
        self.status.is_terminal() == self.completed_at.is_some()
    }
}

/// Execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Queued,
    Running,
    Success,
    Failed,
    Cancelled,
}

wire_enum!(ExecutionStatus, "execution status", {
    Queued => "QUEUED",
    Running => "RUNNING",
    Success => "SUCCESS",
    Failed => "FAILED",
    Cancelled => "CANCELLED",
});

impl ExecutionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Success | ExecutionStatus::Failed | ExecutionStatus::Cancelled
        )
    }
}

/// Why an execution was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerType {
    Manual,
    Webhook,
    Scheduled,
    Auto,
}

wire_enum!(TriggerType, "trigger type", {
    Manual => "MANUAL",
    Webhook => "WEBHOOK",
    Scheduled => "SCHEDULED",
    Auto => "AUTO",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!ExecutionStatus::Queued.is_terminal());
        assert!(!ExecutionStatus::Running.is_terminal());
        assert!(ExecutionStatus::Success.is_terminal());
        assert!(ExecutionStatus::Failed.is_terminal());
        assert!(ExecutionStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_trigger_type_rejects_unknown() {
        let err = "CRON".parse::<TriggerType>().unwrap_err();
        assert_eq!(err.kind, "trigger type");
        assert_eq!(err.value, "CRON");
        assert_eq!("WEBHOOK".parse::<TriggerType>(), Ok(TriggerType::Webhook));
    }

    #[test]
    fn test_status_round_trips_through_wire_name() {
        for status in ExecutionStatus::ALL {
            assert_eq!(status.as_str().parse::<ExecutionStatus>(), Ok(*status));
        }
    }
}
