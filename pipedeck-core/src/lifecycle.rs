//! Simulated execution lifecycle
//!
//! Executions move QUEUED → RUNNING after the queue delay, then RUNNING →
//! SUCCESS or FAILED after the run duration. The outcome of the second step
//! is drawn from an [`OutcomeSource`].
//!
//! Nothing here touches storage. [`next_transition`] computes what a due
//! execution should become; the server persists it with an update guarded on
//! [`Transition::from`].

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use serde_json::json;
use uuid::Uuid;

use crate::domain::execution::{ExecutionStatus, PipelineExecution, TriggerType};

pub const DEFAULT_QUEUED_LOGS: &str = "Pipeline execution queued...";
const RUNNING_LOGS: &str = "Pipeline execution started...\nProcessing steps...";
const SUCCESS_LOGS: &str = "Pipeline execution completed successfully!\nAll steps completed.";
const FAILURE_LOGS: &str = "Pipeline execution failed!\nError in step 3: Build failed.";
const FAILURE_MESSAGE: &str = "Build process failed with exit code 1";

/// Delays and odds of the simulated lifecycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifecycleTiming {
    /// Time spent QUEUED before the execution starts running
    pub queue_delay: TimeDelta,
    /// Time spent RUNNING before the execution reaches a terminal state
    pub run_duration: TimeDelta,
    /// Probability in [0, 1] that a run ends in SUCCESS
    pub success_rate: f64,
}

impl Default for LifecycleTiming {
    fn default() -> Self {
        Self {
            queue_delay: TimeDelta::seconds(2),
            run_duration: TimeDelta::seconds(15),
            success_rate: 0.8,
        }
    }
}

/// How a simulated run ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Decides the outcome of each simulated run
pub trait OutcomeSource: Send + Sync {
    fn draw(&self) -> Outcome;
}

/// Draws outcomes from the thread-local RNG
#[derive(Debug, Clone, Copy)]
pub struct RandomOutcome {
    success_rate: f64,
}

impl RandomOutcome {
    pub fn new(success_rate: f64) -> Self {
        Self {
            success_rate: success_rate.clamp(0.0, 1.0),
        }
    }
}

impl OutcomeSource for RandomOutcome {
    fn draw(&self) -> Outcome {
        if rand::rng().random_bool(self.success_rate) {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }
}

/// Always returns the same outcome
#[derive(Debug, Clone, Copy)]
pub struct FixedOutcome(pub Outcome);

impl OutcomeSource for FixedOutcome {
    fn draw(&self) -> Outcome {
        self.0
    }
}

/// The changes one lifecycle step applies to an execution
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Status the execution must still have for the step to apply
    pub from: ExecutionStatus,
    pub to: ExecutionStatus,
    pub logs: String,
    /// Replacement output; `None` keeps the current value
    pub output: Option<serde_json::Value>,
    pub error_msg: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub next_transition_at: Option<DateTime<Utc>>,
}

/// Build a freshly triggered execution
pub fn queued_execution(
    pipeline_id: Uuid,
    trigger_type: TriggerType,
    logs: Option<String>,
    output: Option<serde_json::Value>,
    now: DateTime<Utc>,
    timing: &LifecycleTiming,
) -> PipelineExecution {
    PipelineExecution {
        id: Uuid::new_v4(),
        pipeline_id,
        status: ExecutionStatus::Queued,
        trigger_type,
        started_at: now,
        completed_at: None,
        logs: logs
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| DEFAULT_QUEUED_LOGS.to_string()),
        output: output.unwrap_or_else(|| json!({})),
        error_msg: None,
        next_transition_at: Some(now + timing.queue_delay),
    }
}

/// Compute the step a due execution takes from `current`
///
/// Returns `None` for terminal statuses.
pub fn next_transition(
    current: ExecutionStatus,
    now: DateTime<Utc>,
    timing: &LifecycleTiming,
    outcomes: &dyn OutcomeSource,
) -> Option<Transition> {
    match current {
        ExecutionStatus::Queued => Some(Transition {
            from: ExecutionStatus::Queued,
            to: ExecutionStatus::Running,
            logs: RUNNING_LOGS.to_string(),
            output: None,
            error_msg: None,
            completed_at: None,
            next_transition_at: Some(now + timing.run_duration),
        }),
        ExecutionStatus::Running => Some(match outcomes.draw() {
            Outcome::Success => Transition {
                from: ExecutionStatus::Running,
                to: ExecutionStatus::Success,
                logs: SUCCESS_LOGS.to_string(),
                output: Some(json!({
                    "result": "success",
                    "steps": ["checkout", "build", "test", "deploy"],
                    "duration": "3m 45s",
                })),
                error_msg: None,
                completed_at: Some(now),
                next_transition_at: None,
            },
            Outcome::Failure => Transition {
                from: ExecutionStatus::Running,
                to: ExecutionStatus::Failed,
                logs: FAILURE_LOGS.to_string(),
                output: Some(json!({
                    "result": "failed",
                    "failedStep": "build",
                    "error": "Build process failed",
                })),
                error_msg: Some(FAILURE_MESSAGE.to_string()),
                completed_at: Some(now),
                next_transition_at: None,
            },
        }),
        ExecutionStatus::Success | ExecutionStatus::Failed | ExecutionStatus::Cancelled => None,
    }
}

impl PipelineExecution {
    /// Apply a transition in memory
    ///
    /// Returns false, leaving the execution untouched, when its status is not
    /// the one the transition starts from.
    pub fn apply(&mut self, transition: &Transition) -> bool {
        if self.status != transition.from {
            return false;
        }
        self.status = transition.to;
        self.logs = transition.logs.clone();
        if let Some(output) = &transition.output {
            self.output = output.clone();
        }
        self.error_msg = transition.error_msg.clone();
        self.completed_at = transition.completed_at;
        self.next_transition_at = transition.next_transition_at;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    fn run_to_end(outcome: Outcome) -> Vec<PipelineExecution> {
        let timing = LifecycleTiming::default();
        let source = FixedOutcome(outcome);
        let mut exec = queued_execution(
            Uuid::new_v4(),
            TriggerType::Manual,
            None,
            None,
            at(0),
            &timing,
        );
        let mut history = vec![exec.clone()];

        while let Some(due) = exec.next_transition_at {
            let step = next_transition(exec.status, due, &timing, &source).unwrap();
            assert!(exec.apply(&step));
            history.push(exec.clone());
        }
        history
    }

    #[test]
    fn test_queued_execution_defaults() {
        let timing = LifecycleTiming::default();
        let exec = queued_execution(
            Uuid::new_v4(),
            TriggerType::Webhook,
            None,
            None,
            at(0),
            &timing,
        );

        assert_eq!(exec.status, ExecutionStatus::Queued);
        assert!(exec.completed_at.is_none());
        assert_eq!(exec.logs, DEFAULT_QUEUED_LOGS);
        assert_eq!(exec.output, json!({}));
        assert_eq!(exec.next_transition_at, Some(at(2)));
        assert!(exec.is_consistent());
    }

    #[test]
    fn test_queued_execution_keeps_caller_logs() {
        let exec = queued_execution(
            Uuid::new_v4(),
            TriggerType::Manual,
            Some("custom".to_string()),
            Some(json!({"k": 1})),
            at(0),
            &LifecycleTiming::default(),
        );
        assert_eq!(exec.logs, "custom");
        assert_eq!(exec.output, json!({"k": 1}));
    }

    #[test]
    fn test_successful_lifecycle() {
        let history = run_to_end(Outcome::Success);
        let statuses: Vec<_> = history.iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![
                ExecutionStatus::Queued,
                ExecutionStatus::Running,
                ExecutionStatus::Success
            ]
        );

        let done = history.last().unwrap();
        assert_eq!(done.completed_at, Some(at(17)));
        assert!(done.error_msg.is_none());
        assert_eq!(done.output["result"], "success");
        assert!(done.next_transition_at.is_none());
        assert!(history.iter().all(|e| e.is_consistent()));
    }

    #[test]
    fn test_failed_lifecycle() {
        let history = run_to_end(Outcome::Failure);
        let done = history.last().unwrap();
        assert_eq!(done.status, ExecutionStatus::Failed);
        assert_eq!(done.error_msg.as_deref(), Some(FAILURE_MESSAGE));
        assert_eq!(done.output["failedStep"], "build");
        assert!(done.logs.contains("failed"));
        assert!(history.iter().all(|e| e.is_consistent()));
    }

    #[test]
    fn test_running_keeps_output() {
        let timing = LifecycleTiming::default();
        let mut exec = queued_execution(
            Uuid::new_v4(),
            TriggerType::Auto,
            None,
            Some(json!({"seed": true})),
            at(0),
            &timing,
        );
        let step = next_transition(exec.status, at(2), &timing, &FixedOutcome(Outcome::Success))
            .unwrap();
        exec.apply(&step);
        assert_eq!(exec.status, ExecutionStatus::Running);
        assert_eq!(exec.output, json!({"seed": true}));
        assert!(exec.completed_at.is_none());
    }

    #[test]
    fn test_terminal_has_no_transition() {
        let timing = LifecycleTiming::default();
        let source = FixedOutcome(Outcome::Success);
        for status in [
            ExecutionStatus::Success,
            ExecutionStatus::Failed,
            ExecutionStatus::Cancelled,
        ] {
            assert!(next_transition(status, at(0), &timing, &source).is_none());
        }
    }

    #[test]
    fn test_apply_rejects_stale_transition() {
        let timing = LifecycleTiming::default();
        let source = FixedOutcome(Outcome::Success);
        let mut exec = queued_execution(
            Uuid::new_v4(),
            TriggerType::Manual,
            None,
            None,
            at(0),
            &timing,
        );
        let start = next_transition(ExecutionStatus::Queued, at(2), &timing, &source).unwrap();
        assert!(exec.apply(&start));
        assert!(!exec.apply(&start));
        assert_eq!(exec.status, ExecutionStatus::Running);
    }

    #[test]
    fn test_random_outcome_extremes() {
        assert_eq!(RandomOutcome::new(1.0).draw(), Outcome::Success);
        assert_eq!(RandomOutcome::new(0.0).draw(), Outcome::Failure);
        assert_eq!(RandomOutcome::new(7.5).draw(), Outcome::Success);
    }
}
