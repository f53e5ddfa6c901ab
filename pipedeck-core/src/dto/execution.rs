//! Pipeline execution DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::execution::{PipelineExecution, TriggerType};
use crate::domain::pipeline::PipelineType;

/// Request to trigger a pipeline execution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExecution {
    /// Kept as text; an ID that is not a UUID names no pipeline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
}

impl CreateExecution {
    pub fn new(pipeline_id: Uuid, trigger_type: TriggerType) -> Self {
        Self {
            pipeline_id: Some(pipeline_id.to_string()),
            trigger_type: Some(trigger_type.as_str().to_string()),
            ..Default::default()
        }
    }
}

/// Pipeline fields shown next to an execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRef {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub pipeline_type: PipelineType,
}

/// An execution with its pipeline projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionDetails {
    #[serde(flatten)]
    pub execution: PipelineExecution,
    pub pipeline: PipelineRef,
}
