//! Agent DTOs

use serde::{Deserialize, Serialize};

use crate::domain::agent::AgentMonitoring;

/// Agent fields shown next to a monitoring sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRef {
    pub name: String,
    #[serde(rename = "type")]
    pub agent_type: String,
}

/// Monitoring sample with its agent projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringSample {
    #[serde(flatten)]
    pub sample: AgentMonitoring,
    pub agent: AgentRef,
}
