//! Agent domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A deployed monitoring agent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub agent_type: String,
    pub status: AgentStatus,
    pub endpoint: Option<String>,
    pub version: Option<String>,
    pub config: serde_json::Value,
    pub deployed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub last_seen: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentStatus {
    Active,
    Inactive,
    Error,
    Maintenance,
}

wire_enum!(AgentStatus, "agent status", {
    Active => "ACTIVE",
    Inactive => "INACTIVE",
    Error => "ERROR",
    Maintenance => "MAINTENANCE",
});

/// One health sample reported by an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMonitoring {
    pub id: Uuid,
    pub agent_id: Uuid,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub status: String,
    pub cpu_usage: Option<f64>,
    pub memory_usage: Option<f64>,
    pub error_count: i32,
    pub metrics: serde_json::Value,
}
