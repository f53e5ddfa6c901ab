//! Refactor template domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reusable refactoring plan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefactorTemplate {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub template: serde_json::Value,
    pub is_built_in: bool,
    pub usage_count: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
