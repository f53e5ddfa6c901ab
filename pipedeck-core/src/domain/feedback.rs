//! Pipeline feedback domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's rating of a pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineFeedback {
    pub id: Uuid,
    pub pipeline_id: Uuid,
    pub user_id: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub category: FeedbackCategory,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackCategory {
    BugReport,
    FeatureRequest,
    Performance,
    Usability,
    General,
}

wire_enum!(FeedbackCategory, "feedback category", {
    BugReport => "BUG_REPORT",
    FeatureRequest => "FEATURE_REQUEST",
    Performance => "PERFORMANCE",
    Usability => "USABILITY",
    General => "GENERAL",
});
