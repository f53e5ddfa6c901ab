//! Pipeline domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored pipeline definition
///
/// `config` is free-form; its shape depends on `pipeline_type` and is only
/// interpreted when the pipeline is exported.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub pipeline_type: PipelineType,
    pub description: Option<String>,
    pub config: serde_json::Value,
    pub ascii_visualization: Option<String>,
    pub markdown_export: Option<String>,
    pub repository_id: Option<Uuid>,
    pub is_active: bool,
    pub is_template: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Kind of workflow a pipeline describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineType {
    CiCd,
    Dmiac,
    Refactor,
    Combined,
}

wire_enum!(PipelineType, "pipeline type", {
    CiCd => "CI_CD",
    Dmiac => "DMIAC",
    Refactor => "REFACTOR",
    Combined => "COMBINED",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_type_parse() {
        assert_eq!("CI_CD".parse::<PipelineType>(), Ok(PipelineType::CiCd));
        assert_eq!("DMIAC".parse::<PipelineType>(), Ok(PipelineType::Dmiac));
        assert!("ci_cd".parse::<PipelineType>().is_err());
        assert!("DEPLOY".parse::<PipelineType>().is_err());
    }

    #[test]
    fn test_pipeline_type_serde_matches_wire_name() {
        for ty in PipelineType::ALL {
            let json = serde_json::to_value(ty).unwrap();
            assert_eq!(json, serde_json::Value::String(ty.as_str().to_string()));
        }
    }
}
