//! Pipeline Repository
//!
//! Handles all database operations related to pipelines.

use pipedeck_core::domain::pipeline::Pipeline;
use pipedeck_core::dto::pipeline::{NewPipeline, PipelineDetails, PipelineSummary, RepositoryRef};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::decode_enum;

/// Create a new pipeline in the database
pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    req: NewPipeline,
) -> Result<Pipeline, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = chrono::Utc::now();

    let pipeline = Pipeline {
        id,
        name: req.name,
        pipeline_type: req.pipeline_type,
        description: req.description,
        config: req.config,
        ascii_visualization: req.ascii_visualization,
        markdown_export: req.markdown_export,
        repository_id: req.repository_id,
        is_active: true,
        is_template: req.is_template,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO pipelines (
            id, name, type, description, config, ascii_visualization,
            markdown_export, repository_id, is_active, is_template, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(pipeline.id)
    .bind(&pipeline.name)
    .bind(pipeline.pipeline_type.as_str())
    .bind(&pipeline.description)
    .bind(&pipeline.config)
    .bind(&pipeline.ascii_visualization)
    .bind(&pipeline.markdown_export)
    .bind(pipeline.repository_id)
    .bind(pipeline.is_active)
    .bind(pipeline.is_template)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(pipeline)
}

/// Find a pipeline by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Pipeline>, sqlx::Error> {
    let row = sqlx::query_as::<_, PipelineRow>(
        r#"
        SELECT id, name, type AS pipeline_type, description, config, ascii_visualization,
               markdown_export, repository_id, is_active, is_template, created_at, updated_at
        FROM pipelines
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Pipeline::try_from).transpose()
}

/// Find a pipeline by ID together with its repository projection
pub async fn find_details(pool: &PgPool, id: Uuid) -> Result<Option<PipelineDetails>, sqlx::Error> {
    let row = sqlx::query_as::<_, PipelineSummaryRow>(
        r#"
        SELECT p.id, p.name, p.type AS pipeline_type, p.description, p.config,
               p.ascii_visualization, p.markdown_export, p.repository_id, p.is_active,
               p.is_template, p.created_at, p.updated_at,
               r.name AS repository_name, r.owner AS repository_owner,
               0::BIGINT AS execution_count
        FROM pipelines p
        LEFT JOIN repositories r ON r.id = p.repository_id
        WHERE p.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(|r| PipelineSummary::try_from(r).map(PipelineDetails::from))
        .transpose()
}

/// List all pipelines, newest first, with repository and execution count
pub async fn list_summaries(pool: &PgPool) -> Result<Vec<PipelineSummary>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PipelineSummaryRow>(
        r#"
        SELECT p.id, p.name, p.type AS pipeline_type, p.description, p.config,
               p.ascii_visualization, p.markdown_export, p.repository_id, p.is_active,
               p.is_template, p.created_at, p.updated_at,
               r.name AS repository_name, r.owner AS repository_owner,
               (SELECT COUNT(*) FROM pipeline_executions e WHERE e.pipeline_id = p.id)
                   AS execution_count
        FROM pipelines p
        LEFT JOIN repositories r ON r.id = p.repository_id
        ORDER BY p.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(PipelineSummary::try_from).collect()
}

/// Count active pipelines
pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM pipelines WHERE is_active")
        .fetch_one(pool)
        .await
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct PipelineRow {
    id: Uuid,
    name: String,
    pipeline_type: String,
    description: Option<String>,
    config: serde_json::Value,
    ascii_visualization: Option<String>,
    markdown_export: Option<String>,
    repository_id: Option<Uuid>,
    is_active: bool,
    is_template: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<PipelineRow> for Pipeline {
    type Error = sqlx::Error;

    fn try_from(row: PipelineRow) -> Result<Self, Self::Error> {
        Ok(Pipeline {
            id: row.id,
            name: row.name,
            pipeline_type: decode_enum(&row.pipeline_type)?,
            description: row.description,
            config: row.config,
            ascii_visualization: row.ascii_visualization,
            markdown_export: row.markdown_export,
            repository_id: row.repository_id,
            is_active: row.is_active,
            is_template: row.is_template,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PipelineSummaryRow {
    #[sqlx(flatten)]
    pipeline: PipelineRow,
    repository_name: Option<String>,
    repository_owner: Option<String>,
    execution_count: i64,
}

impl TryFrom<PipelineSummaryRow> for PipelineSummary {
    type Error = sqlx::Error;

    fn try_from(row: PipelineSummaryRow) -> Result<Self, Self::Error> {
        let repository = match (row.repository_name, row.repository_owner) {
            (Some(name), Some(owner)) => Some(RepositoryRef { name, owner }),
            _ => None,
        };

        Ok(PipelineSummary {
            pipeline: Pipeline::try_from(row.pipeline)?,
            repository,
            execution_count: row.execution_count,
        })
    }
}
