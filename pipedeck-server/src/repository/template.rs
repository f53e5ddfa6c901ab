//! Refactor Template Repository

use pipedeck_core::domain::template::RefactorTemplate;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Insert a template as given
pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    template: &RefactorTemplate,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO refactor_templates (
            id, name, description, category, template, is_built_in, usage_count, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(template.id)
    .bind(&template.name)
    .bind(&template.description)
    .bind(&template.category)
    .bind(&template.template)
    .bind(template.is_built_in)
    .bind(template.usage_count)
    .bind(template.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// List templates: built-ins first, then by popularity, then newest
pub async fn list_all(pool: &PgPool) -> Result<Vec<RefactorTemplate>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TemplateRow>(
        r#"
        SELECT id, name, description, category, template, is_built_in, usage_count, created_at
        FROM refactor_templates
        ORDER BY is_built_in DESC, usage_count DESC, created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

#[derive(sqlx::FromRow)]
struct TemplateRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    category: String,
    template: serde_json::Value,
    is_built_in: bool,
    usage_count: i32,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<TemplateRow> for RefactorTemplate {
    fn from(row: TemplateRow) -> Self {
        RefactorTemplate {
            id: row.id,
            name: row.name,
            description: row.description,
            category: row.category,
            template: row.template,
            is_built_in: row.is_built_in,
            usage_count: row.usage_count,
            created_at: row.created_at,
        }
    }
}
