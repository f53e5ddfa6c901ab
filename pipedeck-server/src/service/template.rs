//! Refactor Template Service

use pipedeck_core::domain::template::RefactorTemplate;
use sqlx::PgPool;

use crate::repository::template_repository;

/// List all refactor templates
pub async fn list_templates(pool: &PgPool) -> Result<Vec<RefactorTemplate>, sqlx::Error> {
    template_repository::list_all(pool).await
}
