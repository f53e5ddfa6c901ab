//! Source Repository Repository
//!
//! Handles all database operations related to registered source repositories.

use pipedeck_core::domain::repository::Repository;
use pipedeck_core::dto::repository::{NewRepository, RepositorySummary};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Register a new repository
///
/// Fails with a unique violation when (owner, name) is already taken.
pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    req: NewRepository,
) -> Result<Repository, sqlx::Error> {
    let now = chrono::Utc::now();

    let repository = Repository {
        id: Uuid::new_v4(),
        name: req.name,
        owner: req.owner,
        url: req.url,
        branch: req.branch,
        token: req.token,
        is_active: req.is_active,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO repositories (id, name, owner, url, branch, token, is_active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(repository.id)
    .bind(&repository.name)
    .bind(&repository.owner)
    .bind(&repository.url)
    .bind(&repository.branch)
    .bind(&repository.token)
    .bind(repository.is_active)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(repository)
}

/// Find a repository by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Repository>, sqlx::Error> {
    sqlx::query_as::<_, RepositoryRow>(
        r#"
        SELECT id, name, owner, url, branch, token, is_active, created_at, updated_at
        FROM repositories
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map(|row| row.map(Into::into))
}

/// List all repositories, newest first, with the number of attached pipelines
pub async fn list_summaries(pool: &PgPool) -> Result<Vec<RepositorySummary>, sqlx::Error> {
    let rows = sqlx::query_as::<_, RepositorySummaryRow>(
        r#"
        SELECT r.id, r.name, r.owner, r.url, r.branch, r.token, r.is_active,
               r.created_at, r.updated_at,
               (SELECT COUNT(*) FROM pipelines p WHERE p.repository_id = r.id) AS pipeline_count
        FROM repositories r
        ORDER BY r.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| RepositorySummary {
            repository: r.repository.into(),
            pipeline_count: r.pipeline_count,
        })
        .collect())
}

/// Count active repositories
pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM repositories WHERE is_active")
        .fetch_one(pool)
        .await
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct RepositoryRow {
    id: Uuid,
    name: String,
    owner: String,
    url: String,
    branch: String,
    token: Option<String>,
    is_active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<RepositoryRow> for Repository {
    fn from(row: RepositoryRow) -> Self {
        Repository {
            id: row.id,
            name: row.name,
            owner: row.owner,
            url: row.url,
            branch: row.branch,
            token: row.token,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RepositorySummaryRow {
    #[sqlx(flatten)]
    repository: RepositoryRow,
    pipeline_count: i64,
}
