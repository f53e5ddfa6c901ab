//! Feedback Repository

use pipedeck_core::domain::feedback::PipelineFeedback;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::decode_enum;

/// Insert a feedback entry as given
pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    feedback: &PipelineFeedback,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO pipeline_feedback (id, pipeline_id, user_id, rating, comment, category, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(feedback.id)
    .bind(feedback.pipeline_id)
    .bind(&feedback.user_id)
    .bind(feedback.rating)
    .bind(&feedback.comment)
    .bind(feedback.category.as_str())
    .bind(feedback.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// Find feedback by pipeline ID, newest first
pub async fn find_by_pipeline(
    pool: &PgPool,
    pipeline_id: Uuid,
) -> Result<Vec<PipelineFeedback>, sqlx::Error> {
    let rows = sqlx::query_as::<_, FeedbackRow>(
        r#"
        SELECT id, pipeline_id, user_id, rating, comment, category, created_at
        FROM pipeline_feedback
        WHERE pipeline_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(pipeline_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            Ok(PipelineFeedback {
                id: row.id,
                pipeline_id: row.pipeline_id,
                user_id: row.user_id,
                rating: row.rating,
                comment: row.comment,
                category: decode_enum(&row.category)?,
                created_at: row.created_at,
            })
        })
        .collect()
}

#[derive(sqlx::FromRow)]
struct FeedbackRow {
    id: Uuid,
    pipeline_id: Uuid,
    user_id: String,
    rating: i16,
    comment: Option<String>,
    category: String,
    created_at: chrono::DateTime<chrono::Utc>,
}
