use sqlx::{PgConnection, PgPool, postgres::PgPoolOptions};
use std::time::Duration;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Create repositories table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS repositories (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            owner TEXT NOT NULL,
            url TEXT NOT NULL,
            branch TEXT NOT NULL DEFAULT 'main',
            token TEXT,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            CONSTRAINT repositories_owner_name_key UNIQUE (owner, name)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Repository fields are unbounded; widen tables created with VARCHAR(255)
    sqlx::query(
        r#"
        ALTER TABLE repositories
            ALTER COLUMN name TYPE TEXT,
            ALTER COLUMN owner TYPE TEXT,
            ALTER COLUMN branch TYPE TEXT
        "#,
    )
    .execute(pool)
    .await?;

    // Create pipelines table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pipelines (
            id UUID PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            type VARCHAR(20) NOT NULL,
            description TEXT,
            config JSONB NOT NULL DEFAULT '{}',
            ascii_visualization TEXT,
            markdown_export TEXT,
            repository_id UUID REFERENCES repositories(id) ON DELETE SET NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            is_template BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create executions table; completed_at is set exactly for terminal statuses
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pipeline_executions (
            id UUID PRIMARY KEY,
            pipeline_id UUID NOT NULL REFERENCES pipelines(id) ON DELETE CASCADE,
            status VARCHAR(20) NOT NULL,
            trigger_type VARCHAR(20) NOT NULL,
            started_at TIMESTAMPTZ NOT NULL,
            completed_at TIMESTAMPTZ,
            logs TEXT NOT NULL DEFAULT '',
            output JSONB NOT NULL DEFAULT '{}',
            error_msg TEXT,
            next_transition_at TIMESTAMPTZ,
            CONSTRAINT pipeline_executions_completion_check
                CHECK ((completed_at IS NULL) = (status IN ('QUEUED', 'RUNNING')))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_executions_pipeline_id ON pipeline_executions(pipeline_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_executions_started_at ON pipeline_executions(started_at DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_executions_status ON pipeline_executions(status)")
        .execute(pool)
        .await?;

    // Only moving executions carry a fire time
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_executions_next_transition
        ON pipeline_executions(next_transition_at)
        WHERE next_transition_at IS NOT NULL
        "#,
    )
    .execute(pool)
    .await?;

    // Create agents table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS agents (
            id UUID PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            type VARCHAR(100) NOT NULL,
            status VARCHAR(20) NOT NULL,
            endpoint TEXT,
            version VARCHAR(50),
            config JSONB NOT NULL DEFAULT '{}',
            deployed_at TIMESTAMPTZ,
            last_seen TIMESTAMPTZ,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS agent_monitoring (
            id UUID PRIMARY KEY,
            agent_id UUID NOT NULL REFERENCES agents(id) ON DELETE CASCADE,
            timestamp TIMESTAMPTZ NOT NULL,
            status VARCHAR(50) NOT NULL,
            cpu_usage DOUBLE PRECISION,
            memory_usage DOUBLE PRECISION,
            error_count INTEGER NOT NULL DEFAULT 0,
            metrics JSONB NOT NULL DEFAULT '{}'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_agent_monitoring_timestamp ON agent_monitoring(timestamp DESC)",
    )
    .execute(pool)
    .await?;

    // Create refactor templates table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS refactor_templates (
            id UUID PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            description TEXT,
            category VARCHAR(100) NOT NULL,
            template JSONB NOT NULL DEFAULT '{}',
            is_built_in BOOLEAN NOT NULL DEFAULT FALSE,
            usage_count INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create feedback table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pipeline_feedback (
            id UUID PRIMARY KEY,
            pipeline_id UUID NOT NULL REFERENCES pipelines(id) ON DELETE CASCADE,
            user_id VARCHAR(255) NOT NULL,
            rating SMALLINT NOT NULL CHECK (rating BETWEEN 1 AND 5),
            comment TEXT,
            category VARCHAR(30) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_feedback_pipeline_id ON pipeline_feedback(pipeline_id)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}

/// Remove every row, children first
pub async fn clear_all(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    for table in [
        "pipeline_feedback",
        "pipeline_executions",
        "agent_monitoring",
        "agents",
        "pipelines",
        "repositories",
        "refactor_templates",
    ] {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::LazyLock;

    use sqlx::PgPool;
    use tokio::sync::{Mutex, MutexGuard};

    static DATABASE: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

    /// Migrated pool on `DATABASE_URL` for tests that need PostgreSQL
    ///
    /// The guard keeps those tests from running against the database at the
    /// same time.
    pub async fn database() -> (PgPool, MutexGuard<'static, ()>) {
        let guard = DATABASE.lock().await;
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = super::create_pool(&url).await.expect("failed to connect");
        super::run_migrations(&pool).await.expect("failed to migrate");
        (pool, guard)
    }
}
