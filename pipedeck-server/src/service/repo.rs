//! Repository Service
//!
//! Business logic for registering source repositories.

use pipedeck_core::domain::repository::Repository;
use pipedeck_core::dto::repository::{CreateRepository, NewRepository, RepositorySummary};
use sqlx::PgPool;

use super::pipeline::non_blank;
use crate::repository::repo_repository;

const DEFAULT_BRANCH: &str = "main";

/// Service error type
#[derive(Debug)]
pub enum RepoError {
    ValidationError(String),
    Conflict(String),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        let is_duplicate = err
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
        if is_duplicate {
            RepoError::Conflict("Repository with this owner and name already exists".to_string())
        } else {
            RepoError::DatabaseError(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, RepoError>;

/// Register a repository
pub async fn create_repository(pool: &PgPool, req: CreateRepository) -> Result<Repository> {
    let new = validate_repository_request(req)?;

    let repository = repo_repository::create(pool, new).await?;

    tracing::info!(
        "Repository registered: {} ({})",
        repository.full_name(),
        repository.id
    );

    Ok(repository)
}

/// List all repositories
pub async fn list_repositories(pool: &PgPool) -> Result<Vec<RepositorySummary>> {
    let repositories = repo_repository::list_summaries(pool).await?;
    Ok(repositories)
}

fn validate_repository_request(req: CreateRepository) -> Result<NewRepository> {
    let (Some(name), Some(owner), Some(url)) = (
        non_blank(req.name),
        non_blank(req.owner),
        non_blank(req.url),
    ) else {
        return Err(RepoError::ValidationError(
            "Name, owner, and URL are required".to_string(),
        ));
    };

    Ok(NewRepository {
        name,
        owner,
        url,
        branch: non_blank(req.branch).unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
        token: non_blank(req.token),
        is_active: req.is_active.unwrap_or(true),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};

    fn request() -> CreateRepository {
        CreateRepository {
            name: Some("pipeline-demo-app".to_string()),
            owner: Some("demo-org".to_string()),
            url: Some("https://github.com/demo-org/pipeline-demo-app".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_defaults() {
        let new = validate_repository_request(request()).unwrap();
        assert_eq!(new.branch, "main");
        assert!(new.is_active);
        assert!(new.token.is_none());
    }

    #[test]
    fn test_validate_keeps_explicit_values() {
        let mut req = request();
        req.branch = Some("develop".to_string());
        req.is_active = Some(false);
        req.token = Some("ghp_x".to_string());
        let new = validate_repository_request(req).unwrap();
        assert_eq!(new.branch, "develop");
        assert!(!new.is_active);
        assert_eq!(new.token.as_deref(), Some("ghp_x"));
    }

    #[test]
    fn test_validate_requires_url() {
        let mut req = request();
        req.url = None;
        assert!(matches!(
            validate_repository_request(req),
            Err(RepoError::ValidationError(msg)) if msg == "Name, owner, and URL are required"
        ));
    }

    #[test]
    fn test_long_fields_are_accepted() {
        let mut req = request();
        req.owner = Some("o".repeat(300));
        let new = validate_repository_request(req).unwrap();
        assert_eq!(new.owner.len(), 300);
    }

    /// A driver error for a violated unique or foreign key constraint
    #[derive(Debug)]
    struct ConstraintError {
        unique: bool,
    }

    impl std::fmt::Display for ConstraintError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.message())
        }
    }

    impl std::error::Error for ConstraintError {}

    impl DatabaseError for ConstraintError {
        fn message(&self) -> &str {
            if self.unique {
                "duplicate key value violates unique constraint \"repositories_owner_name_key\""
            } else {
                "insert violates foreign key constraint"
            }
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::ForeignKeyViolation
            }
        }
    }

    #[test]
    fn test_unique_violation_is_conflict() {
        let err = sqlx::Error::Database(Box::new(ConstraintError { unique: true }));
        assert!(matches!(
            RepoError::from(err),
            RepoError::Conflict(msg) if msg == "Repository with this owner and name already exists"
        ));

        let err = sqlx::Error::Database(Box::new(ConstraintError { unique: false }));
        assert!(matches!(RepoError::from(err), RepoError::DatabaseError(_)));
    }

    #[tokio::test]
    #[ignore = "needs PostgreSQL at DATABASE_URL"]
    async fn test_create_repository_against_database() {
        let (pool, _guard) = crate::db::testing::database().await;

        let mut req = request();
        req.name = Some(format!("app-{}", uuid::Uuid::new_v4()));
        req.owner = Some("o".repeat(300));

        let repo = create_repository(&pool, req.clone()).await.unwrap();
        assert_eq!(repo.owner.len(), 300);
        assert_eq!(repo.branch, "main");

        assert!(matches!(
            create_repository(&pool, req).await,
            Err(RepoError::Conflict(_))
        ));
    }

    #[test]
    fn test_non_unique_errors_stay_database_errors() {
        assert!(matches!(
            RepoError::from(sqlx::Error::RowNotFound),
            RepoError::DatabaseError(_)
        ));
    }
}
