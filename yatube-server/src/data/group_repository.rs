use crate::domain::error::DomainError;
use crate::domain::group::{Group, NewGroup};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};

#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn create(&self, group: NewGroup) -> Result<Group, DomainError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Group>, DomainError>;
    async fn list(&self) -> Result<Vec<Group>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresGroupRepository {
    pool: PgPool,
}

impl PostgresGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn create(&self, group: NewGroup) -> Result<Group, DomainError> {
        let created = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO groups (title, slug, description)
            VALUES ($1, $2, $3)
            RETURNING id, title, slug, description
            "#,
        )
        .bind(&group.title)
        .bind(&group.slug)
        .bind(&group.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .and_then(|db| db.constraint())
                .map(|c| c.contains("groups_slug"))
                == Some(true)
            {
                DomainError::GroupAlreadyExists(group.slug.clone())
            } else {
                error!("failed to create group: {}", e);
                DomainError::Internal(format!("database error: {}", e))
            }
        })?;

        info!(group_id = created.id, slug = %created.slug, "group created");
        Ok(created)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, DomainError> {
        sqlx::query_as::<_, Group>(
            "SELECT id, title, slug, description FROM groups WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to find group by slug {}: {}", slug, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Group>, DomainError> {
        sqlx::query_as::<_, Group>("SELECT id, title, slug, description FROM groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to find group {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })
    }

    async fn list(&self) -> Result<Vec<Group>, DomainError> {
        sqlx::query_as::<_, Group>(
            "SELECT id, title, slug, description FROM groups ORDER BY title, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while listing groups: {}", e);
            DomainError::Internal(e.to_string())
        })
    }
}
