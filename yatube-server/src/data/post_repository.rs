use crate::domain::error::DomainError;
use crate::domain::group::GroupRef;
use crate::domain::post::{NewPost, Post, PostChanges, PostFilter};
use crate::domain::user::Author;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn update(
        &self,
        id: i64,
        author_id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, DomainError>;
    async fn list(
        &self,
        filter: PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, DomainError>;
    async fn count(&self, filter: PostFilter) -> Result<i64, DomainError>;
}

const SELECT_POSTS: &str = r#"
    SELECT p.id, p.text, p.created_at,
           p.author_id, u.username AS author_username,
           p.group_id, g.title AS group_title, g.slug AS group_slug
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN groups g ON g.id = p.group_id
"#;

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    text: String,
    created_at: DateTime<Utc>,
    author_id: Uuid,
    author_username: String,
    group_id: Option<i64>,
    group_title: Option<String>,
    group_slug: Option<String>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        let group = match (row.group_id, row.group_title, row.group_slug) {
            (Some(id), Some(title), Some(slug)) => Some(GroupRef { id, title, slug }),
            _ => None,
        };
        Post {
            id: row.id,
            author: Author {
                id: row.author_id,
                username: row.author_username,
            },
            text: row.text,
            group,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO posts (author_id, text, group_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(post.author_id)
        .bind(&post.text)
        .bind(post.group_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create post: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(post_id = id, author_id = %post.author_id, "post created");
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::Internal(format!("post {} vanished after insert", id)))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let query = format!("{SELECT_POSTS} WHERE p.id = $1");
        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error find_by_id {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;
        Ok(row.map(Post::from))
    }

    async fn update(
        &self,
        id: i64,
        author_id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, DomainError> {
        let updated = sqlx::query(
            r#"
            UPDATE posts
            SET text = $1, group_id = $2
            WHERE id = $3 AND author_id = $4
            "#,
        )
        .bind(&changes.text)
        .bind(changes.group_id)
        .bind(id)
        .bind(author_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update post {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        info!(post_id = id, "post updated");
        self.find_by_id(id).await
    }

    async fn list(
        &self,
        filter: PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, DomainError> {
        let query = format!(
            r#"{SELECT_POSTS}
            WHERE ($1::BIGINT IS NULL OR p.group_id = $1)
              AND ($2::UUID IS NULL OR p.author_id = $2)
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $3 OFFSET $4"#
        );
        let rows = sqlx::query_as::<_, PostRow>(&query)
            .bind(filter.group_id())
            .bind(filter.author_id())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching posts: {}", e);
                DomainError::Internal(e.to_string())
            })?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn count(&self, filter: PostFilter) -> Result<i64, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM posts p
            WHERE ($1::BIGINT IS NULL OR p.group_id = $1)
              AND ($2::UUID IS NULL OR p.author_id = $2)
            "#,
        )
        .bind(filter.group_id())
        .bind(filter.author_id())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while counting posts: {}", e);
            DomainError::Internal(e.to_string())
        })
    }
}
