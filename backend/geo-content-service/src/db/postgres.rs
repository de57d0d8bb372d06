use super::{bounded, ContentStore};
use crate::entity::ResourceKind;
use crate::error::{AppError, Result};
use crate::geo::ProximityQuery;
use crate::metrics;
use crate::models::{Category, Comment, ContentRecord, Coordinate, LikeToggle, User};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

const UNCONDITIONAL_CATEGORIES: &str = "('entertainment', 'disaster')";

#[derive(sqlx::FromRow)]
struct ContentRow {
    id: i64,
    user_id: Uuid,
    username: String,
    lat: f64,
    lng: f64,
    content: String,
    category: String,
    valid: bool,
    like_count: i64,
    tags: Vec<String>,
    parent_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<ContentRow> for ContentRecord {
    fn from(row: ContentRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            username: row.username,
            coordinate: Coordinate::new(row.lat, row.lng),
            content: row.content,
            category: Category::from(row.category),
            valid: row.valid,
            like_count: row.like_count,
            tags: row.tags,
            parent_id: row.parent_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    thread_id: i64,
    user_id: Uuid,
    username: String,
    lat: f64,
    lng: f64,
    content: String,
    valid: bool,
    like_count: i64,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            thread_id: row.thread_id,
            user_id: row.user_id,
            username: row.username,
            coordinate: Coordinate::new(row.lat, row.lng),
            content: row.content,
            valid: row.valid,
            like_count: row.like_count,
            tags: row.tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    login_type: String,
    valid: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        // credential material is never loaded by the content core
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            password: String::new(),
            login_type: row.login_type,
            valid: row.valid,
            created_at: row.created_at,
        }
    }
}

const COMMENT_COLUMNS: &str = "id, thread_id, user_id, username, lat, lng, content, valid, \
                               like_count, tags, created_at, updated_at, deleted_at";

/// Column list for a content table. Only `posts` has a `parent_id` column.
fn content_columns(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Post => {
            "id, user_id, username, lat, lng, content, category, valid, like_count, tags, \
             parent_id, created_at, updated_at, deleted_at"
        }
        ResourceKind::Thread | ResourceKind::Event => {
            "id, user_id, username, lat, lng, content, category, valid, like_count, tags, \
             NULL::BIGINT AS parent_id, created_at, updated_at, deleted_at"
        }
    }
}

/// PostgreSQL-backed content store
#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgContentStore {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn run<F, T>(&self, operation: &'static str, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let result = bounded(self.query_timeout, operation, future).await;
        if let Err(AppError::Storage(msg)) = &result {
            tracing::error!(operation, error = %msg, "storage operation failed");
            metrics::record_storage_error(operation);
        }
        result
    }
}

#[async_trait::async_trait]
impl ContentStore for PgContentStore {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>> {
        self.run("find_user", async {
            let row = sqlx::query_as::<_, UserRow>(
                r#"
                SELECT id, name, email, login_type, valid, created_at
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

            Ok(row.map(User::from))
        })
        .await
    }

    async fn insert_content(
        &self,
        kind: ResourceKind,
        record: ContentRecord,
    ) -> Result<ContentRecord> {
        self.run("insert_content", async {
            let (parent_column, parent_value) = match kind {
                ResourceKind::Post => (", parent_id", ", $11"),
                ResourceKind::Thread | ResourceKind::Event => ("", ""),
            };
            let sql = format!(
                "INSERT INTO {table} (user_id, username, lat, lng, content, category, valid, tags, \
                 created_at, updated_at{parent_column}) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10{parent_value}) \
                 RETURNING {columns}",
                table = kind.table_name(),
                columns = content_columns(kind),
            );

            let mut query = sqlx::query_as::<_, ContentRow>(&sql)
                .bind(record.user_id)
                .bind(&record.username)
                .bind(record.coordinate.lat)
                .bind(record.coordinate.lng)
                .bind(&record.content)
                .bind(record.category.as_str())
                .bind(record.valid)
                .bind(&record.tags)
                .bind(record.created_at)
                .bind(record.updated_at);
            if kind == ResourceKind::Post {
                query = query.bind(record.parent_id);
            }

            let row = query.fetch_one(&self.pool).await?;
            Ok(ContentRecord::from(row))
        })
        .await
    }

    async fn find_content(&self, kind: ResourceKind, id: i64) -> Result<Option<ContentRecord>> {
        self.run("find_content", async {
            let sql = format!(
                "SELECT {columns} FROM {table} WHERE id = $1 AND deleted_at IS NULL",
                columns = content_columns(kind),
                table = kind.table_name(),
            );
            let row = sqlx::query_as::<_, ContentRow>(&sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

            Ok(row.map(ContentRecord::from))
        })
        .await
    }

    async fn update_content(
        &self,
        kind: ResourceKind,
        record: &ContentRecord,
    ) -> Result<Option<ContentRecord>> {
        self.run("update_content", async {
            // like_count and ownership columns are never written here
            let sql = format!(
                "UPDATE {table} \
                 SET lat = $2, lng = $3, content = $4, category = $5, valid = $6, tags = $7, \
                     updated_at = $8 \
                 WHERE id = $1 AND deleted_at IS NULL \
                 RETURNING {columns}",
                table = kind.table_name(),
                columns = content_columns(kind),
            );
            let row = sqlx::query_as::<_, ContentRow>(&sql)
                .bind(record.id)
                .bind(record.coordinate.lat)
                .bind(record.coordinate.lng)
                .bind(&record.content)
                .bind(record.category.as_str())
                .bind(record.valid)
                .bind(&record.tags)
                .bind(record.updated_at)
                .fetch_optional(&self.pool)
                .await?;

            Ok(row.map(ContentRecord::from))
        })
        .await
    }

    async fn soft_delete_content(
        &self,
        kind: ResourceKind,
        id: i64,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        self.run("soft_delete_content", async {
            let sql = format!(
                "UPDATE {table} SET deleted_at = $2, updated_at = $2 \
                 WHERE id = $1 AND deleted_at IS NULL",
                table = kind.table_name(),
            );
            let result = sqlx::query(&sql)
                .bind(id)
                .bind(at)
                .execute(&self.pool)
                .await?;

            Ok(result.rows_affected() > 0)
        })
        .await
    }

    async fn find_nearby(
        &self,
        kind: ResourceKind,
        query: &ProximityQuery,
    ) -> Result<Vec<ContentRecord>> {
        self.run("find_nearby", async {
            let rows = match query.area() {
                Some(area) => {
                    let sql = format!(
                        "SELECT {columns} FROM {table} \
                         WHERE deleted_at IS NULL \
                           AND (category IN {unconditional} \
                                OR (category = 'community' \
                                    AND lat BETWEEN $1 AND $2 \
                                    AND lng BETWEEN $3 AND $4))",
                        columns = content_columns(kind),
                        table = kind.table_name(),
                        unconditional = UNCONDITIONAL_CATEGORIES,
                    );
                    sqlx::query_as::<_, ContentRow>(&sql)
                        .bind(area.min_lat)
                        .bind(area.max_lat)
                        .bind(area.min_lng)
                        .bind(area.max_lng)
                        .fetch_all(&self.pool)
                        .await?
                }
                None => {
                    let sql = format!(
                        "SELECT {columns} FROM {table} \
                         WHERE deleted_at IS NULL AND category IN {unconditional}",
                        columns = content_columns(kind),
                        table = kind.table_name(),
                        unconditional = UNCONDITIONAL_CATEGORIES,
                    );
                    sqlx::query_as::<_, ContentRow>(&sql)
                        .fetch_all(&self.pool)
                        .await?
                }
            };

            Ok(rows.into_iter().map(ContentRecord::from).collect())
        })
        .await
    }

    async fn find_updated_since(
        &self,
        kind: ResourceKind,
        since: DateTime<Utc>,
    ) -> Result<Vec<ContentRecord>> {
        self.run("find_updated_since", async {
            let sql = format!(
                "SELECT {columns} FROM {table} WHERE updated_at > $1",
                columns = content_columns(kind),
                table = kind.table_name(),
            );
            let rows = sqlx::query_as::<_, ContentRow>(&sql)
                .bind(since)
                .fetch_all(&self.pool)
                .await?;

            Ok(rows.into_iter().map(ContentRecord::from).collect())
        })
        .await
    }

    async fn find_replies(&self, thread_id: i64) -> Result<Vec<ContentRecord>> {
        self.run("find_replies", async {
            let sql = format!(
                "SELECT {columns} FROM posts \
                 WHERE parent_id = $1 AND deleted_at IS NULL \
                 ORDER BY created_at ASC, id ASC",
                columns = content_columns(ResourceKind::Post),
            );
            let rows = sqlx::query_as::<_, ContentRow>(&sql)
                .bind(thread_id)
                .fetch_all(&self.pool)
                .await?;

            Ok(rows.into_iter().map(ContentRecord::from).collect())
        })
        .await
    }

    async fn like_status(
        &self,
        kind: ResourceKind,
        user_id: Uuid,
        resource_id: i64,
    ) -> Result<Option<LikeToggle>> {
        self.run("like_status", async {
            let sql = format!(
                "SELECT r.like_count, \
                        EXISTS(SELECT 1 FROM {likes} l WHERE l.user_id = $2 AND l.{column} = r.id) \
                 FROM {table} r \
                 WHERE r.id = $1 AND r.deleted_at IS NULL",
                likes = kind.like_table(),
                column = kind.like_column(),
                table = kind.table_name(),
            );
            let row: Option<(i64, bool)> = sqlx::query_as(&sql)
                .bind(resource_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

            Ok(row.map(|(like_count, liked)| LikeToggle { liked, like_count }))
        })
        .await
    }

    async fn toggle_like(
        &self,
        kind: ResourceKind,
        user_id: Uuid,
        resource_id: i64,
    ) -> Result<Option<LikeToggle>> {
        self.run("toggle_like", async {
            // Dropping `tx` on any early return rolls back both statements.
            let mut tx = self.pool.begin().await?;

            // Row lock serialises concurrent toggles on the same resource.
            let lock_sql = format!(
                "SELECT like_count FROM {table} WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
                table = kind.table_name(),
            );
            let locked: Option<i64> = sqlx::query_scalar(&lock_sql)
                .bind(resource_id)
                .fetch_optional(&mut *tx)
                .await?;
            if locked.is_none() {
                tx.rollback().await?;
                return Ok(None);
            }

            let exists_sql = format!(
                "SELECT EXISTS(SELECT 1 FROM {likes} WHERE user_id = $1 AND {column} = $2)",
                likes = kind.like_table(),
                column = kind.like_column(),
            );
            let already_liked: bool = sqlx::query_scalar(&exists_sql)
                .bind(user_id)
                .bind(resource_id)
                .fetch_one(&mut *tx)
                .await?;

            let counter_sql = if already_liked {
                let delete_sql = format!(
                    "DELETE FROM {likes} WHERE user_id = $1 AND {column} = $2",
                    likes = kind.like_table(),
                    column = kind.like_column(),
                );
                sqlx::query(&delete_sql)
                    .bind(user_id)
                    .bind(resource_id)
                    .execute(&mut *tx)
                    .await?;

                format!(
                    "UPDATE {table} SET like_count = GREATEST(like_count - 1, 0), updated_at = NOW() \
                     WHERE id = $1 RETURNING like_count",
                    table = kind.table_name(),
                )
            } else {
                // the composite primary key rejects a racing duplicate (23505 -> Conflict)
                let insert_sql = format!(
                    "INSERT INTO {likes} (user_id, {column}, created_at) VALUES ($1, $2, NOW())",
                    likes = kind.like_table(),
                    column = kind.like_column(),
                );
                sqlx::query(&insert_sql)
                    .bind(user_id)
                    .bind(resource_id)
                    .execute(&mut *tx)
                    .await?;

                format!(
                    "UPDATE {table} SET like_count = like_count + 1, updated_at = NOW() \
                     WHERE id = $1 RETURNING like_count",
                    table = kind.table_name(),
                )
            };

            let like_count: i64 = sqlx::query_scalar(&counter_sql)
                .bind(resource_id)
                .fetch_one(&mut *tx)
                .await?;

            tx.commit().await?;

            Ok(Some(LikeToggle {
                liked: !already_liked,
                like_count,
            }))
        })
        .await
    }

    async fn insert_comment(&self, comment: Comment) -> Result<Comment> {
        self.run("insert_comment", async {
            let sql = format!(
                "INSERT INTO comments (thread_id, user_id, username, lat, lng, content, valid, tags, \
                 created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
                 RETURNING {COMMENT_COLUMNS}"
            );
            let row = sqlx::query_as::<_, CommentRow>(&sql)
                .bind(comment.thread_id)
                .bind(comment.user_id)
                .bind(&comment.username)
                .bind(comment.coordinate.lat)
                .bind(comment.coordinate.lng)
                .bind(&comment.content)
                .bind(comment.valid)
                .bind(&comment.tags)
                .bind(comment.created_at)
                .bind(comment.updated_at)
                .fetch_one(&self.pool)
                .await?;

            Ok(Comment::from(row))
        })
        .await
    }

    async fn find_comments(&self, thread_id: i64) -> Result<Vec<Comment>> {
        self.run("find_comments", async {
            let sql = format!(
                "SELECT {COMMENT_COLUMNS} FROM comments \
                 WHERE thread_id = $1 AND deleted_at IS NULL \
                 ORDER BY created_at ASC, id ASC"
            );
            let rows = sqlx::query_as::<_, CommentRow>(&sql)
                .bind(thread_id)
                .fetch_all(&self.pool)
                .await?;

            Ok(rows.into_iter().map(Comment::from).collect())
        })
        .await
    }

    async fn soft_delete_comment(&self, comment_id: i64, at: DateTime<Utc>) -> Result<bool> {
        self.run("soft_delete_comment", async {
            let result = sqlx::query(
                r#"
                UPDATE comments
                SET deleted_at = $2, updated_at = $2
                WHERE id = $1 AND deleted_at IS NULL
                "#,
            )
            .bind(comment_id)
            .bind(at)
            .execute(&self.pool)
            .await?;

            Ok(result.rows_affected() > 0)
        })
        .await
    }
}
