/// Database access layer
///
/// This module provides:
/// - `ContentStore`: the storage seam every service is written against
/// - `PgContentStore`: PostgreSQL implementation (sqlx)
/// - `MemoryContentStore`: in-process implementation for tests and local runs
/// - `bounded`: per-call timeout guard for storage futures
mod memory;
mod postgres;

pub use memory::MemoryContentStore;
pub use postgres::PgContentStore;

use crate::entity::ResourceKind;
use crate::error::{AppError, Result};
use crate::geo::ProximityQuery;
use crate::models::{Comment, ContentRecord, LikeToggle, User};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

/// Storage operations used by the services.
///
/// Every method is a single statement against storage except
/// [`ContentStore::toggle_like`], which runs its read-modify-write in one
/// transaction. Reads other than [`ContentStore::find_updated_since`] skip
/// soft-deleted rows.
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>>;

    /// Persist a new record; the returned copy carries the assigned id.
    async fn insert_content(&self, kind: ResourceKind, record: ContentRecord)
        -> Result<ContentRecord>;

    async fn find_content(&self, kind: ResourceKind, id: i64) -> Result<Option<ContentRecord>>;

    /// Overwrite the mutable columns of a live record. Returns `None` if the
    /// row vanished or was soft-deleted in the meantime.
    async fn update_content(
        &self,
        kind: ResourceKind,
        record: &ContentRecord,
    ) -> Result<Option<ContentRecord>>;

    /// Mark a live record deleted. Returns `false` if nothing was live.
    async fn soft_delete_content(
        &self,
        kind: ResourceKind,
        id: i64,
        at: DateTime<Utc>,
    ) -> Result<bool>;

    async fn find_nearby(
        &self,
        kind: ResourceKind,
        query: &ProximityQuery,
    ) -> Result<Vec<ContentRecord>>;

    /// Rows with `updated_at > since`, tombstones included.
    async fn find_updated_since(
        &self,
        kind: ResourceKind,
        since: DateTime<Utc>,
    ) -> Result<Vec<ContentRecord>>;

    /// Live reply posts of a thread, oldest first.
    async fn find_replies(&self, thread_id: i64) -> Result<Vec<ContentRecord>>;

    async fn like_status(
        &self,
        kind: ResourceKind,
        user_id: Uuid,
        resource_id: i64,
    ) -> Result<Option<LikeToggle>>;

    /// Atomically flip the like of `user_id` on a resource and adjust its
    /// counter (never below zero). `None` if the resource is not live.
    async fn toggle_like(
        &self,
        kind: ResourceKind,
        user_id: Uuid,
        resource_id: i64,
    ) -> Result<Option<LikeToggle>>;

    async fn insert_comment(&self, comment: Comment) -> Result<Comment>;

    /// Live comments of a thread, oldest first.
    async fn find_comments(&self, thread_id: i64) -> Result<Vec<Comment>>;

    async fn soft_delete_comment(&self, comment_id: i64, at: DateTime<Utc>) -> Result<bool>;
}

/// Run a storage future under `limit`, surfacing expiry as a storage error.
pub async fn bounded<F, T>(limit: Duration, operation: &'static str, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(operation, timeout_ms = limit.as_millis() as u64, "storage call timed out");
            Err(AppError::Storage(format!(
                "{} timed out after {:?}",
                operation, limit
            )))
        }
    }
}
