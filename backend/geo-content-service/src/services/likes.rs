/// Like service - toggles likes on posts, threads and events
use crate::db::ContentStore;
use crate::entity::ResourceKind;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::LikeToggle;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct LikeService {
    store: Arc<dyn ContentStore>,
}

impl LikeService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Like the resource if `user_id` has not liked it yet, otherwise unlike it.
    ///
    /// The like row and the counter change together or not at all. A lost
    /// race on the same `(user, resource)` pair surfaces as `Conflict`.
    pub async fn toggle(
        &self,
        user_id: Uuid,
        kind: ResourceKind,
        resource_id: i64,
    ) -> Result<LikeToggle> {
        let resource = kind.resource_name();

        if self.store.find_content(kind, resource_id).await?.is_none() {
            return Err(AppError::not_found(resource, resource_id));
        }

        let outcome = match self.store.toggle_like(kind, user_id, resource_id).await {
            Ok(Some(outcome)) => outcome,
            // deleted between the lookup and the transaction
            Ok(None) => return Err(AppError::not_found(resource, resource_id)),
            Err(AppError::Conflict(msg)) => {
                tracing::warn!(resource, resource_id, user_id = %user_id, "like toggle conflict: {}", msg);
                return Err(AppError::Conflict(msg));
            }
            Err(e) => return Err(e),
        };

        metrics::record_like_toggle(resource, outcome.liked);
        tracing::info!(
            resource,
            resource_id,
            user_id = %user_id,
            liked = outcome.liked,
            like_count = outcome.like_count,
            "like toggled"
        );
        Ok(outcome)
    }

    /// Whether `user_id` currently likes the resource, with its like count.
    pub async fn status(
        &self,
        user_id: Uuid,
        kind: ResourceKind,
        resource_id: i64,
    ) -> Result<LikeToggle> {
        self.store
            .like_status(kind, user_id, resource_id)
            .await?
            .ok_or_else(|| AppError::not_found(kind.resource_name(), resource_id))
    }
}
