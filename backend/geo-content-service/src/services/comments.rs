/// Comment service - comments attached to threads
use super::display_name;
use crate::db::ContentStore;
use crate::entity::ResourceKind;
use crate::error::{AppError, Result};
use crate::models::{Ack, Comment, CommentPayload};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn ContentStore>,
}

impl CommentService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Create a comment on a live thread
    pub async fn create(&self, thread_id: i64, payload: &[u8], user_id: Uuid) -> Result<Comment> {
        let thread = self
            .store
            .find_content(ResourceKind::Thread, thread_id)
            .await?
            .ok_or_else(|| AppError::not_found("thread", thread_id))?;
        let payload = CommentPayload::parse(payload)?;
        let name = display_name(self.store.as_ref(), user_id).await?;

        let draft = Comment::draft(
            thread_id,
            thread.coordinate,
            user_id,
            name,
            payload,
            Utc::now(),
        );
        let comment = self.store.insert_comment(draft).await?;

        tracing::info!(thread_id, id = comment.id, user_id = %user_id, "comment created");
        Ok(comment)
    }

    pub async fn list_by_thread(&self, thread_id: i64) -> Result<Vec<Comment>> {
        if self
            .store
            .find_content(ResourceKind::Thread, thread_id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found("thread", thread_id));
        }

        self.store.find_comments(thread_id).await
    }

    pub async fn delete(&self, comment_id: i64) -> Result<Ack> {
        if !self
            .store
            .soft_delete_comment(comment_id, Utc::now())
            .await?
        {
            return Err(AppError::not_found("comment", comment_id));
        }

        tracing::info!(id = comment_id, "comment deleted");
        Ok(Ack::deleted("comment"))
    }
}
