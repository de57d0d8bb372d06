use super::{CommentPayload, Coordinate};
use super::content::normalize_tags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment attached to exactly one thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub thread_id: i64,
    pub user_id: Uuid,
    pub username: String,
    pub coordinate: Coordinate,
    pub content: String,
    pub valid: bool,
    pub like_count: i64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Unsaved comment owned by `user_id`. Falls back to the thread's
    /// coordinate when the payload has none.
    pub fn draft(
        thread_id: i64,
        thread_coordinate: Coordinate,
        user_id: Uuid,
        username: String,
        payload: CommentPayload,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0,
            thread_id,
            user_id,
            username,
            coordinate: payload.coordinate.unwrap_or(thread_coordinate),
            content: payload.content,
            valid: true,
            like_count: 0,
            tags: normalize_tags(payload.tags),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}
