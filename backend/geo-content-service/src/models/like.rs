use crate::entity::ResourceKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user's like on one post, thread or event.
///
/// At most one record exists per `(kind, user_id, resource_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeRecord {
    pub kind: ResourceKind,
    pub user_id: Uuid,
    pub resource_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a like toggle or status lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeToggle {
    pub liked: bool,
    pub like_count: i64,
}
