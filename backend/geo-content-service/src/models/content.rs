use super::{Category, ContentPatch, ContentPayload, Coordinate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Storage shape shared by posts, threads and events.
///
/// `id`, `user_id`, `username`, `like_count`, `created_at` and `deleted_at`
/// are managed by the engine and the store; request payloads never write them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: i64,
    pub user_id: Uuid,
    pub username: String,
    pub coordinate: Coordinate,
    pub content: String,
    pub category: Category,
    pub valid: bool,
    pub like_count: i64,
    pub tags: Vec<String>,
    /// Thread id when this record is a reply post
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ContentRecord {
    /// Build an unsaved record from a validated payload. Owner and display
    /// name are left empty for the engine to stamp.
    pub fn draft(payload: ContentPayload, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            user_id: Uuid::nil(),
            username: String::new(),
            coordinate: payload.coordinate,
            content: payload.content,
            category: payload.category,
            valid: payload.valid,
            like_count: 0,
            tags: normalize_tags(payload.tags),
            parent_id: payload.parent_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Merge the fields present in `patch`.
    pub fn apply_patch(&mut self, patch: ContentPatch) {
        if let Some(coordinate) = patch.coordinate {
            self.coordinate = coordinate;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(valid) = patch.valid {
            self.valid = valid;
        }
        if let Some(tags) = patch.tags {
            self.tags = normalize_tags(tags);
        }
    }

    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Tags behave as a set: trimmed, empties dropped, first occurrence wins.
pub(crate) fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect()
}

/// Success acknowledgment returned by deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
    pub message: String,
}

impl Ack {
    pub fn deleted(resource: &str) -> Self {
        Self {
            status: "success".to_string(),
            message: format!("{} deleted", resource),
        }
    }
}

/// A thread and its reply posts, oldest reply first.
#[derive(Debug, Clone, Serialize)]
pub struct ThreadWithReplies<T, R> {
    pub thread: T,
    pub replies: Vec<R>,
    pub reply_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> ContentPayload {
        ContentPayload {
            coordinate: Coordinate::new(35.68, 139.76),
            content: "street festival tonight".to_string(),
            category: Category::Community,
            valid: true,
            tags: vec![
                "festival".to_string(),
                " festival ".to_string(),
                "".to_string(),
                "food".to_string(),
            ],
            parent_id: None,
        }
    }

    #[test]
    fn draft_dedups_tags_and_leaves_owner_unset() {
        let now = Utc::now();
        let record = ContentRecord::draft(payload(), now);

        assert_eq!(record.id, 0);
        assert!(record.user_id.is_nil());
        assert_eq!(record.like_count, 0);
        assert_eq!(record.tags, vec!["festival".to_string(), "food".to_string()]);
        assert_eq!(record.created_at, now);
        assert!(record.is_live());
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut record = ContentRecord::draft(payload(), Utc::now());
        record.like_count = 7;

        record.apply_patch(ContentPatch {
            content: Some("moved indoors".to_string()),
            category: Some(Category::Entertainment),
            ..ContentPatch::default()
        });

        assert_eq!(record.content, "moved indoors");
        assert_eq!(record.category, Category::Entertainment);
        assert_eq!(record.coordinate, Coordinate::new(35.68, 139.76));
        assert_eq!(record.like_count, 7);
        assert_eq!(record.tags.len(), 2);
    }
}
