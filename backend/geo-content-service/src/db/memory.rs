use super::ContentStore;
use crate::entity::ResourceKind;
use crate::error::{AppError, Result};
use crate::geo::ProximityQuery;
use crate::models::{Comment, ContentRecord, LikeRecord, LikeToggle, User};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

type LikeKey = (ResourceKind, Uuid, i64);

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    content: HashMap<ResourceKind, BTreeMap<i64, ContentRecord>>,
    likes: HashMap<LikeKey, LikeRecord>,
    comments: BTreeMap<i64, Comment>,
    next_content_id: HashMap<ResourceKind, i64>,
    next_comment_id: i64,
}

impl State {
    fn table(&self, kind: ResourceKind) -> Option<&BTreeMap<i64, ContentRecord>> {
        self.content.get(&kind)
    }

    fn live(&self, kind: ResourceKind, id: i64) -> Option<&ContentRecord> {
        self.table(kind)
            .and_then(|rows| rows.get(&id))
            .filter(|record| record.is_live())
    }
}

/// In-process [`ContentStore`].
///
/// All state sits behind one lock, so every call is atomic. A like toggle
/// writes the like row first and puts it back if the counter update fails.
#[derive(Default)]
pub struct MemoryContentStore {
    state: RwLock<State>,
    fail_next_counter_write: AtomicBool,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let state = State {
            users: users.into_iter().map(|user| (user.id, user)).collect(),
            ..State::default()
        };
        Self {
            state: RwLock::new(state),
            fail_next_counter_write: AtomicBool::new(false),
        }
    }

    pub async fn insert_user(&self, user: User) {
        self.state.write().await.users.insert(user.id, user);
    }

    /// Make the next like toggle fail at its counter update, after the like
    /// row has been staged.
    pub fn fail_next_counter_write(&self) {
        self.fail_next_counter_write.store(true, Ordering::SeqCst);
    }

    /// Number of like rows stored for a resource.
    pub async fn like_rows(&self, kind: ResourceKind, resource_id: i64) -> usize {
        self.state
            .read()
            .await
            .likes
            .keys()
            .filter(|(k, _, id)| *k == kind && *id == resource_id)
            .count()
    }
}

#[async_trait::async_trait]
impl ContentStore for MemoryContentStore {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>> {
        Ok(self.state.read().await.users.get(&user_id).cloned())
    }

    async fn insert_content(
        &self,
        kind: ResourceKind,
        mut record: ContentRecord,
    ) -> Result<ContentRecord> {
        let mut state = self.state.write().await;

        let next = state.next_content_id.entry(kind).or_insert(0);
        *next += 1;
        record.id = *next;
        record.like_count = 0;

        state
            .content
            .entry(kind)
            .or_default()
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_content(&self, kind: ResourceKind, id: i64) -> Result<Option<ContentRecord>> {
        Ok(self.state.read().await.live(kind, id).cloned())
    }

    async fn update_content(
        &self,
        kind: ResourceKind,
        record: &ContentRecord,
    ) -> Result<Option<ContentRecord>> {
        let mut state = self.state.write().await;
        let stored = match state
            .content
            .get_mut(&kind)
            .and_then(|rows| rows.get_mut(&record.id))
            .filter(|stored| stored.is_live())
        {
            Some(stored) => stored,
            None => return Ok(None),
        };

        stored.coordinate = record.coordinate;
        stored.content = record.content.clone();
        stored.category = record.category;
        stored.valid = record.valid;
        stored.tags = record.tags.clone();
        stored.updated_at = record.updated_at;
        Ok(Some(stored.clone()))
    }

    async fn soft_delete_content(
        &self,
        kind: ResourceKind,
        id: i64,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut state = self.state.write().await;
        match state
            .content
            .get_mut(&kind)
            .and_then(|rows| rows.get_mut(&id))
            .filter(|stored| stored.is_live())
        {
            Some(stored) => {
                stored.deleted_at = Some(at);
                stored.updated_at = at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_nearby(
        &self,
        kind: ResourceKind,
        query: &ProximityQuery,
    ) -> Result<Vec<ContentRecord>> {
        let state = self.state.read().await;
        Ok(state
            .table(kind)
            .map(|rows| {
                rows.values()
                    .filter(|record| record.is_live() && query.matches(record))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_updated_since(
        &self,
        kind: ResourceKind,
        since: DateTime<Utc>,
    ) -> Result<Vec<ContentRecord>> {
        let state = self.state.read().await;
        let mut rows: Vec<ContentRecord> = state
            .table(kind)
            .map(|rows| {
                rows.values()
                    .filter(|record| record.updated_at > since)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        rows.sort_by_key(|record| (record.updated_at, record.id));
        Ok(rows)
    }

    async fn find_replies(&self, thread_id: i64) -> Result<Vec<ContentRecord>> {
        let state = self.state.read().await;
        let mut replies: Vec<ContentRecord> = state
            .table(ResourceKind::Post)
            .map(|rows| {
                rows.values()
                    .filter(|post| post.is_live() && post.parent_id == Some(thread_id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        replies.sort_by_key(|post| (post.created_at, post.id));
        Ok(replies)
    }

    async fn like_status(
        &self,
        kind: ResourceKind,
        user_id: Uuid,
        resource_id: i64,
    ) -> Result<Option<LikeToggle>> {
        let state = self.state.read().await;
        Ok(state.live(kind, resource_id).map(|record| LikeToggle {
            liked: state.likes.contains_key(&(kind, user_id, resource_id)),
            like_count: record.like_count,
        }))
    }

    async fn toggle_like(
        &self,
        kind: ResourceKind,
        user_id: Uuid,
        resource_id: i64,
    ) -> Result<Option<LikeToggle>> {
        let mut state = self.state.write().await;
        let current = match state.live(kind, resource_id) {
            Some(record) => record.like_count,
            None => return Ok(None),
        };

        let key = (kind, user_id, resource_id);
        let already_liked = state.likes.contains_key(&key);
        let staged_count = if already_liked {
            (current - 1).max(0)
        } else {
            current + 1
        };

        let now = Utc::now();
        let removed = if already_liked {
            state.likes.remove(&key)
        } else {
            state.likes.insert(
                key,
                LikeRecord {
                    kind,
                    user_id,
                    resource_id,
                    created_at: now,
                },
            );
            None
        };

        if self.fail_next_counter_write.swap(false, Ordering::SeqCst) {
            match removed {
                Some(row) => {
                    state.likes.insert(key, row);
                }
                None => {
                    state.likes.remove(&key);
                }
            }
            return Err(AppError::Storage(format!(
                "counter update on {} {} failed",
                kind, resource_id
            )));
        }

        if let Some(record) = state
            .content
            .get_mut(&kind)
            .and_then(|rows| rows.get_mut(&resource_id))
        {
            record.like_count = staged_count;
            record.updated_at = now;
        }

        Ok(Some(LikeToggle {
            liked: !already_liked,
            like_count: staged_count,
        }))
    }

    async fn insert_comment(&self, mut comment: Comment) -> Result<Comment> {
        let mut state = self.state.write().await;
        state.next_comment_id += 1;
        comment.id = state.next_comment_id;
        comment.like_count = 0;
        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_comments(&self, thread_id: i64) -> Result<Vec<Comment>> {
        let state = self.state.read().await;
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|comment| comment.is_live() && comment.thread_id == thread_id)
            .cloned()
            .collect();
        comments.sort_by_key(|comment| (comment.created_at, comment.id));
        Ok(comments)
    }

    async fn soft_delete_comment(&self, comment_id: i64, at: DateTime<Utc>) -> Result<bool> {
        let mut state = self.state.write().await;
        match state
            .comments
            .get_mut(&comment_id)
            .filter(|comment| comment.is_live())
        {
            Some(comment) => {
                comment.deleted_at = Some(at);
                comment.updated_at = at;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
