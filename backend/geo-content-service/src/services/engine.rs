/// Generic resource engine
///
/// One implementation of create/get/edit/delete, proximity and incremental
/// sync serves every content kind through the `Resource` contract.
use super::display_name;
use crate::db::ContentStore;
use crate::entity::{Post, Resource, ResourceKind, Thread};
use crate::error::{AppError, Result};
use crate::geo::ProximityQuery;
use crate::models::{Ack, CommentPayload, ContentPatch, ContentPayload, ContentRecord, ThreadWithReplies};
use crate::sync::parse_watermark;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct ResourceEngine {
    store: Arc<dyn ContentStore>,
}

impl ResourceEngine {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Create a new entity owned by `user_id` from a JSON payload.
    pub async fn create<T: Resource>(&self, payload: &[u8], user_id: Uuid) -> Result<T> {
        let payload = ContentPayload::parse(payload)?;

        if T::KIND == ResourceKind::Post {
            if let Some(thread_id) = payload.parent_id {
                self.get::<Thread>(thread_id).await?;
            }
        }

        let name = display_name(self.store.as_ref(), user_id).await?;

        let mut entity = T::from_record(ContentRecord::draft(payload, Utc::now()));
        entity.set_owner(user_id);
        entity.set_display_name(name);

        let saved = self
            .store
            .insert_content(T::KIND, entity.into_record())
            .await?;

        tracing::info!(
            resource = T::KIND.resource_name(),
            id = saved.id,
            user_id = %user_id,
            "content created"
        );
        Ok(T::from_record(saved))
    }

    /// Fetch a live entity by id.
    pub async fn get<T: Resource>(&self, id: i64) -> Result<T> {
        tracing::debug!(resource = T::KIND.resource_name(), id, "fetching content");
        self.store
            .find_content(T::KIND, id)
            .await?
            .map(T::from_record)
            .ok_or_else(|| AppError::not_found(T::KIND.resource_name(), id))
    }

    /// Merge the fields present in `payload` into an existing entity.
    ///
    /// The entity is looked up before the payload is parsed, so a missing id
    /// is reported as `NotFound` and storage is left untouched.
    pub async fn edit<T: Resource>(&self, id: i64, payload: &[u8], user_id: Uuid) -> Result<T> {
        let current = self.get::<T>(id).await?;
        let patch = ContentPatch::parse(payload)?;

        let mut record = current.into_record();
        record.apply_patch(patch);
        let mut entity = T::from_record(record);
        entity.set_updated_at(Utc::now());

        let saved = self
            .store
            .update_content(T::KIND, &entity.into_record())
            .await?
            .ok_or_else(|| AppError::not_found(T::KIND.resource_name(), id))?;

        tracing::info!(
            resource = T::KIND.resource_name(),
            id,
            user_id = %user_id,
            "content edited"
        );
        Ok(T::from_record(saved))
    }

    /// Soft-delete a live entity.
    pub async fn delete<T: Resource>(&self, id: i64) -> Result<Ack> {
        let resource = T::KIND.resource_name();
        self.get::<T>(id).await?;

        if !self
            .store
            .soft_delete_content(T::KIND, id, Utc::now())
            .await?
        {
            return Err(AppError::not_found(resource, id));
        }

        tracing::info!(resource, id, "content deleted");
        Ok(Ack::deleted(resource))
    }

    /// Entities visible from the coordinate in `body`, if any.
    pub async fn nearby<T: Resource>(&self, body: Option<&[u8]>) -> Result<Vec<T>> {
        let query = ProximityQuery::from_body(body)?;
        let records = self.store.find_nearby(T::KIND, &query).await?;

        tracing::debug!(
            resource = T::KIND.resource_name(),
            positioned = query.area().is_some(),
            count = records.len(),
            "proximity query"
        );
        Ok(records.into_iter().map(T::from_record).collect())
    }

    /// Entities changed strictly after `watermark` (Unix seconds), tombstones included.
    pub async fn updated_since<T: Resource>(&self, watermark: &str) -> Result<Vec<T>> {
        let since = parse_watermark(watermark)?;
        let records = self.store.find_updated_since(T::KIND, since).await?;

        tracing::debug!(
            resource = T::KIND.resource_name(),
            since = since.timestamp(),
            count = records.len(),
            "incremental sync"
        );
        Ok(records.into_iter().map(T::from_record).collect())
    }

    /// Post a reply inside a live thread. The reply sits at the thread's coordinate.
    pub async fn create_reply(&self, thread_id: i64, payload: &[u8], user_id: Uuid) -> Result<Post> {
        let thread = self.get::<Thread>(thread_id).await?;
        let payload = CommentPayload::parse(payload)?;
        let name = display_name(self.store.as_ref(), user_id).await?;

        let now = Utc::now();
        let draft = ContentRecord::draft(
            ContentPayload {
                coordinate: thread.coordinate,
                content: payload.content,
                category: Default::default(),
                valid: true,
                tags: payload.tags,
                parent_id: Some(thread_id),
            },
            now,
        );
        let mut reply = Post::from_record(draft);
        reply.set_owner(user_id);
        reply.set_display_name(name);

        let saved = self
            .store
            .insert_content(ResourceKind::Post, reply.into_record())
            .await?;

        tracing::info!(thread_id, id = saved.id, user_id = %user_id, "thread reply created");
        Ok(Post::from_record(saved))
    }

    pub async fn thread_with_replies(&self, thread_id: i64) -> Result<ThreadWithReplies<Thread, Post>> {
        let thread = self.get::<Thread>(thread_id).await?;
        let replies: Vec<Post> = self
            .store
            .find_replies(thread_id)
            .await?
            .into_iter()
            .map(Post::from_record)
            .collect();

        Ok(ThreadWithReplies {
            thread,
            reply_count: replies.len(),
            replies,
        })
    }
}
