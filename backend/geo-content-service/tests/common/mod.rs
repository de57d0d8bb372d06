#![allow(dead_code)]

use geo_content_service::db::{ContentStore, MemoryContentStore};
use geo_content_service::models::User;
use geo_content_service::services::{CommentService, LikeService, ResourceEngine};
use std::sync::Arc;
use uuid::Uuid;

pub struct Fixture {
    pub store: Arc<MemoryContentStore>,
    pub engine: ResourceEngine,
    pub likes: LikeService,
    pub comments: CommentService,
    pub user: Uuid,
}

impl Fixture {
    pub fn dyn_store(&self) -> Arc<dyn ContentStore> {
        self.store.clone()
    }

    /// Register another user and return its id
    pub async fn add_user(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.store
            .insert_user(User::new(id, name, format!("{}@example.com", name)))
            .await;
        id
    }
}

pub fn fixture() -> Fixture {
    let user = User::new(Uuid::new_v4(), "hana", "hana@example.com");
    let user_id = user.id;
    let store = Arc::new(MemoryContentStore::with_users([user]));
    let dyn_store: Arc<dyn ContentStore> = store.clone();

    Fixture {
        engine: ResourceEngine::new(dyn_store.clone()),
        likes: LikeService::new(dyn_store.clone()),
        comments: CommentService::new(dyn_store),
        store,
        user: user_id,
    }
}

pub fn content_body(category: &str, lat: f64, lng: f64, content: &str) -> Vec<u8> {
    serde_json::json!({
        "coordinate": { "lat": lat, "lng": lng },
        "content": content,
        "category": category,
        "tags": ["local"],
    })
    .to_string()
    .into_bytes()
}

pub fn coordinate_body(lat: f64, lng: f64) -> Vec<u8> {
    serde_json::json!({ "lat": lat, "lng": lng })
        .to_string()
        .into_bytes()
}
