/// Business logic layer for geo-content-service
///
/// This module provides:
/// - ResourceEngine: create/get/edit/delete, proximity and sync for any `Resource`
/// - LikeService: like toggles and like status
/// - CommentService: comments attached to threads
pub mod comments;
pub mod engine;
pub mod likes;

pub use comments::CommentService;
pub use engine::ResourceEngine;
pub use likes::LikeService;

use crate::db::ContentStore;
use crate::error::{AppError, Result};
use uuid::Uuid;

/// Display name of `user_id`, stamped onto new content.
async fn display_name(store: &dyn ContentStore, user_id: Uuid) -> Result<String> {
    store
        .find_user(user_id)
        .await?
        .map(|user| user.name)
        .ok_or_else(|| AppError::not_found("user", user_id))
}
