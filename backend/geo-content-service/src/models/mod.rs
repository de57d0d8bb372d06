/// Data models for geo-content-service
///
/// This module defines structures for:
/// - ContentRecord: the shared storage shape of posts, threads and events
/// - Comment: comments attached to a thread
/// - LikeRecord / LikeToggle: per-kind like join rows and toggle outcomes
/// - User: the subset of the user table the core reads
/// - Request payloads for create, edit, proximity and comment calls
mod comment;
mod content;
mod like;
mod payload;
mod user;

pub use comment::Comment;
pub use content::{Ack, ContentRecord, ThreadWithReplies};
pub use like::{LikeRecord, LikeToggle};
pub use payload::{CommentPayload, ContentPatch, ContentPayload};
pub use user::User;

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Coordinate {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Content category. Unknown strings decode to [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Entertainment,
    Disaster,
    Community,
    #[default]
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Entertainment => "entertainment",
            Category::Disaster => "disaster",
            Category::Community => "community",
            Category::Other => "other",
        }
    }

    /// Categories returned by the proximity filter regardless of position.
    pub fn is_unconditional(&self) -> bool {
        matches!(self, Category::Entertainment | Category::Disaster)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "entertainment" => Category::Entertainment,
            "disaster" => Category::Disaster,
            "community" => Category::Community,
            _ => Category::Other,
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::from(value.as_str())
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
