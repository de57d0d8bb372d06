/// Request payloads accepted by the engine.
///
/// Payloads are decoded from raw request bytes and validated before any
/// storage call. Ownership and display-name fields do not exist here, so a
/// client-supplied `user_id` or `username` is ignored.
use super::{Category, Coordinate};
use crate::error::Result;
use serde::Deserialize;
use validator::Validate;

fn default_valid() -> bool {
    true
}

/// Body of a create call for a post, thread or event.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContentPayload {
    pub coordinate: Coordinate,
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default = "default_valid")]
    pub valid: bool,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub tags: Vec<String>,
    /// Only meaningful for posts: the thread this post replies to
    #[serde(default)]
    pub parent_id: Option<i64>,
}

impl ContentPayload {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let payload: Self = serde_json::from_slice(bytes)?;
        payload.validate()?;
        payload.coordinate.validate()?;
        Ok(payload)
    }
}

/// Body of an edit call. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ContentPatch {
    pub coordinate: Option<Coordinate>,
    #[validate(length(min = 1, max = 5000))]
    pub content: Option<String>,
    pub category: Option<Category>,
    pub valid: Option<bool>,
    #[validate(length(max = 32))]
    pub tags: Option<Vec<String>>,
}

impl ContentPatch {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let patch: Self = serde_json::from_slice(bytes)?;
        patch.validate()?;
        if let Some(coordinate) = &patch.coordinate {
            coordinate.validate()?;
        }
        Ok(patch)
    }
}

/// Body of a comment or thread-reply call.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentPayload {
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub tags: Vec<String>,
}

impl CommentPayload {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let payload: Self = serde_json::from_slice(bytes)?;
        payload.validate()?;
        if let Some(coordinate) = &payload.coordinate {
            coordinate.validate()?;
        }
        Ok(payload)
    }
}
