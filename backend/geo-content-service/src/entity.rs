//! Capability contract shared by every geotagged content kind.
//!
//! The engine only ever talks to content through [`Resource`]. Posts, threads
//! and events all persist as a [`ContentRecord`]; [`ResourceKind`] is the tag
//! that routes a record to its table and like table.

use crate::error::AppError;
use crate::models::ContentRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use uuid::Uuid;

/// Table-routing tag for content kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Post,
    Thread,
    Event,
}

impl ResourceKind {
    /// Name used in error messages and URLs
    pub fn resource_name(&self) -> &'static str {
        match self {
            ResourceKind::Post => "post",
            ResourceKind::Thread => "thread",
            ResourceKind::Event => "event",
        }
    }

    pub fn table_name(&self) -> &'static str {
        match self {
            ResourceKind::Post => "posts",
            ResourceKind::Thread => "threads",
            ResourceKind::Event => "events",
        }
    }

    pub fn like_table(&self) -> &'static str {
        match self {
            ResourceKind::Post => "post_likes",
            ResourceKind::Thread => "thread_likes",
            ResourceKind::Event => "event_likes",
        }
    }

    /// Foreign-key column of the like table
    pub fn like_column(&self) -> &'static str {
        match self {
            ResourceKind::Post => "post_id",
            ResourceKind::Thread => "thread_id",
            ResourceKind::Event => "event_id",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource_name())
    }
}

impl FromStr for ResourceKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" => Ok(ResourceKind::Post),
            "thread" => Ok(ResourceKind::Thread),
            "event" => Ok(ResourceKind::Event),
            other => Err(AppError::NotFound(format!("unknown resource kind '{}'", other))),
        }
    }
}

/// Minimal surface the generic engine needs from a content entity.
pub trait Resource: Serialize + Clone + Send + Sync + 'static {
    const KIND: ResourceKind;

    fn id(&self) -> i64;
    fn set_owner(&mut self, user_id: Uuid);
    fn set_display_name(&mut self, name: String);
    fn set_updated_at(&mut self, at: DateTime<Utc>);

    fn resource_name(&self) -> &'static str {
        Self::KIND.resource_name()
    }

    fn table_name(&self) -> &'static str {
        Self::KIND.table_name()
    }

    fn from_record(record: ContentRecord) -> Self;
    fn into_record(self) -> ContentRecord;
}

macro_rules! content_entity {
    ($(#[$meta:meta])* $name:ident, $kind:expr, keep_parent = $keep_parent:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(ContentRecord);

        impl Resource for $name {
            const KIND: ResourceKind = $kind;

            fn id(&self) -> i64 {
                self.0.id
            }

            fn set_owner(&mut self, user_id: Uuid) {
                self.0.user_id = user_id;
            }

            fn set_display_name(&mut self, name: String) {
                self.0.username = name;
            }

            fn set_updated_at(&mut self, at: DateTime<Utc>) {
                self.0.updated_at = at;
            }

            fn from_record(mut record: ContentRecord) -> Self {
                if !$keep_parent {
                    record.parent_id = None;
                }
                $name(record)
            }

            fn into_record(self) -> ContentRecord {
                self.0
            }
        }

        impl Deref for $name {
            type Target = ContentRecord;

            fn deref(&self) -> &ContentRecord {
                &self.0
            }
        }
    };
}

content_entity!(
    /// A geotagged post. Replies inside a thread are posts with `parent_id` set.
    Post,
    ResourceKind::Post,
    keep_parent = true
);

content_entity!(
    /// A geotagged discussion thread.
    Thread,
    ResourceKind::Thread,
    keep_parent = false
);

content_entity!(
    /// A geotagged event.
    Event,
    ResourceKind::Event,
    keep_parent = false
);
