//! Content manager trait: the slice of content-item storage the definition
//! service needs when a type is removed together with its content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// A content item instance of some type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,

    /// Name of the type this item is an instance of
    pub content_type: String,

    /// Version numbers recorded for this item, oldest first
    #[serde(default)]
    pub versions: Vec<u32>,

    /// Set once the item has been removed; its versions are kept
    #[serde(default)]
    pub removed_at: Option<DateTime<Utc>>,
}

impl ContentItem {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content_type: content_type.into(),
            versions: vec![1],
            removed_at: None,
        }
    }

    pub fn is_removed(&self) -> bool {
        self.removed_at.is_some()
    }
}

/// The content collaborator.
pub trait ContentManager: Send + Sync {
    /// Every live item of the given type.
    fn query_by_type(&self, content_type: &str) -> Result<Vec<ContentItem>, ContentError>;

    /// Remove an item while keeping its version history.
    fn remove(&self, item: &ContentItem) -> Result<(), ContentError>;
}
