//! In-memory content manager: stands in for content-item storage in tests
//! and in the CLI.

use chrono::Utc;
use contentdef_core::content::{ContentItem, ContentManager};
use contentdef_core::error::ContentError;
use std::sync::RwLock;
use tracing::debug;

/// Keeps content items in a Vec. Removed items stay, with their versions.
pub struct InMemoryContentManager {
    items: RwLock<Vec<ContentItem>>,
}

impl InMemoryContentManager {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }

    /// Create and store a new item of the given type.
    pub fn create(&self, content_type: &str) -> Result<ContentItem, ContentError> {
        let item = ContentItem::new(content_type);
        self.items
            .write()
            .map_err(|_| ContentError::Query {
                content_type: content_type.to_string(),
                reason: "content lock poisoned".into(),
            })?
            .push(item.clone());
        Ok(item)
    }

    /// Every item ever stored, removed ones included.
    pub fn all_items(&self) -> Vec<ContentItem> {
        self.items.read().map(|items| items.clone()).unwrap_or_default()
    }
}

impl Default for InMemoryContentManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentManager for InMemoryContentManager {
    fn query_by_type(&self, content_type: &str) -> Result<Vec<ContentItem>, ContentError> {
        let items = self.items.read().map_err(|_| ContentError::Query {
            content_type: content_type.to_string(),
            reason: "content lock poisoned".into(),
        })?;
        Ok(items
            .iter()
            .filter(|i| i.content_type == content_type && !i.is_removed())
            .cloned()
            .collect())
    }

    fn remove(&self, item: &ContentItem) -> Result<(), ContentError> {
        let mut items = self.items.write().map_err(|_| ContentError::Remove {
            id: item.id.clone(),
            reason: "content lock poisoned".into(),
        })?;
        let stored = items
            .iter_mut()
            .find(|i| i.id == item.id)
            .ok_or_else(|| ContentError::Remove {
                id: item.id.clone(),
                reason: "no such item".into(),
            })?;
        stored.removed_at = Some(Utc::now());
        debug!(item_id = %item.id, content_type = %item.content_type, "Removed content item");
        Ok(())
    }
}
