//! Definition events: decoupled notification of committed schema changes.
//!
//! The definition service publishes an event after each committed mutation.
//! Other components (caches, search indexes, audit trails) can subscribe
//! to react without coupling to the service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All definition events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DefinitionEvent {
    TypeCreated {
        type_name: String,
        timestamp: DateTime<Utc>,
    },

    TypeAltered {
        type_name: String,
        validation_errors: usize,
        timestamp: DateTime<Utc>,
    },

    TypeRemoved {
        type_name: String,
        content_deleted: bool,
        timestamp: DateTime<Utc>,
    },

    PartAttached {
        part_name: String,
        type_name: String,
        timestamp: DateTime<Utc>,
    },

    PartDetached {
        part_name: String,
        type_name: String,
        timestamp: DateTime<Utc>,
    },

    PartCreated {
        part_name: String,
        timestamp: DateTime<Utc>,
    },

    PartAltered {
        part_name: String,
        timestamp: DateTime<Utc>,
    },

    PartRemoved {
        part_name: String,
        timestamp: DateTime<Utc>,
    },

    FieldAdded {
        part_name: String,
        field_name: String,
        field_type: String,
        timestamp: DateTime<Utc>,
    },

    FieldRemoved {
        part_name: String,
        field_name: String,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for definition events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DefinitionEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DefinitionEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DefinitionEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn event_bus_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(DefinitionEvent::FieldAdded {
            part_name: "orderPart".into(),
            field_name: "duedate".into(),
            field_type: "DateField".into(),
            timestamp: Utc::now(),
        });

        let event = rx.recv().await.unwrap();
        match event.as_ref() {
            DefinitionEvent::FieldAdded { field_name, field_type, .. } => {
                assert_eq!(field_name, "duedate");
                assert_eq!(field_type, "DateField");
            }
            _ => panic!("Expected FieldAdded event"),
        }
    }

    #[test]
    fn event_bus_no_subscribers_doesnt_panic() {
        let bus = EventBus::new(16);
        bus.publish(DefinitionEvent::PartRemoved {
            part_name: "orderPart".into(),
            timestamp: Utc::now(),
        });
    }
}
