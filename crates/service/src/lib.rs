//! # contentdef Service
//!
//! The orchestration layer of the schema engine. [`ContentDefinitionService`]
//! is the only entry point for mutating definitions; it drives the store's
//! "alter under callback" transactions, runs the editor hooks inside them,
//! and cascades deletions across types, parts, and fields.

pub mod naming;
pub mod service;
pub mod updater;
pub mod view;

pub use naming::{resolve_name, to_part_name, to_safe_name, version_name};
pub use service::{AlterOutcome, ContentDefinitionService, ServiceOptions};
pub use updater::{ErrorJournal, FormUpdater, Prefix, PrefixedUpdater};
pub use view::{EditPartFieldView, EditPartView, EditTypePartView, EditTypeView, PART_DEFINITION_PREFIX};
