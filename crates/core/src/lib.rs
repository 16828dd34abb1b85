//! # contentdef Core
//!
//! Domain types, traits, and error definitions for the contentdef schema
//! engine. A *type* is composed of attached *parts*, a part is composed of
//! *fields*, and every level carries an open settings bag.
//!
//! ## Design Philosophy
//!
//! Every collaborator the orchestration layer talks to is a trait here:
//! - [`DefinitionStore`]: durable definitions with "alter under callback"
//! - [`EditorEvents`]: pluggable editor hooks, composed by [`EditorRegistry`]
//! - [`UpdateModel`]: request-scoped model binding and error reporting
//! - [`ContentManager`]: content items of a type (only used on type removal)
//!
//! Implementations live in their respective crates, so every crate depends
//! inward on core and tests can swap in stubs.

pub mod content;
pub mod definition;
pub mod editor;
pub mod error;
pub mod event;
pub mod settings;
pub mod store;
pub mod updater;

// Re-export key types at crate root for ergonomics
pub use content::{ContentItem, ContentManager};
pub use definition::{
    FieldBuilder, FieldDefinition, PartDefinition, PartDefinitionBuilder, TypeDefinition,
    TypeDefinitionBuilder, TypePartBuilder, TypePartDefinition,
};
pub use editor::{EditorEvents, EditorRegistry, TemplateDescriptor};
pub use error::{ContentError, DefinitionKind, Error, Result, StoreError};
pub use event::{DefinitionEvent, EventBus};
pub use settings::Settings;
pub use store::{DefinitionStore, PartAlteration, TypeAlteration};
pub use updater::{UpdateModel, ValidationError};
