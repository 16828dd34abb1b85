//! Built-in editor hooks for contentdef.
//!
//! Hooks contribute editor templates and bind posted settings into
//! definitions while an alteration is open. [`default_registry`] wires up
//! the type settings hook and one hook per supported field kind.

mod field_kind;

pub mod date_field;
pub mod phone_field;
pub mod select_field;
pub mod text_field;
pub mod type_settings;

use contentdef_core::editor::EditorRegistry;
use std::sync::Arc;

pub use date_field::DateFieldEditor;
pub use phone_field::PhoneFieldEditor;
pub use select_field::SelectFieldEditor;
pub use text_field::TextFieldEditor;
pub use type_settings::TypeSettingsEditor;

/// Create an editor registry with all built-in hooks.
///
/// Order is fixed: type settings first, then field kinds in catalog order.
pub fn default_registry() -> EditorRegistry {
    let mut registry = EditorRegistry::new();
    registry.register(Arc::new(TypeSettingsEditor));
    registry.register(Arc::new(TextFieldEditor));
    registry.register(Arc::new(PhoneFieldEditor));
    registry.register(Arc::new(DateFieldEditor));
    registry.register(Arc::new(SelectFieldEditor));
    registry
}
