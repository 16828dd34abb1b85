//! Editor hooks: the pluggable capability set driven on every mutation.
//!
//! Each hook can contribute template descriptors for type, type-part, part,
//! and field editors, react to updates of those levels by writing settings
//! into the builder, and record validation errors on the updater. Any number
//! of hooks can be registered; the [`EditorRegistry`] calls all of them in
//! registration order and concatenates their results.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::definition::{
    FieldBuilder, FieldDefinition, PartDefinition, PartDefinitionBuilder, TypeDefinition,
    TypeDefinitionBuilder, TypePartBuilder, TypePartDefinition,
};
use crate::updater::UpdateModel;

/// Describes an editor template a hook wants rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    /// Template identifier understood by the presentation layer
    pub template_name: String,

    /// Form prefix the template's inputs are posted under
    #[serde(default)]
    pub prefix: String,

    /// The model the template renders
    #[serde(default)]
    pub model: serde_json::Value,
}

impl TemplateDescriptor {
    pub fn new(template_name: impl Into<String>, prefix: impl Into<String>, model: serde_json::Value) -> Self {
        Self {
            template_name: template_name.into(),
            prefix: prefix.into(),
            model,
        }
    }
}

/// The editor hook trait.
///
/// Every method has an empty default so a hook only implements the levels
/// it cares about. Update methods run inside an open alteration, before
/// it commits; settings written to the builder are persisted with it.
pub trait EditorEvents: Send + Sync {
    /// Hook name, used in logs.
    fn name(&self) -> &str;

    fn type_editor(&self, definition: &TypeDefinition) -> Vec<TemplateDescriptor> {
        let _ = definition;
        Vec::new()
    }

    fn type_editor_update(&self, builder: &mut TypeDefinitionBuilder, updater: &dyn UpdateModel) -> Vec<TemplateDescriptor> {
        let _ = (builder, updater);
        Vec::new()
    }

    fn type_part_editor(&self, definition: &TypePartDefinition) -> Vec<TemplateDescriptor> {
        let _ = definition;
        Vec::new()
    }

    fn type_part_editor_update(&self, builder: &mut TypePartBuilder<'_>, updater: &dyn UpdateModel) -> Vec<TemplateDescriptor> {
        let _ = (builder, updater);
        Vec::new()
    }

    fn part_editor(&self, definition: &PartDefinition) -> Vec<TemplateDescriptor> {
        let _ = definition;
        Vec::new()
    }

    fn part_editor_update(&self, builder: &mut PartDefinitionBuilder, updater: &dyn UpdateModel) -> Vec<TemplateDescriptor> {
        let _ = (builder, updater);
        Vec::new()
    }

    fn part_field_editor(&self, definition: &FieldDefinition) -> Vec<TemplateDescriptor> {
        let _ = definition;
        Vec::new()
    }

    fn part_field_editor_update(&self, builder: &mut FieldBuilder<'_>, updater: &dyn UpdateModel) -> Vec<TemplateDescriptor> {
        let _ = (builder, updater);
        Vec::new()
    }

    /// Installable field types this hook provides.
    fn field_type_descriptors(&self) -> Vec<TemplateDescriptor> {
        Vec::new()
    }
}

/// An ordered registry of editor hooks.
pub struct EditorRegistry {
    hooks: Vec<Arc<dyn EditorEvents>>,
}

impl EditorRegistry {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Register a hook. Hooks are invoked in registration order.
    pub fn register(&mut self, hook: Arc<dyn EditorEvents>) {
        info!(hook = %hook.name(), "Registered editor hook");
        self.hooks.push(hook);
    }

    pub fn names(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    fn collect(&self, mut call: impl FnMut(&dyn EditorEvents) -> Vec<TemplateDescriptor>) -> Vec<TemplateDescriptor> {
        self.hooks.iter().flat_map(|h| call(h.as_ref())).collect()
    }
}

impl Default for EditorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorEvents for EditorRegistry {
    fn name(&self) -> &str {
        "registry"
    }

    fn type_editor(&self, definition: &TypeDefinition) -> Vec<TemplateDescriptor> {
        self.collect(|h| h.type_editor(definition))
    }

    fn type_editor_update(&self, builder: &mut TypeDefinitionBuilder, updater: &dyn UpdateModel) -> Vec<TemplateDescriptor> {
        self.collect(|h| h.type_editor_update(builder, updater))
    }

    fn type_part_editor(&self, definition: &TypePartDefinition) -> Vec<TemplateDescriptor> {
        self.collect(|h| h.type_part_editor(definition))
    }

    fn type_part_editor_update(&self, builder: &mut TypePartBuilder<'_>, updater: &dyn UpdateModel) -> Vec<TemplateDescriptor> {
        self.collect(|h| h.type_part_editor_update(builder, updater))
    }

    fn part_editor(&self, definition: &PartDefinition) -> Vec<TemplateDescriptor> {
        self.collect(|h| h.part_editor(definition))
    }

    fn part_editor_update(&self, builder: &mut PartDefinitionBuilder, updater: &dyn UpdateModel) -> Vec<TemplateDescriptor> {
        self.collect(|h| h.part_editor_update(builder, updater))
    }

    fn part_field_editor(&self, definition: &FieldDefinition) -> Vec<TemplateDescriptor> {
        self.collect(|h| h.part_field_editor(definition))
    }

    fn part_field_editor_update(&self, builder: &mut FieldBuilder<'_>, updater: &dyn UpdateModel) -> Vec<TemplateDescriptor> {
        self.collect(|h| h.part_field_editor_update(builder, updater))
    }

    fn field_type_descriptors(&self) -> Vec<TemplateDescriptor> {
        self.collect(|h| h.field_type_descriptors())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{PartDefinition, TypeDefinition};
    use crate::settings::Settings;

    struct TaggingHook {
        tag: &'static str,
    }

    impl EditorEvents for TaggingHook {
        fn name(&self) -> &str {
            self.tag
        }

        fn type_editor(&self, _definition: &TypeDefinition) -> Vec<TemplateDescriptor> {
            vec![TemplateDescriptor::new(self.tag, "", serde_json::Value::Null)]
        }

        fn part_editor_update(&self, builder: &mut PartDefinitionBuilder, _updater: &dyn UpdateModel) -> Vec<TemplateDescriptor> {
            builder.with_setting(format!("{}.Seen", self.tag), "true");
            Vec::new()
        }

        fn field_type_descriptors(&self) -> Vec<TemplateDescriptor> {
            vec![
                TemplateDescriptor::new(format!("{}-1", self.tag), "", serde_json::Value::Null),
                TemplateDescriptor::new(format!("{}-2", self.tag), "", serde_json::Value::Null),
            ]
        }
    }

    struct NullUpdater;

    impl UpdateModel for NullUpdater {
        fn try_update_model(&self, _model: &mut Settings, _prefix: &str, _include: &[&str], _exclude: &[&str]) -> bool {
            false
        }
        fn add_model_error(&self, _key: &str, _message: &str) {}
    }

    fn registry() -> EditorRegistry {
        let mut registry = EditorRegistry::new();
        registry.register(Arc::new(TaggingHook { tag: "first" }));
        registry.register(Arc::new(TaggingHook { tag: "second" }));
        registry
    }

    #[test]
    fn empty_registry() {
        let registry = EditorRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.field_type_descriptors().is_empty());
    }

    #[test]
    fn results_concatenate_in_registration_order() {
        let registry = registry();
        assert_eq!(registry.names(), vec!["first", "second"]);

        let names: Vec<_> = registry
            .field_type_descriptors()
            .into_iter()
            .map(|t| t.template_name)
            .collect();
        assert_eq!(names, vec!["first-1", "first-2", "second-1", "second-2"]);

        let templates = registry.type_editor(&TypeDefinition::new("order", "Order"));
        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].template_name, "first");
    }

    #[test]
    fn every_hook_sees_the_builder() {
        let registry = registry();
        let mut builder = PartDefinitionBuilder::new(PartDefinition::new("orderPart"));
        let templates = registry.part_editor_update(&mut builder, &NullUpdater);
        assert!(templates.is_empty());

        let part = builder.build();
        assert_eq!(part.settings.get_bool("first.Seen"), Some(true));
        assert_eq!(part.settings.get_bool("second.Seen"), Some(true));
    }
}
