//! Binding shared by the field-kind hooks.
//!
//! Every kind keeps its settings under `"{Kind}Settings.*"` on the field,
//! offers one catalog entry, and only reacts to fields of its own type.

use contentdef_core::definition::{FieldBuilder, FieldDefinition};
use contentdef_core::editor::TemplateDescriptor;
use contentdef_core::settings::Settings;
use contentdef_core::updater::UpdateModel;

/// Static description of a field kind.
pub(crate) struct FieldKind {
    /// Field-type tag stored on the field definition
    pub field_type: &'static str,
    pub display_name: &'static str,
    /// Setting names accepted from the form
    pub keys: &'static [&'static str],
}

impl FieldKind {
    /// `"{Kind}Settings"`, both the form prefix and the settings namespace.
    pub fn settings_prefix(&self) -> String {
        format!("{}Settings", self.field_type)
    }

    pub fn template(&self, model: &Settings) -> TemplateDescriptor {
        let prefix = self.settings_prefix();
        TemplateDescriptor::new(
            format!("DefinitionTemplates/{prefix}"),
            prefix,
            serde_json::json!(model),
        )
    }

    pub fn catalog_entry(&self) -> TemplateDescriptor {
        TemplateDescriptor::new(
            self.field_type,
            "",
            serde_json::json!({ "display_name": self.display_name }),
        )
    }

    /// The editor template for a field of this kind.
    pub fn editor(&self, definition: &FieldDefinition) -> Vec<TemplateDescriptor> {
        if definition.field_type != self.field_type {
            return Vec::new();
        }
        vec![self.template(&definition.settings.scoped(&self.settings_prefix()))]
    }

    /// Bind the posted settings of a field of this kind. `None` when the
    /// field is of another kind or nothing was posted for it.
    pub fn bind(&self, builder: &FieldBuilder<'_>, updater: &dyn UpdateModel) -> Option<Settings> {
        if builder.field_type() != self.field_type {
            return None;
        }
        let mut model = Settings::new();
        updater
            .try_update_model(&mut model, &self.settings_prefix(), self.keys, &[])
            .then_some(model)
    }

    /// Record an error unless `key`, when present, holds a boolean.
    pub fn check_bool(&self, model: &Settings, key: &str, updater: &dyn UpdateModel) -> bool {
        if model.contains_key(key) && model.get_bool(key).is_none() {
            updater.add_model_error(
                &format!("{}.{key}", self.settings_prefix()),
                "must be true or false",
            );
            return false;
        }
        true
    }

    /// Templates for a field of this kind when nothing was posted for it,
    /// so its editor still renders with the stored settings.
    pub fn unbound(&self, builder: &FieldBuilder<'_>) -> Vec<TemplateDescriptor> {
        if builder.field_type() != self.field_type {
            return Vec::new();
        }
        vec![self.template(&builder.settings().scoped(&self.settings_prefix()))]
    }

    /// Write the bound model into the field and return its template.
    pub fn commit(&self, builder: &mut FieldBuilder<'_>, model: &Settings) -> Vec<TemplateDescriptor> {
        let prefix = self.settings_prefix();
        for (key, value) in model.iter() {
            builder.with_setting(format!("{prefix}.{key}"), value);
        }
        vec![self.template(&builder.settings().scoped(&prefix))]
    }
}
