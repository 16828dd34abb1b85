//! Phone number fields.

use contentdef_core::definition::{FieldBuilder, FieldDefinition};
use contentdef_core::editor::{EditorEvents, TemplateDescriptor};
use contentdef_core::updater::UpdateModel;

use crate::field_kind::FieldKind;

const KIND: FieldKind = FieldKind {
    field_type: "PhoneField",
    display_name: "Phone",
    keys: &["Required", "HelpText", "DefaultValue"],
};

pub struct PhoneFieldEditor;

/// Digits plus the usual separators, with at least one digit.
fn is_phone_number(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')' | '.'))
}

impl EditorEvents for PhoneFieldEditor {
    fn name(&self) -> &str {
        "phone_field"
    }

    fn part_field_editor(&self, definition: &FieldDefinition) -> Vec<TemplateDescriptor> {
        KIND.editor(definition)
    }

    fn part_field_editor_update(&self, builder: &mut FieldBuilder<'_>, updater: &dyn UpdateModel) -> Vec<TemplateDescriptor> {
        let Some(model) = KIND.bind(builder, updater) else {
            return KIND.unbound(builder);
        };
        if !KIND.check_bool(&model, "Required", updater) {
            return Vec::new();
        }
        if let Some(default) = model.get("DefaultValue") {
            if !default.trim().is_empty() && !is_phone_number(default) {
                updater.add_model_error("PhoneFieldSettings.DefaultValue", "is not a phone number");
                return Vec::new();
            }
        }
        KIND.commit(builder, &model)
    }

    fn field_type_descriptors(&self) -> Vec<TemplateDescriptor> {
        vec![KIND.catalog_entry()]
    }
}
