//! Single-line text fields.

use contentdef_core::definition::{FieldBuilder, FieldDefinition};
use contentdef_core::editor::{EditorEvents, TemplateDescriptor};
use contentdef_core::updater::UpdateModel;

use crate::field_kind::FieldKind;

const KIND: FieldKind = FieldKind {
    field_type: "TextField",
    display_name: "Text",
    keys: &["Required", "HelpText", "MaxLength"],
};

pub struct TextFieldEditor;

impl EditorEvents for TextFieldEditor {
    fn name(&self) -> &str {
        "text_field"
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
        if model.contains_key("MaxLength") && !model.get_i64("MaxLength").is_some_and(|n| n > 0) {
            updater.add_model_error("TextFieldSettings.MaxLength", "must be a positive number");
            return Vec::new();
        }
        KIND.commit(builder, &model)
    }

    fn field_type_descriptors(&self) -> Vec<TemplateDescriptor> {
        vec![KIND.catalog_entry()]
    }
}
