//! Date fields. Default values use the `YYYY-MM-DD` form.

use chrono::NaiveDate;
use contentdef_core::definition::{FieldBuilder, FieldDefinition};
use contentdef_core::editor::{EditorEvents, TemplateDescriptor};
use contentdef_core::updater::UpdateModel;

use crate::field_kind::FieldKind;

const KIND: FieldKind = FieldKind {
    field_type: "DateField",
    display_name: "Date",
    keys: &["Required", "HelpText", "DefaultValue"],
};

pub struct DateFieldEditor;

impl EditorEvents for DateFieldEditor {
    fn name(&self) -> &str {
        "date_field"
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
        if let Some(default) = model.get("DefaultValue").map(str::trim).filter(|d| !d.is_empty()) {
            if NaiveDate::parse_from_str(default, "%Y-%m-%d").is_err() {
                updater.add_model_error("DateFieldSettings.DefaultValue", "must be a date like 2024-01-31");
                return Vec::new();
            }
        }
        KIND.commit(builder, &model)
    }

    fn field_type_descriptors(&self) -> Vec<TemplateDescriptor> {
        vec![KIND.catalog_entry()]
    }
}
