//! Select fields: a fixed list of labels the user picks one or more from.
//!
//! Labels are posted as one string separated by `;`. `SelectCount` is the
//! number of labels a user may pick and must lie within `1..=labels`.

use contentdef_core::definition::{FieldBuilder, FieldDefinition};
use contentdef_core::editor::{EditorEvents, TemplateDescriptor};
use contentdef_core::settings::Settings;
use contentdef_core::updater::UpdateModel;
use tracing::debug;

use crate::field_kind::FieldKind;

const KIND: FieldKind = FieldKind {
    field_type: "SelectField",
    display_name: "Select",
    keys: &["Labels", "DisplayLines", "SelectCount", "Required"],
};

pub const LABEL_SEPARATOR: char = ';';

pub struct SelectFieldEditor;

fn labels(model: &Settings) -> Vec<&str> {
    model
        .get("Labels")
        .unwrap_or_default()
        .split(LABEL_SEPARATOR)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Fill in defaults and check the bound settings. Records every problem
/// found and returns `false` if there was any.
fn validate(model: &mut Settings, updater: &dyn UpdateModel) -> bool {
    let label_count = labels(model).len();
    if label_count == 0 {
        updater.add_model_error("SelectFieldSettings", "at least one label is required");
        return false;
    }

    let mut valid = KIND.check_bool(model, "Required", updater);

    if !model.contains_key("SelectCount") {
        model.set("SelectCount", "1");
    } else if !model
        .get_i64("SelectCount")
        .is_some_and(|n| n >= 1 && n as usize <= label_count)
    {
        updater.add_model_error(
            "SelectFieldSettings.SelectCount",
            &format!("must be between 1 and {label_count}"),
        );
        valid = false;
    }

    if !model.contains_key("DisplayLines") {
        model.set("DisplayLines", label_count.to_string());
    } else if !model.get_i64("DisplayLines").is_some_and(|n| n > 0) {
        updater.add_model_error("SelectFieldSettings.DisplayLines", "must be a positive number");
        valid = false;
    }

    valid
}

impl EditorEvents for SelectFieldEditor {
    fn name(&self) -> &str {
        "select_field"
    }

    fn part_field_editor(&self, definition: &FieldDefinition) -> Vec<TemplateDescriptor> {
        KIND.editor(definition)
    }

    fn part_field_editor_update(&self, builder: &mut FieldBuilder<'_>, updater: &dyn UpdateModel) -> Vec<TemplateDescriptor> {
        let Some(mut model) = KIND.bind(builder, updater) else {
            return KIND.unbound(builder);
        };
        if !validate(&mut model, updater) {
            debug!(field = %builder.name(), "Select field settings rejected");
            return Vec::new();
        }
        let normalized = labels(&model).join(&LABEL_SEPARATOR.to_string());
        model.set("Labels", normalized);
        KIND.commit(builder, &model)
    }

    fn field_type_descriptors(&self) -> Vec<TemplateDescriptor> {
        vec![KIND.catalog_entry()]
    }
}
