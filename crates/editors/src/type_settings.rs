//! Capability flags of a type: creatable and draftable.

use contentdef_core::definition::{TypeDefinition, TypeDefinitionBuilder};
use contentdef_core::editor::{EditorEvents, TemplateDescriptor};
use contentdef_core::settings::Settings;
use contentdef_core::updater::UpdateModel;

const PREFIX: &str = "ContentTypeSettings";
const FLAGS: &[&str] = &["Creatable", "Draftable"];

pub struct TypeSettingsEditor;

fn template(definition: &TypeDefinition) -> TemplateDescriptor {
    TemplateDescriptor::new(
        format!("DefinitionTemplates/{PREFIX}"),
        PREFIX,
        serde_json::json!({
            "Creatable": definition.is_creatable(),
            "Draftable": definition.is_draftable(),
        }),
    )
}

impl EditorEvents for TypeSettingsEditor {
    fn name(&self) -> &str {
        "type_settings"
    }

    fn type_editor(&self, definition: &TypeDefinition) -> Vec<TemplateDescriptor> {
        vec![template(definition)]
    }

    fn type_editor_update(&self, builder: &mut TypeDefinitionBuilder, updater: &dyn UpdateModel) -> Vec<TemplateDescriptor> {
        let mut model = Settings::new();
        if !updater.try_update_model(&mut model, PREFIX, FLAGS, &[]) {
            return Vec::new();
        }

        let mut flags = Vec::with_capacity(FLAGS.len());
        for key in FLAGS {
            match model.get(key).map(|_| model.get_bool(key)) {
                None => {}
                Some(Some(value)) => flags.push((*key, value)),
                Some(None) => {
                    updater.add_model_error(&format!("{PREFIX}.{key}"), "must be true or false");
                    return Vec::new();
                }
            }
        }

        for (key, value) in flags {
            match key {
                "Creatable" => builder.creatable(value),
                _ => builder.draftable(value),
            };
        }
        vec![template(builder.current())]
    }
}
