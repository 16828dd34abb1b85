//! Edit views handed to the presentation layer.
//!
//! A view snapshots a definition together with the form prefix of every
//! nested level and the templates the editor hooks contributed for it.
//! Views are transient: editing one and passing it back to the service is
//! how an alteration is requested.

use contentdef_core::definition::{FieldDefinition, PartDefinition, TypeDefinition, TypePartDefinition};
use contentdef_core::editor::TemplateDescriptor;
use contentdef_core::settings::Settings;
use serde::Serialize;

use crate::naming::to_part_name;

/// Form prefix of a part definition nested inside a type-part view.
pub const PART_DEFINITION_PREFIX: &str = "PartDefinition";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditTypeView {
    pub name: String,
    pub display_name: String,
    pub settings: Settings,

    /// Attached parts other than the type's own implicit part
    pub parts: Vec<EditTypePartView>,

    /// Fields of the implicit part, edited as if they were the type's own
    pub fields: Vec<EditPartFieldView>,

    pub templates: Vec<TemplateDescriptor>,

    #[serde(skip)]
    definition: TypeDefinition,
}

impl EditTypeView {
    /// Build a view of `definition`. `attached` holds the resolved part
    /// definition of each attached part, in attachment order.
    pub fn new(definition: TypeDefinition, attached: Vec<PartDefinition>) -> Self {
        let implicit = to_part_name(&definition.name);
        let mut parts = Vec::new();
        let mut fields = Vec::new();

        for (attachment, part) in definition.parts.iter().zip(attached) {
            if part.name == implicit {
                fields = part.fields.into_iter().map(EditPartFieldView::new).collect();
            } else {
                parts.push(EditTypePartView::new(attachment.clone(), part));
            }
        }

        Self {
            name: definition.name.clone(),
            display_name: definition.display_name.clone(),
            settings: definition.settings.clone(),
            parts,
            fields,
            templates: Vec::new(),
            definition,
        }
    }

    /// The definition this view was built from.
    pub fn definition(&self) -> &TypeDefinition {
        &self.definition
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditTypePartView {
    /// Form prefix of this attachment
    pub prefix: String,
    pub settings: Settings,
    pub part_definition: EditPartView,
    pub templates: Vec<TemplateDescriptor>,

    #[serde(skip)]
    definition: TypePartDefinition,
}

impl EditTypePartView {
    pub fn new(attachment: TypePartDefinition, part: PartDefinition) -> Self {
        let mut part_definition = EditPartView::new(part);
        part_definition.prefix = PART_DEFINITION_PREFIX.to_string();
        Self {
            prefix: attachment.part_name.clone(),
            settings: attachment.settings.clone(),
            part_definition,
            templates: Vec::new(),
            definition: attachment,
        }
    }

    pub fn definition(&self) -> &TypePartDefinition {
        &self.definition
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditPartView {
    pub name: String,
    /// Form prefix of this part; empty when edited on its own
    pub prefix: String,
    pub settings: Settings,
    pub fields: Vec<EditPartFieldView>,
    pub templates: Vec<TemplateDescriptor>,

    #[serde(skip)]
    definition: PartDefinition,
}

impl EditPartView {
    pub fn new(part: PartDefinition) -> Self {
        Self {
            name: part.name.clone(),
            prefix: String::new(),
            settings: part.settings.clone(),
            fields: part.fields.iter().cloned().map(EditPartFieldView::new).collect(),
            templates: Vec::new(),
            definition: part,
        }
    }

    pub fn definition(&self) -> &PartDefinition {
        &self.definition
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditPartFieldView {
    pub name: String,
    pub display_name: String,
    pub field_type: String,
    /// Form prefix of this field
    pub prefix: String,
    pub settings: Settings,
    pub templates: Vec<TemplateDescriptor>,

    #[serde(skip)]
    definition: FieldDefinition,
}

impl EditPartFieldView {
    pub fn new(field: FieldDefinition) -> Self {
        Self {
            name: field.name.clone(),
            display_name: field.display_name.clone(),
            field_type: field.field_type.clone(),
            prefix: field.name.clone(),
            settings: field.settings.clone(),
            templates: Vec::new(),
            definition: field,
        }
    }

    pub fn definition(&self) -> &FieldDefinition {
        &self.definition
    }
}
