//! Type, part, and field definitions plus the builders handed to
//! "alter under callback" transactions.
//!
//! Definitions are plain values. They are only ever mutated through a
//! builder inside a store alteration, which commits the builder's result.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Settings key marking a type as creatable from the UI.
pub const CREATABLE_SETTING: &str = "ContentTypeSettings.Creatable";
/// Settings key marking a type as supporting drafts.
pub const DRAFTABLE_SETTING: &str = "ContentTypeSettings.Draftable";
/// Settings key marking a type as created through the definition service.
pub const USER_DEFINED_SETTING: &str = "ContentTypeSettings.UserDefined";
/// Settings key marking a part as attachable to any type.
pub const ATTACHABLE_SETTING: &str = "ContentPartSettings.Attachable";
/// Settings key recording where a field's values are stored.
pub const STORAGE_SETTING: &str = "Storage";

/// A user-visible content schema composed of attached parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// Stable technical name
    pub name: String,

    pub display_name: String,

    #[serde(default, skip_serializing_if = "Settings::is_empty")]
    pub settings: Settings,

    /// Attached parts, in attachment order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<TypePartDefinition>,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            settings: Settings::new(),
            parts: Vec::new(),
        }
    }

    pub fn part(&self, part_name: &str) -> Option<&TypePartDefinition> {
        self.parts.iter().find(|p| p.part_name == part_name)
    }

    pub fn has_part(&self, part_name: &str) -> bool {
        self.part(part_name).is_some()
    }

    pub fn is_creatable(&self) -> bool {
        self.settings.get_bool(CREATABLE_SETTING).unwrap_or(false)
    }

    pub fn is_draftable(&self) -> bool {
        self.settings.get_bool(DRAFTABLE_SETTING).unwrap_or(false)
    }

    pub fn is_user_defined(&self) -> bool {
        self.settings.get_bool(USER_DEFINED_SETTING).unwrap_or(false)
    }
}

/// A part attached to a type, with attachment-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypePartDefinition {
    pub part_name: String,

    #[serde(default, skip_serializing_if = "Settings::is_empty")]
    pub settings: Settings,
}

impl TypePartDefinition {
    pub fn new(part_name: impl Into<String>) -> Self {
        Self {
            part_name: part_name.into(),
            settings: Settings::new(),
        }
    }
}

/// A reusable, named group of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartDefinition {
    pub name: String,

    #[serde(default, skip_serializing_if = "Settings::is_empty")]
    pub settings: Settings,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDefinition>,
}

impl PartDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: Settings::new(),
            fields: Vec::new(),
        }
    }

    /// Look up a field. Field names are unique case-insensitively.
    pub fn field(&self, field_name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(field_name))
    }

    pub fn is_attachable(&self) -> bool {
        self.settings.get_bool(ATTACHABLE_SETTING).unwrap_or(false)
    }
}

/// A single named, typed attribute within a part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,

    pub display_name: String,

    /// Field-type tag resolved by the editor hooks (e.g. "TextField")
    pub field_type: String,

    #[serde(default, skip_serializing_if = "Settings::is_empty")]
    pub settings: Settings,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            field_type: String::new(),
            settings: Settings::new(),
        }
    }
}

// ── Builders ─────────────────────────────────────────────────────────────

/// Mutable view of a type definition inside an alteration.
#[derive(Debug)]
pub struct TypeDefinitionBuilder {
    definition: TypeDefinition,
}

impl TypeDefinitionBuilder {
    pub fn new(definition: TypeDefinition) -> Self {
        Self { definition }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// The definition as altered so far.
    pub fn current(&self) -> &TypeDefinition {
        &self.definition
    }

    pub fn displayed_as(&mut self, display_name: impl Into<String>) -> &mut Self {
        self.definition.display_name = display_name.into();
        self
    }

    pub fn with_setting(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.definition.settings.set(key, value);
        self
    }

    pub fn creatable(&mut self, creatable: bool) -> &mut Self {
        self.definition.settings.set_bool(CREATABLE_SETTING, creatable);
        self
    }

    pub fn draftable(&mut self, draftable: bool) -> &mut Self {
        self.definition.settings.set_bool(DRAFTABLE_SETTING, draftable);
        self
    }

    /// Attach a part unless it is already attached.
    pub fn attach_part(&mut self, part_name: &str) -> &mut Self {
        self.with_part(part_name, |_| ());
        self
    }

    /// Attach a part if needed, then configure the attachment.
    pub fn with_part<R>(&mut self, part_name: &str, configure: impl FnOnce(&mut TypePartBuilder<'_>) -> R) -> R {
        let index = match self.definition.parts.iter().position(|p| p.part_name == part_name) {
            Some(index) => index,
            None => {
                self.definition.parts.push(TypePartDefinition::new(part_name));
                self.definition.parts.len() - 1
            }
        };
        let mut builder = TypePartBuilder {
            part: &mut self.definition.parts[index],
        };
        configure(&mut builder)
    }

    /// Detach a part. Returns `true` if it was attached.
    pub fn remove_part(&mut self, part_name: &str) -> bool {
        let before = self.definition.parts.len();
        self.definition.parts.retain(|p| p.part_name != part_name);
        self.definition.parts.len() < before
    }

    pub fn build(self) -> TypeDefinition {
        self.definition
    }
}

/// Mutable view of one type-part attachment.
#[derive(Debug)]
pub struct TypePartBuilder<'a> {
    part: &'a mut TypePartDefinition,
}

impl TypePartBuilder<'_> {
    pub fn part_name(&self) -> &str {
        &self.part.part_name
    }

    pub fn settings(&self) -> &Settings {
        &self.part.settings
    }

    pub fn with_setting(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.part.settings.set(key, value);
        self
    }
}

/// Mutable view of a part definition inside an alteration.
#[derive(Debug)]
pub struct PartDefinitionBuilder {
    definition: PartDefinition,
}

impl PartDefinitionBuilder {
    pub fn new(definition: PartDefinition) -> Self {
        Self { definition }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn current(&self) -> &PartDefinition {
        &self.definition
    }

    pub fn attachable(&mut self, attachable: bool) -> &mut Self {
        self.definition.settings.set_bool(ATTACHABLE_SETTING, attachable);
        self
    }

    pub fn with_setting(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.definition.settings.set(key, value);
        self
    }

    /// Add the field if missing (matched case-insensitively), then configure it.
    pub fn with_field<R>(&mut self, field_name: &str, configure: impl FnOnce(&mut FieldBuilder<'_>) -> R) -> R {
        let fields = &mut self.definition.fields;
        let index = match fields.iter().position(|f| f.name.eq_ignore_ascii_case(field_name)) {
            Some(index) => index,
            None => {
                fields.push(FieldDefinition::new(field_name));
                fields.len() - 1
            }
        };
        let mut builder = FieldBuilder {
            field: &mut fields[index],
        };
        configure(&mut builder)
    }

    /// Remove a field. Returns `true` if it existed.
    pub fn remove_field(&mut self, field_name: &str) -> bool {
        let before = self.definition.fields.len();
        self.definition.fields.retain(|f| !f.name.eq_ignore_ascii_case(field_name));
        self.definition.fields.len() < before
    }

    pub fn build(self) -> PartDefinition {
        self.definition
    }
}

/// Mutable view of one field inside a part alteration.
#[derive(Debug)]
pub struct FieldBuilder<'a> {
    field: &'a mut FieldDefinition,
}

impl FieldBuilder<'_> {
    pub fn name(&self) -> &str {
        &self.field.name
    }

    pub fn field_type(&self) -> &str {
        &self.field.field_type
    }

    pub fn settings(&self) -> &Settings {
        &self.field.settings
    }

    pub fn of_type(&mut self, field_type: impl Into<String>) -> &mut Self {
        self.field.field_type = field_type.into();
        self
    }

    pub fn with_display_name(&mut self, display_name: impl Into<String>) -> &mut Self {
        self.field.display_name = display_name.into();
        self
    }

    pub fn with_setting(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.field.settings.set(key, value);
        self
    }
}
