//! The definition orchestration service.
//!
//! Sole entry point for listing, inspecting, creating, altering, and
//! deleting type, part, and field definitions. It enforces naming rules,
//! cascades deletions, and drives the editor hooks inside every
//! alteration so hook-written settings commit together with the change.
//!
//! The service holds no definition state: every read goes to the store.

use chrono::Utc;
use contentdef_config::{AppConfig, ValidationPolicy};
use contentdef_core::content::ContentManager;
use contentdef_core::definition::{PartDefinition, TypeDefinition, STORAGE_SETTING, USER_DEFINED_SETTING};
use contentdef_core::editor::{EditorEvents, TemplateDescriptor};
use contentdef_core::error::{Error, Result, StoreError};
use contentdef_core::event::{DefinitionEvent, EventBus};
use contentdef_core::store::DefinitionStore;
use contentdef_core::updater::{UpdateModel, ValidationError};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::naming::{DEFAULT_MAX_NAME_LENGTH, same_field_name, resolve_name, to_part_name, to_safe_name, try_resolve_name};
use crate::updater::{ErrorJournal, Prefix, PrefixedUpdater};
use crate::view::{EditPartView, EditTypeView};

/// Tunables for the service, usually taken from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub validation_policy: ValidationPolicy,
    pub default_creatable: bool,
    pub default_draftable: bool,
    pub max_name_length: usize,
}

impl ServiceOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            validation_policy: config.validation.policy,
            default_creatable: config.defaults.creatable,
            default_draftable: config.defaults.draftable,
            max_name_length: config.naming.max_length,
        }
    }
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            validation_policy: ValidationPolicy::Commit,
            default_creatable: true,
            default_draftable: true,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

/// Result of an alteration that ran editor hooks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterOutcome {
    /// Errors hooks recorded, with fully prefixed keys
    pub errors: Vec<ValidationError>,
}

impl AlterOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct ContentDefinitionService {
    store: Arc<dyn DefinitionStore>,
    editors: Arc<dyn EditorEvents>,
    content: Option<Arc<dyn ContentManager>>,
    events: Option<Arc<EventBus>>,
    options: ServiceOptions,
}

impl ContentDefinitionService {
    pub fn new(store: Arc<dyn DefinitionStore>, editors: Arc<dyn EditorEvents>) -> Self {
        Self {
            store,
            editors,
            content: None,
            events: None,
            options: ServiceOptions::default(),
        }
    }

    /// Content manager used when a type is removed together with its content.
    pub fn with_content_manager(mut self, content: Arc<dyn ContentManager>) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_options(mut self, options: ServiceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }

    fn publish(&self, event: DefinitionEvent) {
        if let Some(events) = &self.events {
            events.publish(event);
        }
    }

    /// Under the reject policy, fail if errors were recorded since `mark`.
    fn check_validation(&self, journal: &ErrorJournal, mark: usize) -> Result<()> {
        if self.options.validation_policy == ValidationPolicy::Reject && journal.len() > mark {
            return Err(Error::ValidationFailed(journal.since(mark)));
        }
        Ok(())
    }

    fn safe_name(&self, text: &str) -> String {
        to_safe_name(text, self.options.max_name_length)
    }

    fn require_type(&self, name: &str) -> Result<TypeDefinition> {
        self.store
            .get_type_definition(name)?
            .ok_or_else(|| StoreError::type_not_found(name).into())
    }

    fn require_part(&self, name: &str) -> Result<PartDefinition> {
        self.store
            .get_part_definition(name)?
            .ok_or_else(|| StoreError::part_not_found(name).into())
    }

    // ── Types ────────────────────────────────────────────────────────────

    /// All types, ordered by display name ignoring case, then name.
    pub fn list_types(&self) -> Result<Vec<TypeDefinition>> {
        let mut types = self.store.list_type_definitions()?;
        types.sort_by(|a, b| {
            a.display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase())
                .then_with(|| a.display_name.cmp(&b.display_name))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(types)
    }

    /// Types created through [`add_type`](Self::add_type), ordered like `list_types`.
    pub fn list_user_defined_types(&self) -> Result<Vec<TypeDefinition>> {
        Ok(self.list_types()?.into_iter().filter(|t| t.is_user_defined()).collect())
    }

    /// The named type with editor templates populated at every level.
    ///
    /// A missing type yields a placeholder (`name = display_name = name`,
    /// no parts) so callers can drive a create flow from it.
    pub fn get_type(&self, name: &str) -> Result<EditTypeView> {
        let definition = self
            .store
            .get_type_definition(name)?
            .unwrap_or_else(|| TypeDefinition::new(name, name));

        let mut attached = Vec::with_capacity(definition.parts.len());
        for part in &definition.parts {
            attached.push(
                self.store
                    .get_part_definition(&part.part_name)?
                    .unwrap_or_else(|| PartDefinition::new(part.part_name.clone())),
            );
        }

        let mut view = EditTypeView::new(definition, attached);
        view.templates = self.editors.type_editor(view.definition());

        for part in view.parts.iter_mut() {
            part.templates = self.editors.type_part_editor(part.definition());
            for field in part.part_definition.fields.iter_mut() {
                field.templates = self.editors.part_field_editor(field.definition());
            }
        }

        for field in view.fields.iter_mut() {
            field.templates = self.editors.part_field_editor(field.definition());
        }

        Ok(view)
    }

    /// Create a type.
    ///
    /// A blank `name` is generated from `display_name`. An explicit name
    /// must start with a letter. Either way the name is versioned until it
    /// no longer collides with an existing type.
    pub fn add_type(&self, name: &str, display_name: &str) -> Result<TypeDefinition> {
        if display_name.trim().is_empty() {
            return Err(Error::InvalidArgument("display name is required".into()));
        }

        let candidate = if name.trim().is_empty() {
            let generated = self.generate_type_name(display_name)?;
            if generated.is_empty() {
                return Err(Error::InvalidArgument(format!(
                    "display name '{display_name}' does not yield a technical name"
                )));
            }
            generated
        } else {
            if !name.chars().next().is_some_and(char::is_alphabetic) {
                return Err(Error::InvalidArgument(format!(
                    "type name '{name}' must start with a letter"
                )));
            }
            name.to_string()
        };

        let name = try_resolve_name(candidate, |n| Ok(self.store.get_type_definition(n)?.is_some()))?;

        let creatable = self.options.default_creatable;
        let draftable = self.options.default_draftable;
        self.store.alter_type_definition(&name, &mut |builder| {
            builder
                .displayed_as(display_name)
                .creatable(creatable)
                .draftable(draftable)
                .with_setting(USER_DEFINED_SETTING, "true");
            Ok(())
        })?;

        info!(type_name = %name, display_name = %display_name, "Added type");
        self.publish(DefinitionEvent::TypeCreated {
            type_name: name.clone(),
            timestamp: Utc::now(),
        });

        self.store
            .get_type_definition(&name)?
            .ok_or_else(|| Error::Internal(format!("type '{name}' missing right after creation")))
    }

    /// Apply an edited type view in one alteration of the type.
    ///
    /// Inside it, every attached part and every field is offered to the
    /// editor hooks with an updater bound to that level's full prefix:
    /// `{part}` for an attachment, `{part}.{part definition}.{field}` for a
    /// part's field, and `{field}` for a field of the implicit part. Parts
    /// with fields are altered in nested transactions.
    ///
    /// Under [`ValidationPolicy::Reject`] the first failing level aborts
    /// itself and every enclosing alteration. Nested part alterations that
    /// already committed stay committed, so errors are checked before each
    /// nested alteration is opened.
    pub fn alter_type(&self, view: &mut EditTypeView, updater: &dyn UpdateModel) -> Result<AlterOutcome> {
        let journal = ErrorJournal::new();
        let root = PrefixedUpdater::new(updater, &journal);
        let type_name = view.name.clone();
        let implicit = to_part_name(&type_name);

        self.store.alter_type_definition(&type_name, &mut |type_builder| {
            let mark = journal.len();
            type_builder.displayed_as(view.display_name.clone());
            view.templates = self.editors.type_editor_update(type_builder, &root);
            self.check_validation(&journal, mark)?;

            for part in view.parts.iter_mut() {
                let part_name = part.part_definition.name.clone();
                let part_updater = root.with_prefix(Prefix::nested([part.prefix.as_str()]));
                part.templates = type_builder.with_part(&part_name, |part_builder| {
                    self.editors.type_part_editor_update(part_builder, &part_updater)
                });
                self.check_validation(&journal, mark)?;

                if part.part_definition.fields.is_empty() {
                    continue;
                }

                let field_root = Prefix::nested([part.prefix.as_str(), part.part_definition.prefix.as_str()]);
                let fields = &mut part.part_definition.fields;
                self.store.alter_part_definition(&part_name, &mut |part_builder| {
                    let mark = journal.len();
                    for field in fields.iter_mut() {
                        let field_updater = root.with_prefix(field_root.then(field.prefix.as_str()));
                        field.templates = part_builder.with_field(&field.name, |field_builder| {
                            self.editors.part_field_editor_update(field_builder, &field_updater)
                        });
                    }
                    self.check_validation(&journal, mark)
                })?;
            }

            if !view.fields.is_empty() {
                let fields = &mut view.fields;
                self.store.alter_part_definition(&implicit, &mut |part_builder| {
                    let mark = journal.len();
                    for field in fields.iter_mut() {
                        let field_updater = root.with_prefix(Prefix::nested([field.prefix.as_str()]));
                        field.templates = part_builder.with_field(&field.name, |field_builder| {
                            self.editors.part_field_editor_update(field_builder, &field_updater)
                        });
                    }
                    self.check_validation(&journal, mark)
                })?;
            }

            self.check_validation(&journal, mark)
        })?;

        let errors = journal.into_errors();
        if errors.is_empty() {
            info!(type_name = %type_name, "Altered type");
        } else {
            warn!(type_name = %type_name, errors = errors.len(), "Altered type with validation errors");
        }
        self.publish(DefinitionEvent::TypeAltered {
            type_name,
            validation_errors: errors.len(),
            timestamp: Utc::now(),
        });
        Ok(AlterOutcome { errors })
    }

    /// Offer one field of a part to the editor hooks, with no key rewriting.
    pub fn alter_field(&self, part_name: &str, field_name: &str, updater: &dyn UpdateModel) -> Result<AlterOutcome> {
        self.require_part(part_name)?;
        let journal = ErrorJournal::new();
        let root = PrefixedUpdater::new(updater, &journal);

        self.store.alter_part_definition(part_name, &mut |part_builder| {
            if part_builder.current().field(field_name).is_none() {
                return Err(StoreError::field_not_found(part_name, field_name).into());
            }
            part_builder.with_field(field_name, |field_builder| {
                self.editors.part_field_editor_update(field_builder, &root)
            });
            self.check_validation(&journal, 0)
        })?;

        debug!(part_name = %part_name, field_name = %field_name, "Altered field");
        Ok(AlterOutcome {
            errors: journal.into_errors(),
        })
    }

    /// Remove a type.
    ///
    /// Every attached part is detached first; the type's own implicit part
    /// is deleted outright, fields first. With `delete_content`, every
    /// content item of the type is removed afterwards (versions are kept).
    pub fn remove_type(&self, name: &str, delete_content: bool) -> Result<()> {
        if delete_content && self.content.is_none() {
            return Err(Error::InvalidArgument(
                "content deletion requested but no content manager is configured".into(),
            ));
        }

        let definition = self.require_type(name)?;
        let implicit = to_part_name(name);

        for attached in &definition.parts {
            self.remove_part_from_type(&attached.part_name, name)?;

            if attached.part_name == implicit {
                match self.remove_part(&implicit) {
                    Err(e) if e.is_not_found() => {
                        warn!(type_name = %name, part_name = %implicit, "Implicit part already gone");
                    }
                    other => other?,
                }
            }
        }

        self.store.delete_type_definition(name)?;
        info!(type_name = %name, "Removed type");

        if delete_content {
            if let Some(content) = &self.content {
                let items = content.query_by_type(name)?;
                for item in &items {
                    content.remove(item)?;
                }
                info!(type_name = %name, items = items.len(), "Removed content items of type");
            }
        }

        self.publish(DefinitionEvent::TypeRemoved {
            type_name: name.to_string(),
            content_deleted: delete_content,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    // ── Parts ────────────────────────────────────────────────────────────

    /// Attach a part to an existing type. Attaching twice is a no-op.
    pub fn add_part_to_type(&self, part_name: &str, type_name: &str) -> Result<()> {
        self.require_type(type_name)?;
        self.store.alter_type_definition(type_name, &mut |builder| {
            builder.attach_part(part_name);
            Ok(())
        })?;

        info!(part_name = %part_name, type_name = %type_name, "Attached part");
        self.publish(DefinitionEvent::PartAttached {
            part_name: part_name.to_string(),
            type_name: type_name.to_string(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Detach a part from an existing type. The part definition stays.
    pub fn remove_part_from_type(&self, part_name: &str, type_name: &str) -> Result<()> {
        self.require_type(type_name)?;
        let mut detached = false;
        self.store.alter_type_definition(type_name, &mut |builder| {
            detached = builder.remove_part(part_name);
            Ok(())
        })?;

        if detached {
            info!(part_name = %part_name, type_name = %type_name, "Detached part");
            self.publish(DefinitionEvent::PartDetached {
                part_name: part_name.to_string(),
                type_name: type_name.to_string(),
                timestamp: Utc::now(),
            });
        } else {
            debug!(part_name = %part_name, type_name = %type_name, "Part was not attached");
        }
        Ok(())
    }

    /// All parts, ordered by name.
    pub fn list_parts(&self) -> Result<Vec<PartDefinition>> {
        let mut parts = self.store.list_part_definitions()?;
        parts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(parts)
    }

    /// The named part with editor templates, or `None` if it does not exist.
    pub fn get_part(&self, name: &str) -> Result<Option<EditPartView>> {
        let Some(definition) = self.store.get_part_definition(name)? else {
            return Ok(None);
        };
        let mut view = EditPartView::new(definition);
        view.templates = self.editors.part_editor(view.definition());
        Ok(Some(view))
    }

    /// Create an attachable part.
    ///
    /// Fails if the part exists. An empty name creates nothing and
    /// returns `None`.
    pub fn add_part(&self, name: &str) -> Result<Option<EditPartView>> {
        if self.store.get_part_definition(name)?.is_some() {
            return Err(Error::AlreadyExists(format!(
                "cannot add part named '{name}', it already exists"
            )));
        }

        if name.is_empty() {
            return Ok(None);
        }

        self.store.alter_part_definition(name, &mut |builder| {
            builder.attachable(true);
            Ok(())
        })?;

        info!(part_name = %name, "Added part");
        self.publish(DefinitionEvent::PartCreated {
            part_name: name.to_string(),
            timestamp: Utc::now(),
        });

        Ok(Some(EditPartView::new(self.require_part(name)?)))
    }

    /// Apply an edited part view, offering the part to the editor hooks.
    ///
    /// The part must already exist; alterations never create it.
    pub fn alter_part(&self, view: &mut EditPartView, updater: &dyn UpdateModel) -> Result<AlterOutcome> {
        let part_name = view.name.clone();
        self.require_part(&part_name)?;
        let journal = ErrorJournal::new();
        let root = PrefixedUpdater::new(updater, &journal);

        self.store.alter_part_definition(&part_name, &mut |builder| {
            view.templates = self.editors.part_editor_update(builder, &root);
            self.check_validation(&journal, 0)
        })?;

        info!(part_name = %part_name, "Altered part");
        self.publish(DefinitionEvent::PartAltered {
            part_name,
            timestamp: Utc::now(),
        });
        Ok(AlterOutcome {
            errors: journal.into_errors(),
        })
    }

    /// Remove a part: every field in its own alteration, then the part.
    pub fn remove_part(&self, name: &str) -> Result<()> {
        let definition = self.require_part(name)?;
        for field in &definition.fields {
            self.remove_field_from_part(&field.name, name)?;
        }

        self.store.delete_part_definition(name)?;
        info!(part_name = %name, "Removed part");
        self.publish(DefinitionEvent::PartRemoved {
            part_name: name.to_string(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    // ── Fields ───────────────────────────────────────────────────────────

    /// Field types the editor hooks can install.
    pub fn field_type_catalog(&self) -> Vec<TemplateDescriptor> {
        self.editors.field_type_descriptors()
    }

    /// Add a field to a part, creating the part if needed.
    ///
    /// The field name is safe-named first; returns the stored name.
    pub fn add_field_to_part(&self, field_name: &str, display_name: &str, field_type: &str, part_name: &str) -> Result<String> {
        let name = self.safe_name(field_name);
        if name.is_empty() {
            return Err(Error::InvalidName(
                "fields must have a name containing no spaces or symbols".into(),
            ));
        }

        self.store.alter_part_definition(part_name, &mut |builder| {
            builder.with_field(&name, |field| {
                field
                    .of_type(field_type)
                    .with_display_name(display_name)
                    .with_setting(STORAGE_SETTING, "Part");
            });
            Ok(())
        })?;

        info!(part_name = %part_name, field_name = %name, field_type = %field_type, "Added field");
        self.publish(DefinitionEvent::FieldAdded {
            part_name: part_name.to_string(),
            field_name: name.clone(),
            field_type: field_type.to_string(),
            timestamp: Utc::now(),
        });
        Ok(name)
    }

    /// [`add_field_to_part`](Self::add_field_to_part) using the field name as display name.
    pub fn add_field_to_part_named(&self, field_name: &str, field_type: &str, part_name: &str) -> Result<String> {
        self.add_field_to_part(field_name, field_name, field_type, part_name)
    }

    /// Remove a field from an existing part. Removing a missing field is a no-op.
    pub fn remove_field_from_part(&self, field_name: &str, part_name: &str) -> Result<()> {
        self.require_part(part_name)?;
        let mut removed = false;
        self.store.alter_part_definition(part_name, &mut |builder| {
            removed = builder.remove_field(field_name);
            Ok(())
        })?;

        if removed {
            info!(part_name = %part_name, field_name = %field_name, "Removed field");
            self.publish(DefinitionEvent::FieldRemoved {
                part_name: part_name.to_string(),
                field_name: field_name.to_string(),
                timestamp: Utc::now(),
            });
        } else {
            debug!(part_name = %part_name, field_name = %field_name, "Field was not present");
        }
        Ok(())
    }

    // ── Name generation ──────────────────────────────────────────────────

    /// A free type name derived from a display name.
    pub fn generate_type_name(&self, display_name: &str) -> Result<String> {
        try_resolve_name(self.safe_name(display_name), |n| {
            Ok(self.store.get_type_definition(n)?.is_some())
        })
    }

    /// A field name derived from a display name, free within `container`.
    ///
    /// `container` is looked up as a part, then as a type (whose implicit
    /// part holds its fields). A type without an implicit part returns the
    /// safe name as is, without a collision check.
    pub fn generate_field_name(&self, container: &str, display_name: &str) -> Result<String> {
        let name = self.safe_name(display_name);

        let fields = match self.store.get_part_definition(container)? {
            Some(part) => part.fields,
            None => {
                let Some(definition) = self.store.get_type_definition(container)? else {
                    return Err(Error::InvalidArgument(format!(
                        "no part or type named '{container}'"
                    )));
                };

                let implicit = to_part_name(container);
                if !definition.has_part(&implicit) {
                    return Ok(name);
                }
                self.store
                    .get_part_definition(&implicit)?
                    .map(|p| p.fields)
                    .unwrap_or_default()
            }
        };

        Ok(resolve_name(name, |candidate| {
            fields.iter().any(|f| same_field_name(&f.name, candidate))
        }))
    }
}
