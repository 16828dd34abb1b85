//! End-to-end tests for the contentdef schema engine.
//!
//! These exercise the service together with the real stores, the built-in
//! editor hooks, and config loading, the way the CLI wires them.

use std::sync::{Arc, Mutex};

use contentdef_config::{AppConfig, ValidationPolicy};
use contentdef_core::content::{ContentItem, ContentManager};
use contentdef_core::error::{ContentError, Error};
use contentdef_core::event::{DefinitionEvent, EventBus};
use contentdef_core::store::DefinitionStore;
use contentdef_editors::default_registry;
use contentdef_service::{ContentDefinitionService, FormUpdater, ServiceOptions};
use contentdef_store::{FileDefinitionStore, InMemoryContentManager, InMemoryDefinitionStore};

// ── Helpers ──────────────────────────────────────────────────────────────

/// Content manager that records every call it receives.
#[derive(Default)]
struct RecordingContentManager {
    items: Vec<ContentItem>,
    calls: Mutex<Vec<String>>,
}

impl RecordingContentManager {
    fn with_items(items: Vec<ContentItem>) -> Self {
        Self {
            items,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ContentManager for RecordingContentManager {
    fn query_by_type(&self, content_type: &str) -> Result<Vec<ContentItem>, ContentError> {
        self.calls.lock().unwrap().push(format!("query {content_type}"));
        Ok(self
            .items
            .iter()
            .filter(|i| i.content_type == content_type)
            .cloned()
            .collect())
    }

    fn remove(&self, item: &ContentItem) -> Result<(), ContentError> {
        self.calls.lock().unwrap().push(format!("remove {}", item.id));
        Ok(())
    }
}

fn memory_service() -> (Arc<InMemoryDefinitionStore>, ContentDefinitionService) {
    let store = Arc::new(InMemoryDefinitionStore::new());
    let service = ContentDefinitionService::new(store.clone(), Arc::new(default_registry()));
    (store, service)
}

/// `Order` owning `OrderPart` with a text and a date field.
fn seed_order(service: &ContentDefinitionService) {
    service.add_type("Order", "Order").unwrap();
    service.add_field_to_part("Title", "Title", "TextField", "OrderPart").unwrap();
    service.add_field_to_part("due date", "Due date", "DateField", "OrderPart").unwrap();
    service.add_part_to_type("OrderPart", "Order").unwrap();
}

/// `Person` with the shared part `Contact` holding a phone field.
fn seed_person(service: &ContentDefinitionService) {
    service.add_type("Person", "Person").unwrap();
    service.add_part("Contact").unwrap();
    service.add_field_to_part("Phone", "Phone", "PhoneField", "Contact").unwrap();
    service.add_part_to_type("Contact", "Person").unwrap();
}

// ── E2E: Naming ──────────────────────────────────────────────────────────

#[test]
fn e2e_generated_type_names_never_collide() {
    let (store, service) = memory_service();

    let mut names = Vec::new();
    for display in ["Blog Post", "blog post", "BLOG-POST", "Blog  Post!"] {
        let generated = service.generate_type_name(display).unwrap();
        assert!(store.get_type_definition(&generated).unwrap().is_none());
        names.push(service.add_type(&generated, display).unwrap().name);
    }

    assert_eq!(names, vec!["blogpost", "blogpost_2", "blogpost_3", "blogpost_4"]);
}

#[test]
fn e2e_explicit_names_are_versioned() {
    let (_, service) = memory_service();
    assert_eq!(service.add_type("Customer", "Customer").unwrap().name, "Customer");
    assert_eq!(service.add_type("Customer", "Customer").unwrap().name, "Customer_2");
    assert_eq!(service.add_type("Customer_2", "Customer").unwrap().name, "Customer_3");
    assert_eq!(service.add_type("Item_0", "Item").unwrap().name, "Item_0");
    assert_eq!(service.add_type("Item_0", "Item").unwrap().name, "Item_2");
}

// ── E2E: Cascading deletion ──────────────────────────────────────────────

#[test]
fn e2e_remove_type_without_content() {
    let (store, service) = memory_service();
    let content = Arc::new(RecordingContentManager::with_items(vec![ContentItem::new("Order")]));
    let service = service.with_content_manager(content.clone());
    seed_order(&service);

    service.remove_type("Order", false).unwrap();

    assert!(store.get_type_definition("Order").unwrap().is_none());
    assert!(store.get_part_definition("OrderPart").unwrap().is_none());
    assert!(content.calls().is_empty());
}

#[test]
fn e2e_remove_type_with_content() {
    let (_, service) = memory_service();
    let order_a = ContentItem::new("Order");
    let order_b = ContentItem::new("Order");
    let invoice = ContentItem::new("Invoice");
    let content = Arc::new(RecordingContentManager::with_items(vec![
        order_a.clone(),
        invoice.clone(),
        order_b.clone(),
    ]));
    let service = service.with_content_manager(content.clone());
    seed_order(&service);

    service.remove_type("Order", true).unwrap();

    assert_eq!(
        content.calls(),
        vec![
            "query Order".to_string(),
            format!("remove {}", order_a.id),
            format!("remove {}", order_b.id),
        ]
    );
}

#[test]
fn e2e_shared_parts_survive_type_removal() {
    let (store, service) = memory_service();
    seed_person(&service);
    service.add_type("Company", "Company").unwrap();
    service.add_part_to_type("Contact", "Company").unwrap();

    service.remove_type("Person", false).unwrap();

    let contact = store.get_part_definition("Contact").unwrap().unwrap();
    assert_eq!(contact.fields.len(), 1);
    assert!(store.get_type_definition("Company").unwrap().unwrap().has_part("Contact"));
}

// ── E2E: Fields and parts ────────────────────────────────────────────────

#[test]
fn e2e_field_names_are_safe_named() {
    let (store, service) = memory_service();
    seed_order(&service);

    let part = store.get_part_definition("OrderPart").unwrap().unwrap();
    let names: Vec<_> = part.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["title", "duedate"]);

    let err = service
        .add_field_to_part("%%%", "Symbols", "TextField", "OrderPart")
        .unwrap_err();
    assert!(matches!(err, Error::InvalidName(_)));
}

#[test]
fn e2e_add_part_twice() {
    let (store, service) = memory_service();
    service.add_part("Address").unwrap();
    let err = service.add_part("Address").unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));
    assert_eq!(store.list_part_definitions().unwrap().len(), 1);
}

#[test]
fn e2e_field_name_suggestions() {
    let (_, service) = memory_service();
    seed_order(&service);
    seed_person(&service);

    assert_eq!(service.generate_field_name("Order", "Title").unwrap(), "title_2");
    assert_eq!(service.generate_field_name("Contact", "phone").unwrap(), "phone_2");
    assert_eq!(service.generate_field_name("Contact", "Email").unwrap(), "email");
    // Person has no implicit part, so no collision check happens.
    assert_eq!(service.generate_field_name("Person", "Phone").unwrap(), "phone");
}

#[test]
fn e2e_field_type_catalog() {
    let (_, service) = memory_service();
    let kinds: Vec<_> = service
        .field_type_catalog()
        .into_iter()
        .map(|t| t.template_name)
        .collect();
    assert_eq!(kinds, vec!["TextField", "PhoneField", "DateField", "SelectField"]);
}

// ── E2E: Hooks inside alterations ────────────────────────────────────────

#[test]
fn e2e_hook_errors_route_to_full_prefix() {
    let (store, service) = memory_service();
    seed_person(&service);

    let mut view = service.get_type("Person").unwrap();
    view.parts[0].part_definition.prefix = "ContactPart".into();
    let form = FormUpdater::new()
        .with_value("Contact.ContactPart.phone.PhoneFieldSettings.Required", "often");

    let outcome = service.alter_type(&mut view, &form).unwrap();

    let keys: Vec<_> = outcome.errors.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["Contact.ContactPart.phone.PhoneFieldSettings.Required"]);
    let contact = store.get_part_definition("Contact").unwrap().unwrap();
    assert!(contact.field("phone").unwrap().settings.get("PhoneFieldSettings.Required").is_none());
}

#[test]
fn e2e_alter_type_commits_hook_settings() {
    let (store, service) = memory_service();
    seed_order(&service);
    seed_person(&service);

    let form: FormUpdater = [
        ("ContentTypeSettings.Draftable", "false"),
        ("duedate.DateFieldSettings.DefaultValue", "2030-01-01"),
        ("title.TextFieldSettings.MaxLength", "120"),
    ]
    .into_iter()
    .collect();
    let mut order = service.get_type("Order").unwrap();
    order.display_name = "Purchase order".into();
    assert!(service.alter_type(&mut order, &form).unwrap().is_valid());

    let definition = store.get_type_definition("Order").unwrap().unwrap();
    assert_eq!(definition.display_name, "Purchase order");
    assert!(!definition.is_draftable());
    assert!(definition.is_creatable());

    let own = store.get_part_definition("OrderPart").unwrap().unwrap();
    assert_eq!(own.field("duedate").unwrap().settings.get("DateFieldSettings.DefaultValue"), Some("2030-01-01"));
    assert_eq!(own.field("title").unwrap().settings.get("TextFieldSettings.MaxLength"), Some("120"));

    let form = FormUpdater::new().with_value("Contact.PartDefinition.phone.PhoneFieldSettings.Required", "true");
    let mut person = service.get_type("Person").unwrap();
    assert!(service.alter_type(&mut person, &form).unwrap().is_valid());
    let contact = store.get_part_definition("Contact").unwrap().unwrap();
    assert_eq!(contact.field("phone").unwrap().settings.get_bool("PhoneFieldSettings.Required"), Some(true));
}

#[test]
fn e2e_reject_policy_keeps_store_unchanged() {
    let (store, service) = memory_service();
    let service = service.with_options(ServiceOptions {
        validation_policy: ValidationPolicy::Reject,
        ..ServiceOptions::default()
    });
    service.add_type("Ticket", "Ticket").unwrap();
    service.add_field_to_part("Status", "Status", "SelectField", "TicketPart").unwrap();
    service.add_part_to_type("TicketPart", "Ticket").unwrap();
    let before = store.snapshot().unwrap();

    let form: FormUpdater = [
        ("ContentTypeSettings.Creatable", "false"),
        ("status.SelectFieldSettings.Labels", "Open;Closed"),
        ("status.SelectFieldSettings.SelectCount", "5"),
    ]
    .into_iter()
    .collect();
    let mut view = service.get_type("Ticket").unwrap();

    match service.alter_type(&mut view, &form) {
        Err(Error::ValidationFailed(errors)) => {
            assert_eq!(errors[0].key, "status.SelectFieldSettings.SelectCount");
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
    assert_eq!(store.snapshot().unwrap(), before);
}

#[test]
fn e2e_get_type_is_idempotent() {
    let (_, service) = memory_service();
    seed_order(&service);
    seed_person(&service);

    for name in ["Order", "Person"] {
        let first = service.get_type(name).unwrap();
        let second = service.get_type(name).unwrap();
        assert_eq!(first.definition(), second.definition());
        assert_eq!(first.fields, second.fields);
        assert_eq!(first.parts, second.parts);
    }
}

// ── E2E: Persistence and config ──────────────────────────────────────────

#[test]
fn e2e_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("defs").join("definitions.json");

    {
        let store = Arc::new(FileDefinitionStore::open(&path).unwrap());
        let service = ContentDefinitionService::new(store, Arc::new(default_registry()));
        seed_order(&service);
        let form = FormUpdater::new().with_value("title.TextFieldSettings.Required", "true");
        let mut view = service.get_type("Order").unwrap();
        service.alter_type(&mut view, &form).unwrap();
    }

    let store = Arc::new(FileDefinitionStore::open(&path).unwrap());
    let service = ContentDefinitionService::new(store, Arc::new(default_registry()));
    let view = service.get_type("Order").unwrap();
    assert_eq!(view.fields.len(), 2);
    let title = view.fields.iter().find(|f| f.name == "title").unwrap();
    assert_eq!(title.settings.get("TextFieldSettings.Required"), Some("true"));
    assert_eq!(title.templates.len(), 1);
}

#[test]
fn e2e_config_drives_service_options() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[defaults]\ncreatable = false\n\n[validation]\npolicy = \"reject\"\n\n[naming]\nmax_length = 6\n",
    )
    .unwrap();

    let config = AppConfig::load_from(&path).unwrap();
    let (_, service) = memory_service();
    let service = service.with_options(ServiceOptions::from_config(&config));

    let definition = service.add_type("", "Newsletter").unwrap();
    assert_eq!(definition.name, "newsle");
    assert!(!definition.is_creatable());
    assert!(definition.is_draftable());
    assert_eq!(service.options().validation_policy, ValidationPolicy::Reject);
}

#[test]
fn e2e_content_items_keep_versions_after_removal() {
    let (_, service) = memory_service();
    let content = Arc::new(InMemoryContentManager::new());
    content.create("Order").unwrap();
    let service = service.with_content_manager(content.clone());
    seed_order(&service);

    service.remove_type("Order", true).unwrap();

    let items = content.all_items();
    assert_eq!(items.len(), 1);
    assert!(items[0].is_removed());
    assert_eq!(items[0].versions, vec![1]);
}

// ── E2E: Events ──────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_events_follow_the_cascade() {
    let (_, service) = memory_service();
    let bus = Arc::new(EventBus::default());
    let mut rx = bus.subscribe();
    let service = service.with_event_bus(bus);
    seed_order(&service);

    service.remove_type("Order", false).unwrap();

    let mut kinds = Vec::new();
    while let Ok(event) = rx.try_recv() {
        kinds.push(match event.as_ref() {
            DefinitionEvent::TypeCreated { .. } => "type_created",
            DefinitionEvent::FieldAdded { .. } => "field_added",
            DefinitionEvent::PartAttached { .. } => "part_attached",
            DefinitionEvent::PartDetached { .. } => "part_detached",
            DefinitionEvent::FieldRemoved { .. } => "field_removed",
            DefinitionEvent::PartRemoved { .. } => "part_removed",
            DefinitionEvent::TypeRemoved { .. } => "type_removed",
            _ => "other",
        });
    }

    assert_eq!(
        kinds,
        vec![
            "type_created",
            "field_added",
            "field_added",
            "part_attached",
            "part_detached",
            "field_removed",
            "field_removed",
            "part_removed",
            "type_removed",
        ]
    );
}
