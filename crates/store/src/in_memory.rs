//! In-memory definition store: useful for testing and ephemeral sessions.

use contentdef_core::definition::{PartDefinition, PartDefinitionBuilder, TypeDefinition, TypeDefinitionBuilder};
use contentdef_core::error::{DefinitionKind, Result, StoreError};
use contentdef_core::store::{DefinitionStore, PartAlteration, TypeAlteration};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Every definition a store holds, as persisted by the file backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefinitionSnapshot {
    #[serde(default)]
    pub types: Vec<TypeDefinition>,

    #[serde(default)]
    pub parts: Vec<PartDefinition>,
}

#[derive(Debug, Default)]
struct DefinitionState {
    types: BTreeMap<String, TypeDefinition>,
    parts: BTreeMap<String, PartDefinition>,
    /// Bumped on every part deletion
    generation: u64,
    /// Deleted part names and the generation they were deleted at
    deleted_parts: HashMap<String, u64>,
}

impl DefinitionState {
    /// Whether `part_name` was deleted after generation `since`.
    fn deleted_since(&self, part_name: &str, since: u64) -> bool {
        !self.parts.contains_key(part_name) && self.deleted_parts.get(part_name).is_some_and(|&g| g > since)
    }
}

/// An in-memory store keyed by definition name.
///
/// Each type or part name has its own writer lock, held for the whole
/// alteration callback. The shared maps are only locked while reading the
/// starting definition and while committing, so a callback can open an
/// alteration on a different name.
///
/// Deleting a part detaches it from every stored type in the same commit.
/// A type alteration that was already running when the part was deleted
/// drops the attachment at commit instead of re-creating the part.
pub struct InMemoryDefinitionStore {
    state: RwLock<DefinitionState>,
    writers: Mutex<HashMap<(DefinitionKind, String), Arc<Mutex<()>>>>,
}

impl InMemoryDefinitionStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(DefinitionState::default()),
            writers: Mutex::new(HashMap::new()),
        }
    }

    /// Build a store pre-populated with the given definitions.
    pub fn from_snapshot(snapshot: DefinitionSnapshot) -> Self {
        let store = Self::new();
        if let Ok(mut state) = store.state.write() {
            state.types = snapshot.types.into_iter().map(|t| (t.name.clone(), t)).collect();
            state.parts = snapshot.parts.into_iter().map(|p| (p.name.clone(), p)).collect();
        }
        store
    }

    /// A copy of every definition, ordered by name.
    pub fn snapshot(&self) -> std::result::Result<DefinitionSnapshot, StoreError> {
        let state = self.read()?;
        Ok(DefinitionSnapshot {
            types: state.types.values().cloned().collect(),
            parts: state.parts.values().cloned().collect(),
        })
    }

    fn read(&self) -> std::result::Result<RwLockReadGuard<'_, DefinitionState>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Storage("definition state lock poisoned".into()))
    }

    fn write(&self) -> std::result::Result<RwLockWriteGuard<'_, DefinitionState>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Storage("definition state lock poisoned".into()))
    }

    /// The writer lock for one definition name.
    fn writer(&self, kind: DefinitionKind, name: &str) -> std::result::Result<Arc<Mutex<()>>, StoreError> {
        let mut writers = self
            .writers
            .lock()
            .map_err(|_| StoreError::Storage("writer table lock poisoned".into()))?;
        Ok(writers.entry((kind, name.to_string())).or_default().clone())
    }
}

impl Default for InMemoryDefinitionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned(kind: DefinitionKind, name: &str) -> StoreError {
    StoreError::Storage(format!("writer lock for {kind} '{name}' poisoned"))
}

impl DefinitionStore for InMemoryDefinitionStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn get_type_definition(&self, name: &str) -> std::result::Result<Option<TypeDefinition>, StoreError> {
        Ok(self.read()?.types.get(name).cloned())
    }

    fn get_part_definition(&self, name: &str) -> std::result::Result<Option<PartDefinition>, StoreError> {
        Ok(self.read()?.parts.get(name).cloned())
    }

    fn list_type_definitions(&self) -> std::result::Result<Vec<TypeDefinition>, StoreError> {
        Ok(self.read()?.types.values().cloned().collect())
    }

    fn list_part_definitions(&self) -> std::result::Result<Vec<PartDefinition>, StoreError> {
        Ok(self.read()?.parts.values().cloned().collect())
    }

    fn store_type_definition(&self, definition: TypeDefinition) -> std::result::Result<(), StoreError> {
        let writer = self.writer(DefinitionKind::Type, &definition.name)?;
        let _guard = writer.lock().map_err(|_| poisoned(DefinitionKind::Type, &definition.name))?;
        debug!(type_name = %definition.name, "Storing type definition");
        self.write()?.types.insert(definition.name.clone(), definition);
        Ok(())
    }

    fn delete_type_definition(&self, name: &str) -> std::result::Result<(), StoreError> {
        let writer = self.writer(DefinitionKind::Type, name)?;
        let _guard = writer.lock().map_err(|_| poisoned(DefinitionKind::Type, name))?;
        match self.write()?.types.remove(name) {
            Some(_) => {
                debug!(type_name = %name, "Deleted type definition");
                Ok(())
            }
            None => Err(StoreError::type_not_found(name)),
        }
    }

    fn delete_part_definition(&self, name: &str) -> std::result::Result<(), StoreError> {
        let writer = self.writer(DefinitionKind::Part, name)?;
        let _guard = writer.lock().map_err(|_| poisoned(DefinitionKind::Part, name))?;
        let mut state = self.write()?;
        if state.parts.remove(name).is_none() {
            return Err(StoreError::part_not_found(name));
        }
        state.generation += 1;
        let generation = state.generation;
        state.deleted_parts.insert(name.to_string(), generation);
        for definition in state.types.values_mut() {
            let before = definition.parts.len();
            definition.parts.retain(|p| p.part_name != name);
            if definition.parts.len() < before {
                debug!(part_name = %name, type_name = %definition.name, "Detached deleted part");
            }
        }
        debug!(part_name = %name, "Deleted part definition");
        Ok(())
    }

    fn alter_type_definition(&self, name: &str, alteration: &mut TypeAlteration<'_>) -> Result<()> {
        let writer = self.writer(DefinitionKind::Type, name)?;
        let _guard = writer.lock().map_err(|_| poisoned(DefinitionKind::Type, name))?;

        let (current, started_at) = {
            let state = self.read()?;
            let current = state
                .types
                .get(name)
                .cloned()
                .unwrap_or_else(|| TypeDefinition::new(name, name));
            (current, state.generation)
        };
        let mut builder = TypeDefinitionBuilder::new(current);
        alteration(&mut builder)?;
        let mut definition = builder.build();

        let mut state = self.write()?;
        definition.parts.retain(|attached| {
            let deleted = state.deleted_since(&attached.part_name, started_at);
            if deleted {
                debug!(part_name = %attached.part_name, type_name = %name, "Dropped attachment to part deleted during alteration");
            }
            !deleted
        });
        // Every attached part resolves to a definition
        for attached in &definition.parts {
            if !state.parts.contains_key(&attached.part_name) {
                state.deleted_parts.remove(&attached.part_name);
                state
                    .parts
                    .insert(attached.part_name.clone(), PartDefinition::new(attached.part_name.clone()));
            }
        }
        state.types.insert(name.to_string(), definition);
        debug!(type_name = %name, "Committed type alteration");
        Ok(())
    }

    fn alter_part_definition(&self, name: &str, alteration: &mut PartAlteration<'_>) -> Result<()> {
        let writer = self.writer(DefinitionKind::Part, name)?;
        let _guard = writer.lock().map_err(|_| poisoned(DefinitionKind::Part, name))?;

        let current = self
            .read()?
            .parts
            .get(name)
            .cloned()
            .unwrap_or_else(|| PartDefinition::new(name));
        let mut builder = PartDefinitionBuilder::new(current);
        alteration(&mut builder)?;
        let definition = builder.build();

        let mut state = self.write()?;
        state.deleted_parts.remove(name);
        state.parts.insert(name.to_string(), definition);
        debug!(part_name = %name, "Committed part alteration");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentdef_core::error::Error;

    #[test]
    fn store_and_retrieve_type() {
        let store = InMemoryDefinitionStore::new();
        store.store_type_definition(TypeDefinition::new("order", "Order")).unwrap();

        let def = store.get_type_definition("order").unwrap().unwrap();
        assert_eq!(def.display_name, "Order");
        assert!(store.get_type_definition("missing").unwrap().is_none());
    }

    #[test]
    fn alter_creates_missing_type_and_attached_parts() {
        let store = InMemoryDefinitionStore::new();
        store
            .alter_type_definition("order", &mut |b| {
                b.attach_part("TitlePart");
                Ok(())
            })
            .unwrap();

        let def = store.get_type_definition("order").unwrap().unwrap();
        assert_eq!(def.display_name, "order");
        assert!(def.has_part("TitlePart"));
        assert!(store.get_part_definition("TitlePart").unwrap().is_some());
    }

    #[test]
    fn failed_callback_commits_nothing() {
        let store = InMemoryDefinitionStore::new();
        store.store_type_definition(TypeDefinition::new("order", "Order")).unwrap();

        let result = store.alter_type_definition("order", &mut |b| {
            b.displayed_as("Changed");
            Err(Error::InvalidArgument("nope".into()))
        });
        assert!(result.is_err());
        assert_eq!(store.get_type_definition("order").unwrap().unwrap().display_name, "Order");
    }

    #[test]
    fn nested_alteration_of_other_name() {
        let store = InMemoryDefinitionStore::new();
        store
            .alter_type_definition("order", &mut |tb| {
                tb.attach_part("orderPart");
                store.alter_part_definition("orderPart", &mut |pb| {
                    pb.with_field("total", |f| {
                        f.of_type("TextField");
                    });
                    Ok(())
                })
            })
            .unwrap();

        let part = store.get_part_definition("orderPart").unwrap().unwrap();
        assert_eq!(part.fields.len(), 1);
    }

    #[test]
    fn delete_missing_definitions_fails() {
        let store = InMemoryDefinitionStore::new();
        let err = store.delete_type_definition("order").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: DefinitionKind::Type, .. }));
        let err = store.delete_part_definition("orderPart").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: DefinitionKind::Part, .. }));
    }

    #[test]
    fn deleting_part_detaches_it_everywhere() {
        let store = InMemoryDefinitionStore::new();
        for type_name in ["order", "invoice"] {
            store
                .alter_type_definition(type_name, &mut |b| {
                    b.attach_part("AddressPart");
                    Ok(())
                })
                .unwrap();
        }

        store.delete_part_definition("AddressPart").unwrap();
        for def in store.list_type_definitions().unwrap() {
            assert!(!def.has_part("AddressPart"));
        }
        assert!(store.list_part_definitions().unwrap().is_empty());
    }

    fn attach(store: &InMemoryDefinitionStore, type_name: &str, part_name: &str) {
        store
            .alter_type_definition(type_name, &mut |b| {
                b.attach_part(part_name);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn part_deleted_during_type_alteration_stays_deleted() {
        let store = InMemoryDefinitionStore::new();
        attach(&store, "order", "AddressPart");

        store
            .alter_type_definition("order", &mut |b| {
                assert!(b.current().has_part("AddressPart"));
                store.delete_part_definition("AddressPart")?;
                b.displayed_as("Order");
                Ok(())
            })
            .unwrap();

        let def = store.get_type_definition("order").unwrap().unwrap();
        assert_eq!(def.display_name, "Order");
        assert!(def.parts.is_empty());
        assert!(store.get_part_definition("AddressPart").unwrap().is_none());
    }

    #[test]
    fn deleted_part_can_be_attached_again_later() {
        let store = InMemoryDefinitionStore::new();
        attach(&store, "order", "AddressPart");
        store.delete_part_definition("AddressPart").unwrap();

        attach(&store, "invoice", "AddressPart");
        assert!(store.get_type_definition("invoice").unwrap().unwrap().has_part("AddressPart"));
        assert!(store.get_part_definition("AddressPart").unwrap().is_some());
    }

    #[test]
    fn alterations_of_one_name_do_not_interleave() {
        let store = InMemoryDefinitionStore::new();
        store.store_type_definition(TypeDefinition::new("order", "Order")).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    store
                        .alter_type_definition("order", &mut |b| {
                            let seen = b.current().settings.get_i64("Revision").unwrap_or(0);
                            std::thread::sleep(std::time::Duration::from_millis(5));
                            b.with_setting("Revision", (seen + 1).to_string());
                            Ok(())
                        })
                        .unwrap();
                });
            }
        });

        let def = store.get_type_definition("order").unwrap().unwrap();
        assert_eq!(def.settings.get_i64("Revision"), Some(8));
    }

    #[test]
    fn concurrent_part_delete_is_not_undone_by_type_commit() {
        let store = InMemoryDefinitionStore::new();
        attach(&store, "order", "AddressPart");
        let (started_tx, started_rx) = std::sync::mpsc::channel();
        let (deleted_tx, deleted_rx) = std::sync::mpsc::channel::<()>();

        let store = &store;
        std::thread::scope(|scope| {
            scope.spawn(move || {
                store
                    .alter_type_definition("order", &mut |b| {
                        started_tx.send(()).unwrap();
                        deleted_rx.recv().unwrap();
                        b.attach_part("TitlePart");
                        Ok(())
                    })
                    .unwrap();
            });

            started_rx.recv().unwrap();
            store.delete_part_definition("AddressPart").unwrap();
            deleted_tx.send(()).unwrap();
        });

        let def = store.get_type_definition("order").unwrap().unwrap();
        let parts: Vec<_> = def.parts.iter().map(|p| p.part_name.as_str()).collect();
        assert_eq!(parts, vec!["TitlePart"]);
        assert!(store.get_part_definition("AddressPart").unwrap().is_none());
    }

    #[test]
    fn snapshot_round_trip() {
        let store = InMemoryDefinitionStore::new();
        store
            .alter_type_definition("order", &mut |b| {
                b.attach_part("orderPart");
                Ok(())
            })
            .unwrap();

        let snapshot = store.snapshot().unwrap();
        let restored = InMemoryDefinitionStore::from_snapshot(snapshot.clone());
        assert_eq!(restored.snapshot().unwrap(), snapshot);
    }
}
