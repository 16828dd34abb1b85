//! File-based definition store: persistent JSON storage.
//!
//! Definitions are loaded into memory on open and the whole set is written
//! back to disk after every committed mutation (store, alter, delete). This
//! gives fast reads with durable writes and a human-inspectable file.
//!
//! Storage location: `~/.contentdef/definitions.json` by default.

use contentdef_core::definition::{PartDefinition, TypeDefinition};
use contentdef_core::error::{Result, StoreError};
use contentdef_core::store::{DefinitionStore, PartAlteration, TypeAlteration};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

use crate::in_memory::{DefinitionSnapshot, InMemoryDefinitionStore};

/// A file-backed definition store.
pub struct FileDefinitionStore {
    path: PathBuf,
    inner: InMemoryDefinitionStore,
    flush_lock: Mutex<()>,
}

impl FileDefinitionStore {
    /// Open the store at the given path.
    ///
    /// If the file does not exist, starts empty (file created on first write).
    pub fn open(path: impl Into<PathBuf>) -> std::result::Result<Self, StoreError> {
        let path = path.into();
        let snapshot = Self::load_from_disk(&path)?;
        info!(
            path = %path.display(),
            types = snapshot.types.len(),
            parts = snapshot.parts.len(),
            "Definition file store loaded"
        );
        Ok(Self {
            path,
            inner: InMemoryDefinitionStore::from_snapshot(snapshot),
            flush_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_disk(path: &Path) -> std::result::Result<DefinitionSnapshot, StoreError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(DefinitionSnapshot::default()),
            Err(e) => {
                return Err(StoreError::Storage(format!(
                    "Failed to read definitions file {}: {e}",
                    path.display()
                )));
            }
        };
        if content.trim().is_empty() {
            return Ok(DefinitionSnapshot::default());
        }
        serde_json::from_str(&content).map_err(|e| {
            StoreError::Storage(format!("Failed to parse definitions file {}: {e}", path.display()))
        })
    }

    /// Write every definition to disk.
    fn flush(&self) -> std::result::Result<(), StoreError> {
        let _guard = self
            .flush_lock
            .lock()
            .map_err(|_| StoreError::Storage("flush lock poisoned".into()))?;
        let snapshot = self.inner.snapshot()?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Storage(format!("Failed to create definitions directory: {e}"))
            })?;
        }

        let content = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| StoreError::Storage(format!("Failed to serialize definitions: {e}")))?;
        std::fs::write(&self.path, content)
            .map_err(|e| StoreError::Storage(format!("Failed to write definitions file: {e}")))?;

        debug!(path = %self.path.display(), "Flushed definitions");
        Ok(())
    }
}

impl DefinitionStore for FileDefinitionStore {
    fn name(&self) -> &str {
        "file"
    }

    fn get_type_definition(&self, name: &str) -> std::result::Result<Option<TypeDefinition>, StoreError> {
        self.inner.get_type_definition(name)
    }

    fn get_part_definition(&self, name: &str) -> std::result::Result<Option<PartDefinition>, StoreError> {
        self.inner.get_part_definition(name)
    }

    fn list_type_definitions(&self) -> std::result::Result<Vec<TypeDefinition>, StoreError> {
        self.inner.list_type_definitions()
    }

    fn list_part_definitions(&self) -> std::result::Result<Vec<PartDefinition>, StoreError> {
        self.inner.list_part_definitions()
    }

    fn store_type_definition(&self, definition: TypeDefinition) -> std::result::Result<(), StoreError> {
        self.inner.store_type_definition(definition)?;
        self.flush()
    }

    fn delete_type_definition(&self, name: &str) -> std::result::Result<(), StoreError> {
        self.inner.delete_type_definition(name)?;
        self.flush()
    }

    fn delete_part_definition(&self, name: &str) -> std::result::Result<(), StoreError> {
        self.inner.delete_part_definition(name)?;
        self.flush()
    }

    fn alter_type_definition(&self, name: &str, alteration: &mut TypeAlteration<'_>) -> Result<()> {
        self.inner.alter_type_definition(name, alteration)?;
        Ok(self.flush()?)
    }

    fn alter_part_definition(&self, name: &str, alteration: &mut PartAlteration<'_>) -> Result<()> {
        self.inner.alter_part_definition(name, alteration)?;
        Ok(self.flush()?)
    }
}
