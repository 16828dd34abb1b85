//! Definition store trait: durable repository of type and part definitions.
//!
//! The store is the only place definitions are persisted. All mutation goes
//! through the `alter_*` operations: the store hands a builder to the
//! caller's callback and commits the builder's result as one unit when the
//! callback returns `Ok`. A callback error aborts with nothing committed.

use crate::definition::{PartDefinition, PartDefinitionBuilder, TypeDefinition, TypeDefinitionBuilder};
use crate::error::{Result, StoreError};

/// Callback run against a type builder inside an alteration.
pub type TypeAlteration<'a> = dyn FnMut(&mut TypeDefinitionBuilder) -> Result<()> + 'a;

/// Callback run against a part builder inside an alteration.
pub type PartAlteration<'a> = dyn FnMut(&mut PartDefinitionBuilder) -> Result<()> + 'a;

/// The core DefinitionStore trait.
///
/// Implementations: in-memory, JSON file.
///
/// Alterations of the same name never interleave. Alterations of different
/// names may nest: a type alteration can open a part alteration from
/// inside its callback.
pub trait DefinitionStore: Send + Sync {
    /// The backend name (e.g., "in_memory", "file").
    fn name(&self) -> &str;

    fn get_type_definition(&self, name: &str) -> std::result::Result<Option<TypeDefinition>, StoreError>;

    fn get_part_definition(&self, name: &str) -> std::result::Result<Option<PartDefinition>, StoreError>;

    fn list_type_definitions(&self) -> std::result::Result<Vec<TypeDefinition>, StoreError>;

    fn list_part_definitions(&self) -> std::result::Result<Vec<PartDefinition>, StoreError>;

    /// Store a type definition, replacing any existing one of that name.
    fn store_type_definition(&self, definition: TypeDefinition) -> std::result::Result<(), StoreError>;

    /// Delete a type definition. Fails with `NotFound` when absent.
    fn delete_type_definition(&self, name: &str) -> std::result::Result<(), StoreError>;

    /// Delete a part definition, detaching it from every type first.
    /// Fails with `NotFound` when absent.
    fn delete_part_definition(&self, name: &str) -> std::result::Result<(), StoreError>;

    /// Alter a type under callback. A missing type starts from
    /// `TypeDefinition::new(name, name)` and is created on commit.
    fn alter_type_definition(&self, name: &str, alteration: &mut TypeAlteration<'_>) -> Result<()>;

    /// Alter a part under callback. A missing part starts empty and is
    /// created on commit.
    fn alter_part_definition(&self, name: &str, alteration: &mut PartAlteration<'_>) -> Result<()>;
}
