//! Definition store and content manager backends for contentdef.

pub mod content;
pub mod file_backend;
pub mod in_memory;

pub use content::InMemoryContentManager;
pub use file_backend::FileDefinitionStore;
pub use in_memory::{DefinitionSnapshot, InMemoryDefinitionStore};
