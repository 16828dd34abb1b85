//! Error types for the contentdef domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each collaborator has its own error enum that folds into [`Error`].

use thiserror::Error;

use crate::updater::ValidationError;

/// The top-level error type for all definition operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Caller input ---
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    // --- Hook validation ---
    #[error("Validation failed with {} error(s)", .0.len())]
    ValidationFailed(Vec<ValidationError>),

    // --- Collaborators ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error means a named definition does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Store(StoreError::NotFound { .. }))
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Which kind of definition a store error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Type,
    Part,
    Field,
}

impl std::fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefinitionKind::Type => f.write_str("type"),
            DefinitionKind::Part => f.write_str("part"),
            DefinitionKind::Field => f.write_str("field"),
        }
    }
}

// --- Collaborator errors ---

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} definition not found: {name}")]
    NotFound { kind: DefinitionKind, name: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl StoreError {
    pub fn type_not_found(name: &str) -> Self {
        StoreError::NotFound {
            kind: DefinitionKind::Type,
            name: name.to_string(),
        }
    }

    pub fn part_not_found(name: &str) -> Self {
        StoreError::NotFound {
            kind: DefinitionKind::Part,
            name: name.to_string(),
        }
    }

    /// A field missing from an existing part, named `part.field`.
    pub fn field_not_found(part_name: &str, field_name: &str) -> Self {
        StoreError::NotFound {
            kind: DefinitionKind::Field,
            name: format!("{part_name}.{field_name}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Content query failed for type {content_type}: {reason}")]
    Query { content_type: String, reason: String },

    #[error("Failed to remove content item {id}: {reason}")]
    Remove { id: String, reason: String },
}
