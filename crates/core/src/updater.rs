//! Model-binding contract used by editor hooks during an update.
//!
//! The raw updater is request-scoped: it owns the posted values and the
//! error list of one request. The service wraps it so every key a hook
//! uses is rewritten to the full nesting path before it reaches the raw
//! updater.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// A validation error recorded against a scoped form key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub key: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

/// Binds posted values into a model and records validation errors.
///
/// Methods take `&self`; implementations keep their error list behind
/// interior mutability so one updater can be shared down nested calls.
pub trait UpdateModel {
    /// Copy the values posted under `prefix` into `model`, keyed by the
    /// remainder of their name. `include`, when non-empty, restricts the
    /// bound keys; `exclude` always wins. Returns `false` when binding failed.
    fn try_update_model(&self, model: &mut Settings, prefix: &str, include: &[&str], exclude: &[&str]) -> bool;

    /// Record a validation error against `key`.
    fn add_model_error(&self, key: &str, message: &str);
}
