//! Command implementations and the wiring they share.

pub mod fields;
pub mod init;
pub mod parts;
pub mod types;

use contentdef_config::{AppConfig, StoreBackend};
use contentdef_core::store::DefinitionStore;
use contentdef_core::updater::ValidationError;
use contentdef_service::{ContentDefinitionService, FormUpdater, ServiceOptions};
use contentdef_store::{FileDefinitionStore, InMemoryContentManager, InMemoryDefinitionStore};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Parse a `key=value` pair for `--set`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=value: no `=` found in `{s}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid KEY=value: empty key in `{s}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    Ok(config.map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Load the config and build a service over the configured store.
pub fn connect(config_path: Option<&Path>) -> Result<ContentDefinitionService, Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;

    let store: Arc<dyn DefinitionStore> = match config.store.backend {
        StoreBackend::Memory => {
            warn!("Using the memory store: definitions are discarded on exit");
            Arc::new(InMemoryDefinitionStore::new())
        }
        StoreBackend::File => Arc::new(FileDefinitionStore::open(config.store.resolved_path())?),
    };
    info!(store = %store.name(), policy = ?config.validation.policy, "Definition store ready");

    Ok(
        ContentDefinitionService::new(store, Arc::new(contentdef_editors::default_registry()))
            .with_content_manager(Arc::new(InMemoryContentManager::new()))
            .with_options(ServiceOptions::from_config(&config)),
    )
}

pub fn form(values: Vec<(String, String)>) -> FormUpdater {
    values.into_iter().collect()
}

/// Print validation errors as `key: message` lines.
pub fn print_errors(errors: &[ValidationError]) {
    if errors.is_empty() {
        return;
    }
    println!("⚠️  {} validation error(s):", errors.len());
    for error in errors {
        println!("   {error}");
    }
}
