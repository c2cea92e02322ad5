//! # Descriptor Loading
//!
//! File-format plumbing shared by the subcommands: JSON or YAML by
//! extension, with load errors carrying the offending path.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;

use depvar_core::Instance;
use depvar_schema::{SchemaDescriptor, SchemaRegistry};

/// Load and cross-check a schema descriptor into a registry.
pub fn load_registry(path: &Path) -> anyhow::Result<SchemaRegistry> {
    let descriptor: SchemaDescriptor = load(path)?;
    descriptor
        .into_registry()
        .with_context(|| format!("schema descriptor {} failed validation", path.display()))
}

/// Load an instance descriptor.
pub fn load_instance(path: &Path) -> anyhow::Result<Instance> {
    load(path)
}

/// Read and deserialize a descriptor file, dispatching on its extension.
/// `.yaml`/`.yml` parse as YAML; everything else parses as JSON.
pub fn load<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read descriptor {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&text)
            .with_context(|| format!("cannot parse YAML descriptor {}", path.display()))
    } else {
        serde_json::from_str(&text)
            .with_context(|| format!("cannot parse JSON descriptor {}", path.display()))
    }
}
