//! Collection inspection.

#![allow(clippy::print_stdout)]

use std::path::Path;

use homehaven_core::store::{CollectionStore, JsonFileStore, keys};

/// Print one collection as pretty JSON.
pub fn collection(data_dir: &Path, key: &str) -> Result<(), Box<dyn std::error::Error>> {
    if !keys::ALL.contains(&key) {
        return Err(format!(
            "unknown collection \"{key}\" (one of: {})",
            keys::ALL.join(", ")
        )
        .into());
    }

    let store = JsonFileStore::open(data_dir)?;
    let rows = store.get(key)?;
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
