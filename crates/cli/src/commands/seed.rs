//! Seed commands.

use std::path::Path;

use serde_json::Value;

use homehaven_core::repo::ContentRepository;
use homehaven_core::store::JsonFileStore;

/// Replace the content catalog with the records in `file`.
///
/// Every record is validated before anything is written; one bad record
/// aborts the whole seed.
pub async fn content(data_dir: &Path, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = JsonFileStore::open(data_dir)?;

    let body = tokio::fs::read_to_string(file).await?;
    let records: Vec<Value> = serde_json::from_str(&body)?;

    let seeded = ContentRepository::new(&store).replace_all(&records)?;
    tracing::info!(
        records = seeded.len(),
        file = %file.display(),
        "content catalog seeded"
    );
    Ok(())
}
