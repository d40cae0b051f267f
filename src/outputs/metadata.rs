//! The aggregate `metadata.json` index.

use crate::models::{FileEntry, RunMetadata};
use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Assemble the run index from the per-file entries.
///
/// `last_updated` is the run-start UTC stamp (`YYYY-MM-DDTHH:MM:SSZ`),
/// captured once before collection began.
pub fn build_metadata(
    last_updated: String,
    document_types: BTreeMap<String, BTreeMap<String, FileEntry>>,
) -> RunMetadata {
    RunMetadata { last_updated, document_types }
}

/// Write `metadata.json` at the output directory root.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_metadata(
    meta: &RunMetadata,
    output_dir: &Path,
) -> Result<PathBuf, Box<dyn Error>> {
    let path = output_dir.join("metadata.json");
    let body = serde_json::to_string_pretty(meta)?;
    fs::write(&path, body).await?;
    info!(path = %path.display(), categories = meta.document_types.len(), "Wrote metadata index");
    Ok(path)
}
