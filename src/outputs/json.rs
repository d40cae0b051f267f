//! Per-pair dataset files under `data/`.

use crate::models::{DocumentRecord, FileEntry};
use std::collections::BTreeMap;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write every collected dataset as a JSON array under `<output_dir>/data/`.
///
/// Categories and languages are visited in lexicographic order, so files
/// land on disk deterministically no matter what order collection ran in.
/// Filenames replace hyphens in the language code with underscores
/// (`news_uz_Cyrl.json`). Returns the nested `{file, count}` map that the
/// metadata index is built from; any directory or write failure aborts the
/// run.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_datasets(
    data: &BTreeMap<String, BTreeMap<String, Vec<DocumentRecord>>>,
    output_dir: &Path,
) -> Result<BTreeMap<String, BTreeMap<String, FileEntry>>, Box<dyn Error>> {
    let data_dir = output_dir.join("data");
    if let Err(e) = fs::create_dir_all(&data_dir).await {
        error!(path = %data_dir.display(), error = %e, "Failed to create data dir");
        return Err(e.into());
    }

    let mut entries: BTreeMap<String, BTreeMap<String, FileEntry>> = BTreeMap::new();
    for (category, per_lang) in data {
        for (lang, records) in per_lang {
            let lang_token = lang.replace('-', "_");
            let relative = format!("data/{category}_{lang_token}.json");
            let path = output_dir.join(&relative);

            let body = serde_json::to_string_pretty(records)?;
            fs::write(&path, body).await?;
            info!(path = %path.display(), count = records.len(), "Wrote dataset file");

            entries.entry(category.clone()).or_default().insert(
                lang.clone(),
                FileEntry { file: relative, count: records.len() },
            );
        }
    }

    Ok(entries)
}
