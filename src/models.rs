//! Data models for extracted documents and the run metadata index.
//!
//! - [`DocumentRecord`]: one extracted document reference
//! - [`FileEntry`]: per-file summary recorded in the metadata index
//! - [`RunMetadata`]: the aggregate `metadata.json` document
//!
//! Every `DocumentRecord` field is a string on purpose: ids are emitted as
//! strings so leading zeros and negative ids survive the JSON round trip
//! exactly as captured from the markup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One document reference extracted from a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DocumentRecord {
    /// Numeric identifier as it appeared in the href, possibly negative.
    pub id: String,
    /// Trimmed anchor text, with `$` rewritten to `USD `.
    pub title: String,
    /// Absolute document URL.
    pub url: String,
}

/// Where one (category, language) dataset was written and how many records
/// it holds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileEntry {
    pub file: String,
    pub count: usize,
}

/// The aggregate index written to `metadata.json` after a run.
///
/// The double `BTreeMap` nesting keeps categories and languages in
/// lexicographic order when serialized, regardless of collection order.
#[derive(Debug, Deserialize, Serialize)]
pub struct RunMetadata {
    /// Run-start timestamp, UTC, `YYYY-MM-DDTHH:MM:SSZ`.
    pub last_updated: String,
    pub document_types: BTreeMap<String, BTreeMap<String, FileEntry>>,
}
