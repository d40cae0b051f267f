//! Document-reference extraction from raw listing markup.
//!
//! Listing pages link each document as an anchor whose href targets
//! `/docs/<id>`, optionally behind a language prefix (`/uz/docs/...`,
//! `/ru/docs/...`). No DOM is built: a regex locates each candidate href,
//! then an explicit scan picks up the visible anchor text between the end of
//! the opening tag and the next tag boundary. The two stages keep the
//! whitespace and nested-tag edge cases testable on their own.

use crate::models::DocumentRecord;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

/// Origin used to absolutize the captured relative document paths.
static DOC_ORIGIN: Lazy<Url> = Lazy::new(|| Url::parse("https://lex.uz").unwrap());

/// Matches a document href and captures the relative path and the id.
static DOC_HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)href="(/(?:uz/|ru/|en/)?docs/(-?\d+))""#).unwrap()
});

/// Extract all document references from a listing page.
///
/// Matches are taken in order of first appearance. A candidate is dropped
/// when its anchor text is empty after trimming, or when its id was already
/// seen earlier in the same page. Titles get every literal `$` replaced with
/// `USD ` so amounts read unambiguously downstream.
pub fn extract_documents(html: &str) -> Vec<DocumentRecord> {
    let records: Vec<DocumentRecord> = DOC_HREF
        .captures_iter(html)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let path = caps.get(1)?.as_str();
            let id = caps.get(2)?.as_str();

            let title = anchor_text(&html[whole.end()..])?;
            let url = DOC_ORIGIN.join(path).ok()?;

            Some(DocumentRecord {
                id: id.to_string(),
                title: title.replace('$', "USD "),
                url: url.to_string(),
            })
        })
        .unique_by(|record| record.id.clone())
        .collect();

    debug!(count = records.len(), bytes = html.len(), "Extracted document references");
    records
}

/// Take the visible text of an anchor whose opening tag continues in `rest`.
///
/// Skips the remaining attributes up to the tag's closing `>`, then captures
/// everything before the next `<`. Returns `None` when the tag never closes
/// or the captured text trims to nothing.
fn anchor_text(rest: &str) -> Option<String> {
    let after_tag = &rest[rest.find('>')? + 1..];
    let text = match after_tag.find('<') {
        Some(end) => &after_tag[..end],
        None => after_tag,
    };
    let text = text.trim();
    if text.is_empty() { None } else { Some(text.to_string()) }
}
