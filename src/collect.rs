//! Collection loop over every (category, language) pair plus news.
//!
//! For each pair: build the listing URL, fetch it through the retry
//! decorator, extract document references, record them, then pause before
//! the next request. A fetch that exhausts its retries yields an empty
//! dataset for that pair and bumps the failure counter; the run always
//! visits every configured pair.
//!
//! News is the same loop with a date-range query instead of an `act_type`:
//! fixed start date, range end supplied by the caller from the local clock
//! at run start.

use crate::config::{Language, SiteConfig};
use crate::extract::extract_documents;
use crate::fetch::{FetchPage, RetryFetch};
use crate::models::DocumentRecord;
use std::collections::BTreeMap;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

/// Pseudo-category name for the date-ranged pass.
pub const NEWS: &str = "news";

/// Everything one run collected, keyed category -> language -> records.
#[derive(Debug, Default)]
pub struct CollectedData {
    pub by_category: BTreeMap<String, BTreeMap<String, Vec<DocumentRecord>>>,
    /// Number of (category, language) pairs whose fetch exhausted retries.
    pub failed_fetches: usize,
}

/// Collect every configured category and then news, sequentially.
///
/// `today` is the news range end in `DD.MM.YYYY`. Iteration order over
/// categories carries no meaning; deterministic ordering is imposed at the
/// persistence stage.
#[instrument(level = "info", skip_all, fields(%today))]
pub async fn collect_all<F>(
    config: &SiteConfig,
    fetcher: &RetryFetch<F>,
    today: &str,
) -> CollectedData
where
    F: FetchPage,
{
    let mut collected = CollectedData::default();

    for category in &config.categories {
        info!(category = category.name, "Fetching category");
        let mut per_lang = BTreeMap::new();
        for lang in &config.languages {
            let url = config.category_url(category, lang);
            let records = fetch_pair(config, fetcher, &mut collected.failed_fetches, lang, &url).await;
            per_lang.insert(lang.code.to_string(), records);
        }
        collected.by_category.insert(category.name.to_string(), per_lang);
    }

    info!("Fetching news");
    let mut per_lang = BTreeMap::new();
    for lang in &config.languages {
        let url = config.news_url(lang, today);
        let records = fetch_pair(config, fetcher, &mut collected.failed_fetches, lang, &url).await;
        per_lang.insert(lang.code.to_string(), records);
    }
    collected.by_category.insert(NEWS.to_string(), per_lang);

    collected
}

/// Fetch and extract one listing, then apply the uniform courtesy pause.
async fn fetch_pair<F>(
    config: &SiteConfig,
    fetcher: &RetryFetch<F>,
    failed_fetches: &mut usize,
    lang: &Language,
    url: &str,
) -> Vec<DocumentRecord>
where
    F: FetchPage,
{
    info!(lang = lang.code, %url, "Requesting listing");
    let records = match fetcher.fetch_page(url).await {
        Some(body) => extract_documents(&body),
        None => {
            warn!(lang = lang.code, %url, "All attempts failed; recording empty dataset");
            *failed_fetches += 1;
            Vec::new()
        }
    };
    info!(lang = lang.code, count = records.len(), "Found documents");

    // Be nice to the server.
    sleep(config.request_pause).await;
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::error::Error;
    use std::rc::Rc;
    use std::time::Duration;

    /// Serves canned pages by URL; unknown URLs fail every attempt.
    struct FixtureFetcher {
        pages: HashMap<String, String>,
        requested: Rc<RefCell<Vec<String>>>,
    }

    impl FetchPage for FixtureFetcher {
        async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
            self.requested.borrow_mut().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| format!("no fixture for {url}").into())
        }
    }

    fn quick_config() -> SiteConfig {
        let mut config = SiteConfig::lex_uz();
        config.request_pause = Duration::ZERO;
        config.retry_pause = Duration::ZERO;
        config
    }

    /// A listing page with `count` references, padded past the
    /// short-body threshold.
    fn listing_page(seed: usize, count: usize) -> String {
        let mut page = String::from("<html><body><ul>");
        for i in 0..count {
            page.push_str(&format!(
                r#"<li><a href="/docs/{}">Document number {}</a></li>"#,
                seed * 1000 + i,
                i
            ));
        }
        page.push_str(&"<!-- padding -->".repeat(8));
        page.push_str("</ul></body></html>");
        page
    }

    fn fixtures_for(config: &SiteConfig, today: &str) -> HashMap<String, String> {
        let mut pages = HashMap::new();
        for (ci, category) in config.categories.iter().enumerate() {
            for (li, lang) in config.languages.iter().enumerate() {
                pages.insert(
                    config.category_url(category, lang),
                    listing_page(ci * 10 + li, ci + li + 1),
                );
            }
        }
        for (li, lang) in config.languages.iter().enumerate() {
            pages.insert(config.news_url(lang, today), listing_page(900 + li, 5));
        }
        pages
    }

    #[tokio::test]
    async fn test_collects_every_pair_with_expected_counts() {
        let config = quick_config();
        let today = "05.03.2024";
        let fetcher = RetryFetch::new(
            FixtureFetcher { pages: fixtures_for(&config, today), requested: Rc::default() },
            config.max_attempts,
            config.retry_pause,
            config.min_body_bytes,
        );

        let collected = collect_all(&config, &fetcher, today).await;

        assert_eq!(collected.failed_fetches, 0);
        assert_eq!(collected.by_category.len(), config.categories.len() + 1);
        for (ci, category) in config.categories.iter().enumerate() {
            let per_lang = &collected.by_category[category.name];
            assert_eq!(per_lang.len(), config.languages.len());
            for (li, lang) in config.languages.iter().enumerate() {
                assert_eq!(per_lang[lang.code].len(), ci + li + 1);
            }
        }
        for lang in &config.languages {
            assert_eq!(collected.by_category[NEWS][lang.code].len(), 5);
        }
    }

    #[tokio::test]
    async fn test_failed_fetch_records_empty_dataset_and_continues() {
        let config = quick_config();
        let today = "05.03.2024";
        let mut pages = fixtures_for(&config, today);
        let broken_url = config.category_url(&config.categories[2], &config.languages[0]);
        pages.remove(&broken_url);

        let requested = Rc::new(RefCell::new(Vec::new()));
        let fetcher = RetryFetch::new(
            FixtureFetcher { pages, requested: Rc::clone(&requested) },
            config.max_attempts,
            config.retry_pause,
            config.min_body_bytes,
        );
        let collected = collect_all(&config, &fetcher, today).await;

        assert_eq!(collected.failed_fetches, 1);
        let broken_lang = config.languages[0].code;
        assert!(collected.by_category[config.categories[2].name][broken_lang].is_empty());
        // Every other pair is still present and populated.
        assert_eq!(collected.by_category.len(), config.categories.len() + 1);
        assert!(!collected.by_category[NEWS][broken_lang].is_empty());
        // The broken URL was retried up to the attempt budget.
        let attempts = requested.borrow().iter().filter(|u| **u == broken_url).count();
        assert_eq!(attempts, config.max_attempts);
    }

    #[tokio::test]
    async fn test_end_to_end_fixture_corpus_matches_metadata_counts() {
        use crate::outputs::{json, metadata};

        let config = quick_config();
        let today = "05.03.2024";
        let fetcher = RetryFetch::new(
            FixtureFetcher { pages: fixtures_for(&config, today), requested: Rc::default() },
            config.max_attempts,
            config.retry_pause,
            config.min_body_bytes,
        );
        let collected = collect_all(&config, &fetcher, today).await;

        let dir = std::env::temp_dir().join(format!(
            "lex_uz_fetch_e2e_{}_{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        std::fs::create_dir_all(&dir).unwrap();

        let entries = json::write_datasets(&collected.by_category, &dir).await.unwrap();
        let meta = metadata::build_metadata("2024-03-05T06:00:00Z".to_string(), entries);
        metadata::write_metadata(&meta, &dir).await.unwrap();

        // Exactly one file per (category, language) pair, news included.
        let files: Vec<_> = std::fs::read_dir(dir.join("data")).unwrap().collect();
        let expected_pairs = (config.categories.len() + 1) * config.languages.len();
        assert_eq!(files.len(), expected_pairs);

        // Every metadata count matches the serialized array length on disk.
        let body = std::fs::read_to_string(dir.join("metadata.json")).unwrap();
        let back: crate::models::RunMetadata = serde_json::from_str(&body).unwrap();
        for per_lang in back.document_types.values() {
            for entry in per_lang.values() {
                let dataset = std::fs::read_to_string(dir.join(&entry.file)).unwrap();
                let records: Vec<DocumentRecord> = serde_json::from_str(&dataset).unwrap();
                assert_eq!(records.len(), entry.count);
            }
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_page_with_no_references_yields_empty_dataset_without_failure() {
        let mut config = quick_config();
        config.categories.truncate(1);
        config.languages.truncate(1);
        let today = "05.03.2024";

        let url = config.category_url(&config.categories[0], &config.languages[0]);
        let mut pages = HashMap::new();
        let mut filler = String::from("<html><body>");
        filler.push_str(&"<p>No results found for this query.</p>".repeat(5));
        filler.push_str("</body></html>");
        pages.insert(url, filler);
        pages.insert(config.news_url(&config.languages[0], today), listing_page(1, 2));

        let fetcher = RetryFetch::new(
            FixtureFetcher { pages, requested: Rc::default() },
            config.max_attempts,
            config.retry_pause,
            config.min_body_bytes,
        );
        let collected = collect_all(&config, &fetcher, today).await;

        assert_eq!(collected.failed_fetches, 0);
        assert!(collected.by_category[config.categories[0].name]["uz-Cyrl"].is_empty());
    }
}
