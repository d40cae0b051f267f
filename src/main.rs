//! # lex_uz_fetch
//!
//! Fetches legal-document listings from the [lex.uz](https://lex.uz) legal
//! information portal across its four language editions and seven document
//! categories (plus a date-ranged "news" pass), extracts `{id, title, url}`
//! references from the raw markup, and publishes them as flat JSON datasets
//! with an aggregate metadata index. Built to run unattended on a schedule
//! and keep the published data fresh.
//!
//! ## Usage
//!
//! ```sh
//! lex_uz_fetch -o ./site
//! ```
//!
//! ## Architecture
//!
//! The run is a strictly sequential pipeline:
//! 1. **Collection**: for every (category, language) pair, fetch the listing
//!    with bounded retries and extract document references; 2 s courtesy
//!    pause between requests
//! 2. **News**: same loop with a date-range query for recent documents
//! 3. **Output**: one `data/<category>_<lang>.json` file per pair, then a
//!    `metadata.json` index with per-file record counts
//!
//! Fetch failures are soft: after three attempts a pair is recorded as an
//! empty dataset and the run continues. Only persistence failures (or
//! `--strict` with failed fetches) end the run with an error.

use chrono::{Local, Utc};
use clap::Parser;
use std::error::Error;
use tracing::{error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod collect;
mod config;
mod extract;
mod fetch;
mod models;
mod outputs;
mod utils;

use cli::Cli;
use collect::collect_all;
use config::SiteConfig;
use fetch::{HttpFetcher, RetryFetch};
use outputs::{json, metadata};
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("lex_uz_fetch starting up");

    let args = Cli::parse();

    // Early check: surface permission problems before any fetching.
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let site = SiteConfig::lex_uz();
    let http = HttpFetcher::new(site.user_agent, site.request_timeout)?;
    let fetcher = RetryFetch::new(http, site.max_attempts, site.retry_pause, site.min_body_bytes);

    // Run-start stamps: UTC for the metadata index, local date for the news
    // range end.
    let last_updated = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let today = Local::now().format("%d.%m.%Y").to_string();
    info!(%last_updated, %today, categories = site.categories.len(), languages = site.languages.len(), "Starting collection");

    let collected = collect_all(&site, &fetcher, &today).await;
    let total_records: usize = collected
        .by_category
        .values()
        .flat_map(|per_lang| per_lang.values())
        .map(|records| records.len())
        .sum();
    info!(
        total_records,
        failed_fetches = collected.failed_fetches,
        "Collection complete"
    );

    let entries = json::write_datasets(&collected.by_category, &args.output_dir).await?;
    let meta = metadata::build_metadata(last_updated, entries);
    metadata::write_metadata(&meta, &args.output_dir).await?;

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");

    if collected.failed_fetches > 0 {
        warn!(failed_fetches = collected.failed_fetches, "Some listings could not be fetched");
        if args.strict {
            return Err(format!(
                "{} listing fetch(es) exhausted retries (strict mode)",
                collected.failed_fetches
            )
            .into());
        }
    }

    Ok(())
}
