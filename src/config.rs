//! Site configuration for the lex.uz portal.
//!
//! Every language edition, document category, URL constant, and pacing knob
//! lives here as an explicit [`SiteConfig`] value that gets passed into the
//! pipeline. Nothing downstream reads ambient globals, so tests can run the
//! whole pipeline against a trimmed-down configuration with zero pauses.

use std::time::Duration;

/// One language edition of the portal.
///
/// Each edition has its own base URL and a numeric `lang` query parameter
/// that the search endpoint expects.
#[derive(Debug, Clone)]
pub struct Language {
    /// BCP-47-ish code used in output filenames and metadata (e.g. `uz-Cyrl`).
    pub code: &'static str,
    /// Numeric locale parameter for the search endpoint.
    pub locale: u8,
    /// Base URL of this edition, without a trailing slash.
    pub base_url: &'static str,
}

/// One top-level document category, queried by its `act_type` parameter.
#[derive(Debug, Clone)]
pub struct Category {
    pub name: &'static str,
    pub act_type: u32,
}

/// Immutable configuration for a full fetch run.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub languages: Vec<Language>,
    pub categories: Vec<Category>,
    /// Search path appended to each language's base URL.
    pub search_path: &'static str,
    /// Start of the date range used for the news query, `DD.MM.YYYY`.
    pub news_from: &'static str,
    pub user_agent: &'static str,
    /// Per-request timeout for the HTTP client.
    pub request_timeout: Duration,
    /// Courtesy pause after every listing request.
    pub request_pause: Duration,
    /// Pause between retry attempts of a failed request.
    pub retry_pause: Duration,
    /// Total attempts per URL, first try included.
    pub max_attempts: usize,
    /// Bodies at or below this size are treated as error pages.
    pub min_body_bytes: usize,
}

impl SiteConfig {
    /// The production lex.uz configuration.
    pub fn lex_uz() -> Self {
        Self {
            languages: vec![
                Language { code: "uz-Cyrl", locale: 3, base_url: "https://lex.uz" },
                Language { code: "uz", locale: 4, base_url: "https://lex.uz/uz" },
                Language { code: "ru", locale: 2, base_url: "https://lex.uz/ru" },
                Language { code: "en", locale: 1, base_url: "https://lex.uz/en" },
            ],
            categories: vec![
                Category { name: "constitution", act_type: 1 },
                Category { name: "codes", act_type: 21 },
                Category { name: "laws", act_type: 22 },
                Category { name: "president", act_type: 3 },
                Category { name: "government", act_type: 4 },
                Category { name: "ministries", act_type: 5 },
                Category { name: "international", act_type: 6 },
            ],
            search_path: "/search/all",
            news_from: "01.01.2020",
            user_agent: "Mozilla/5.0 (Linux; Android 10) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.120 Mobile Safari/537.36",
            request_timeout: Duration::from_secs(60),
            request_pause: Duration::from_secs(2),
            retry_pause: Duration::from_secs(5),
            max_attempts: 3,
            min_body_bytes: 100,
        }
    }

    /// Build the listing URL for one (category, language) pair.
    pub fn category_url(&self, category: &Category, lang: &Language) -> String {
        format!(
            "{}{}?act_type={}&lang={}",
            lang.base_url, self.search_path, category.act_type, lang.locale
        )
    }

    /// Build the date-ranged news URL for one language.
    ///
    /// `today` is the range end in `DD.MM.YYYY`, taken from the caller's
    /// clock at run start.
    pub fn news_url(&self, lang: &Language, today: &str) -> String {
        format!(
            "{}{}?from={}&to={}&lang={}",
            lang.base_url, self.search_path, self.news_from, today, lang.locale
        )
    }
}
