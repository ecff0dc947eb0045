//! Data models shared by the page controllers.
//!
//! - [`ArticleSummary`]: what the modal knows about the article it shows,
//!   read off a card (or synthesized for a ticker card) at click time
//! - [`ContentRecord`]: one entry of the external content table asset
//! - [`ModalState`]: snapshot of the single article modal
//!
//! Category labels are plain strings. The newspaper prints a fixed set of
//! them ([`KNOWN_CATEGORIES`]) but lookups never reject unknown ones.

use serde::{Deserialize, Serialize};

/// Section labels printed on the EDEN front page.
pub const KNOWN_CATEGORIES: &[&str] = &[
    "NEWS",
    "BUSINESS",
    "CULTURE",
    "SPORTS",
    "SOCIETY",
    "HI-TECH",
    "ENTERTAINMENT",
    "OPINION",
    "EDITORIAL",
    "ANALYSIS",
];

/// Meta line used for articles synthesized from ticker cards.
pub const TICKER_ARTICLE_META: &str = "EDEN Newspaper - Latest News";

/// Returns `true` if `category` is one of the printed section labels.
pub fn is_known_category(category: &str) -> bool {
    KNOWN_CATEGORIES.contains(&category)
}

/// The parts of an article card the modal displays.
///
/// Every field is optional: a card without an image simply leaves the
/// modal image as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    /// Headline text.
    pub title: Option<String>,
    /// Section label, e.g. `"SPORTS"`.
    pub category: Option<String>,
    /// Image source URL.
    pub image_url: Option<String>,
    /// Byline/date text from the card's `.meta` element.
    pub date_label: Option<String>,
}

impl ArticleSummary {
    /// Title used for content lookup; empty when the card had no heading.
    pub fn lookup_title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Category used for content lookup; empty when the card had no label.
    pub fn lookup_category(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }
}

/// One prewritten article body, keyed by exact category and title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub category: String,
    pub title: String,
    /// HTML fragment returned verbatim by the resolver.
    pub body: String,
}

/// Snapshot of the article modal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModalState {
    pub is_open: bool,
    pub current_article: Option<ArticleSummary>,
}
