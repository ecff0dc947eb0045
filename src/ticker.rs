//! Header breaking-news ticker.
//!
//! On load every `.ticker-item` is cloned onto the end of `.ticker-content`,
//! so the CSS marquee that scrolls one content-width and snaps back always
//! has the duplicate sequence in place. Hovering the ticker pauses every
//! entry; leaving resumes them.
//!
//! # Click matching
//!
//! A clicked entry's text (minus the decorative separator) is reduced to its
//! first N characters and looked up as a substring of each article
//! heading, first match in document order. This is a heuristic: there is no
//! punctuation normalization and no tie-break beyond document order. A
//! miss produces a breaking-news notification instead.

use crate::config::TickerConfig;
use crate::dom::{selector, Document, NodeId};
use once_cell::sync::Lazy;
use scraper::Selector;
use tracing::{debug, info, instrument};

/// Cards a ticker entry can open.
pub static ARTICLE_CARDS: Lazy<Selector> =
    Lazy::new(|| selector(".article-card, .sidebar-article, .featured-article"));
static HEADINGS: Lazy<Selector> = Lazy::new(|| selector("h1, h2, h3, h4"));
static ITEMS: Lazy<Selector> = Lazy::new(|| selector(".ticker-item"));
static CONTENT: Lazy<Selector> = Lazy::new(|| selector(".ticker-content"));
static HOVER_REGION: Lazy<Selector> = Lazy::new(|| selector(".header-news-ticker"));

/// Outcome of clicking a ticker entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickerClick {
    /// Behave as if this article card was clicked.
    OpenArticle(NodeId),
    /// No article matched; announce the headline instead.
    Notify(String),
}

/// Display title of a ticker entry: the first separator occurrence is
/// dropped and surrounding whitespace trimmed.
pub fn entry_title(text: &str, separator: &str) -> String {
    if separator.is_empty() {
        return text.trim().to_string();
    }
    text.replacen(separator, "", 1).trim().to_string()
}

/// First `n` characters of `title`.
pub fn match_prefix(title: &str, n: usize) -> String {
    title.chars().take(n).collect()
}

/// First article card (document order) whose first heading contains
/// `needle`.
pub fn find_article(doc: &Document, needle: &str) -> Option<NodeId> {
    doc.query_all(&ARTICLE_CARDS).into_iter().find(|&card| {
        doc.query_first_within(card, &HEADINGS)
            .is_some_and(|heading| doc.text_content(heading).contains(needle))
    })
}

#[derive(Debug, Clone)]
pub struct TickerController {
    /// Originals first, then their clones in the same order.
    entries: Vec<NodeId>,
    original_count: usize,
    hover_container: Option<NodeId>,
    paused: bool,
}

impl TickerController {
    /// Duplicate the ticker entries. `None` when the page has no entries or
    /// no `.ticker-content` to append to.
    #[instrument(level = "info", skip_all)]
    pub fn setup(doc: &mut Document) -> Option<Self> {
        let originals = doc.query_all(&ITEMS);
        let container = doc.query_first(&CONTENT);
        let Some(container) = container.filter(|_| !originals.is_empty()) else {
            debug!(entries = originals.len(), "Ticker markup incomplete; skipping");
            return None;
        };

        let mut entries = originals.clone();
        for &item in &originals {
            if let Some(clone) = doc.clone_subtree(item) {
                doc.append_child(container, clone);
                entries.push(clone);
            }
        }

        let hover_container = doc.query_first(&HOVER_REGION);
        info!(
            originals = originals.len(),
            total = entries.len(),
            "Ticker duplicated for seamless loop"
        );
        Some(Self {
            entries,
            original_count: originals.len(),
            hover_container,
            paused: false,
        })
    }

    pub fn entries(&self) -> &[NodeId] {
        &self.entries
    }

    pub fn original_count(&self) -> usize {
        self.original_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether `target` is the hover region itself. Enter and leave do not
    /// bubble, so crossing into a child entry is not a leave.
    pub fn is_hover_target(&self, target: NodeId) -> bool {
        self.hover_container == Some(target)
    }

    /// Pause or resume every entry.
    pub fn set_paused(&mut self, doc: &mut Document, paused: bool) {
        let state = if paused { "paused" } else { "running" };
        for &entry in &self.entries {
            doc.set_style(entry, "animation-play-state", state);
        }
        self.paused = paused;
        debug!(state, "Ticker animation");
    }

    /// The ticker entry containing `target`, if any.
    pub fn entry_for(&self, doc: &Document, target: NodeId) -> Option<NodeId> {
        doc.closest(target, &ITEMS)
    }

    /// Decide what a click on `entry` does.
    pub fn resolve_click(&self, doc: &Document, entry: NodeId, config: &TickerConfig) -> TickerClick {
        let title = entry_title(&doc.text_content(entry), &config.separator);
        let needle = match_prefix(&title, config.match_prefix_chars);
        match find_article(doc, &needle) {
            Some(article) => {
                debug!(%title, %article, "Ticker entry matched an article");
                TickerClick::OpenArticle(article)
            }
            None => {
                debug!(%title, "Ticker entry has no article");
                TickerClick::Notify(title)
            }
        }
    }
}
