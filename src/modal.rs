//! The article modal.
//!
//! One modal exists for the page lifetime. It is either closed (initial) or
//! open; opening while open just replaces what is shown. Opening reads the
//! clicked card into an [`ArticleSummary`], copies each present field into
//! the modal, resolves the body through the [`ContentTable`], locks page
//! scrolling and rewinds the modal to the top. Closing hides it and puts
//! the page's scroll setting back to what it was before the modal opened.
//!
//! If the page has no `#articleModal`, [`ModalController::bind`] returns
//! `None` and every modal interaction is inert.

use crate::content::ContentTable;
use crate::dom::{selector, Document, NodeId};
use crate::models::{ArticleSummary, ModalState, TICKER_ARTICLE_META};
use once_cell::sync::Lazy;
use scraper::Selector;
use tracing::{debug, info, instrument};

static IMAGE: Lazy<Selector> = Lazy::new(|| selector("img"));
static CATEGORY: Lazy<Selector> = Lazy::new(|| selector(".category"));
static CARD_TITLE: Lazy<Selector> = Lazy::new(|| selector("h2, h3, h4"));
static META: Lazy<Selector> = Lazy::new(|| selector(".meta"));
static TICKER_CATEGORY: Lazy<Selector> = Lazy::new(|| selector(".ticker-category"));
static TICKER_TITLE: Lazy<Selector> = Lazy::new(|| selector(".ticker-title"));
static ACTIONS: Lazy<[(Selector, ModalAction); 3]> = Lazy::new(|| {
    [
        (selector(".share-btn"), ModalAction::Share),
        (selector(".bookmark-btn"), ModalAction::Bookmark),
        (selector(".print-btn"), ModalAction::Print),
    ]
});

/// Buttons inside the modal footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    Share,
    Bookmark,
    Print,
}

impl ModalAction {
    /// The action whose button contains `target`, if any.
    pub fn for_target(doc: &Document, target: NodeId) -> Option<Self> {
        ACTIONS
            .iter()
            .find(|(button, _)| doc.closest(target, button).is_some())
            .map(|&(_, action)| action)
    }
}

/// Read an article card the way the modal sees it.
pub fn summary_from_card(doc: &Document, card: NodeId) -> ArticleSummary {
    let image_url = doc
        .query_first_within(card, &IMAGE)
        .and_then(|img| doc.attr(img, "src"))
        .map(str::to_string);
    let category = doc
        .query_first_within(card, &CATEGORY)
        .map(|el| doc.text_content(el));
    let title = doc
        .query_first_within(card, &CARD_TITLE)
        .map(|el| doc.text_content(el));
    let date_label = doc
        .query_first_within(card, &META)
        .map(|el| doc.text_content(el));

    ArticleSummary {
        title,
        category,
        image_url,
        date_label,
    }
}

/// Build a summary for a compact ticker card, which has no meta line of
/// its own.
pub fn summary_from_ticker_article(doc: &Document, card: NodeId) -> ArticleSummary {
    let image_url = doc
        .query_first_within(card, &IMAGE)
        .and_then(|img| doc.attr(img, "src"))
        .map(str::to_string);
    let category = doc
        .query_first_within(card, &TICKER_CATEGORY)
        .map(|el| doc.text_content(el));
    let title = doc
        .query_first_within(card, &TICKER_TITLE)
        .map(|el| doc.text_content(el));

    ArticleSummary {
        title,
        category,
        image_url,
        date_label: Some(TICKER_ARTICLE_META.to_string()),
    }
}

#[derive(Debug, Clone)]
struct ModalFields {
    image: Option<NodeId>,
    category: Option<NodeId>,
    title: Option<NodeId>,
    date: Option<NodeId>,
    content: Option<NodeId>,
    close_button: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct ModalController {
    root: NodeId,
    body: Option<NodeId>,
    fields: ModalFields,
    state: ModalState,
    /// Body `overflow` before the modal opened (`None` = unset).
    saved_overflow: Option<String>,
    scroll_top: f64,
}

impl ModalController {
    /// Find the modal markup. `None` when the page has no modal.
    pub fn bind(doc: &Document) -> Option<Self> {
        let root = doc.by_id("articleModal")?;
        let fields = ModalFields {
            image: doc.by_id("modalImage"),
            category: doc.by_id("modalCategory"),
            title: doc.by_id("modalTitle"),
            date: doc.by_id("modalDate"),
            content: doc.by_id("modalContent"),
            close_button: doc.query_first(&selector(".close-modal")),
        };
        debug!(?fields, "Bound article modal");
        Some(Self {
            root,
            body: doc.body(),
            fields,
            state: ModalState::default(),
            saved_overflow: None,
            scroll_top: 0.0,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    /// Scroll offset inside the modal.
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn scroll_content_to(&mut self, y: f64) {
        self.scroll_top = y.max(0.0);
    }

    /// Whether `target` is on the close control.
    pub fn is_close_control(&self, doc: &Document, target: NodeId) -> bool {
        self.fields
            .close_button
            .is_some_and(|close| doc.contains(close, target))
    }

    /// Current text of the modal title.
    pub fn title_text(&self, doc: &Document) -> String {
        self.fields
            .title
            .map(|title| doc.text_content(title))
            .unwrap_or_default()
    }

    /// Show `summary`. Fields the summary lacks keep their previous value.
    #[instrument(level = "info", skip_all, fields(title = summary.lookup_title(), category = summary.lookup_category()))]
    pub fn open_with(&mut self, doc: &mut Document, content: &ContentTable, summary: ArticleSummary) {
        if let (Some(el), Some(src)) = (self.fields.image, &summary.image_url) {
            doc.set_attr(el, "src", src);
        }
        if let (Some(el), Some(text)) = (self.fields.category, &summary.category) {
            doc.set_text(el, text);
        }
        if let (Some(el), Some(text)) = (self.fields.title, &summary.title) {
            doc.set_text(el, text);
        }
        if let (Some(el), Some(text)) = (self.fields.date, &summary.date_label) {
            doc.set_text(el, text);
        }

        let body_html = content.resolve(summary.lookup_title(), summary.lookup_category());
        if let Some(el) = self.fields.content {
            doc.set_inner_html(el, &body_html);
        }

        doc.set_style(self.root, "display", "block");
        if let Some(body) = self.body {
            if !self.state.is_open {
                self.saved_overflow = doc.style(body, "overflow").map(str::to_string);
            }
            doc.set_style(body, "overflow", "hidden");
        }
        self.scroll_top = 0.0;

        let reopened = self.state.is_open;
        self.state.is_open = true;
        self.state.current_article = Some(summary);
        info!(reopened, "Article modal open");
    }

    /// Hide the modal and restore page scrolling. Returns `false` if it was
    /// already closed.
    pub fn close(&mut self, doc: &mut Document) -> bool {
        if !self.state.is_open {
            return false;
        }
        doc.set_style(self.root, "display", "none");
        if let Some(body) = self.body {
            match self.saved_overflow.take() {
                Some(previous) => doc.set_style(body, "overflow", &previous),
                None => doc.remove_style(body, "overflow"),
            }
        }
        self.state.is_open = false;
        info!("Article modal closed");
        true
    }
}
