//! The page runtime.
//!
//! [`Page`] owns everything that lives for one page load: the document, the
//! timer queue, the host and one controller per feature. Construction runs
//! the load-time setup; after that the page only changes in response to
//! [`Page::dispatch`] and [`Page::advance`].
//!
//! # Dispatch order
//!
//! A click runs handlers in the order a browser would call them for this
//! page:
//!
//! 1. element handlers on the target or its ancestors (search, newsletter,
//!    navigation, press effects, notification dismiss, modal close)
//! 2. document-level delegated handlers (ticker entry, article card, modal
//!    buttons, ticker article card)
//! 3. the window-level backdrop handler
//!
//! Every delegated handler matches with a `closest`-style ancestor search,
//! so one click reaches at most one of them in practice.

use crate::config::{ConfigError, PageConfig, Timings};
use crate::content::ContentTable;
use crate::dom::{parse_selector, selector, Document, NodeId, QueryError};
use crate::effects::{EffectTask, Effects};
use crate::event::{Event, Viewport};
use crate::forms::{NewsletterForm, SearchForm};
use crate::host::Host;
use crate::modal::{summary_from_card, summary_from_ticker_article, ModalAction, ModalController};
use crate::models::{ArticleSummary, ModalState};
use crate::notification::{NotificationCenter, NotificationTask};
use crate::scheduler::{Scheduler, TimerId};
use crate::ticker::{TickerClick, TickerController, ARTICLE_CARDS};
use once_cell::sync::Lazy;
use scraper::Selector;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Work parked on the page's timer queue.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    Effect(EffectTask),
    Notification(NotificationTask),
}

static LINK: Lazy<Selector> = Lazy::new(|| selector("a"));
static TICKER_ARTICLE: Lazy<Selector> = Lazy::new(|| selector(".ticker-article"));

/// Upper bound on timers drained by [`Page::run_until_idle`].
const IDLE_TIMER_LIMIT: usize = 100_000;

pub struct Page<H: Host> {
    doc: Document,
    config: PageConfig,
    page_url: Url,
    content: ContentTable,
    host: H,
    viewport: Viewport,
    scheduler: Scheduler<Task>,
    search: Option<SearchForm>,
    newsletter: Option<NewsletterForm>,
    nav_links: Vec<NodeId>,
    effects: Effects,
    ticker: Option<TickerController>,
    notifications: NotificationCenter,
    modal: Option<ModalController>,
    focused: Option<NodeId>,
}

impl<H: Host> Page<H> {
    /// Bind every feature to `doc` and apply the load-time effects.
    ///
    /// # Arguments
    /// * `doc` - The parsed page. Setup edits it (ticker clones, progress bar,
    ///   card delays) before the first event.
    /// * `config` - Validated here; see [`PageConfig::validate`].
    /// * `content` - Article bodies for the modal.
    /// * `host` - Receives alerts, shares, prints and scrolls.
    /// * `viewport` - Initial window size and document height.
    ///
    /// # Returns
    /// The ready page, or the [`ConfigError`] that made `config` unusable.
    #[instrument(level = "info", skip_all, fields(site = %config.site_name))]
    pub fn new(
        mut doc: Document,
        config: PageConfig,
        content: ContentTable,
        host: H,
        viewport: Viewport,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let page_url = config.page_url()?;
        let mut scheduler = Scheduler::new();

        let search = SearchForm::bind(&doc);
        let newsletter = NewsletterForm::bind(&doc);
        let nav_links = doc.query_all(&selector("nav a:not(.dropdown-content a)"));
        let effects = Effects::bind(&mut doc, &mut scheduler, &config, &viewport);
        let ticker = TickerController::setup(&mut doc);
        let modal = ModalController::bind(&doc);
        if modal.is_none() {
            warn!("Page has no #articleModal; article cards will not open");
        }

        info!(
            search = search.is_some(),
            newsletter = newsletter.is_some(),
            ticker = ticker.is_some(),
            modal = modal.is_some(),
            content_entries = content.len(),
            "Page ready"
        );

        Ok(Self {
            doc,
            config,
            page_url,
            content,
            host,
            viewport,
            scheduler,
            search,
            newsletter,
            nav_links,
            effects,
            ticker,
            notifications: NotificationCenter::new(),
            modal,
            focused: None,
        })
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Virtual time since page load.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// `None` when the page has no modal.
    pub fn modal_state(&self) -> Option<&ModalState> {
        self.modal.as_ref().map(|m| m.state())
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn ticker(&self) -> Option<&TickerController> {
        self.ticker.as_ref()
    }

    /// Width of the reading-progress bar, e.g. `"42%"`.
    pub fn progress_width(&self) -> Option<&str> {
        self.effects.progress_width(&self.doc)
    }

    /// Look up an element by CSS selector.
    ///
    /// # Arguments
    /// * `css` - Any selector `scraper` accepts: combinators, attribute
    ///   tests and pseudo-classes such as `:first-child` or `:not(..)`.
    /// * `nth` - Zero-based index into the matches, in document order.
    ///
    /// # Returns
    /// `Ok(None)` when fewer than `nth + 1` connected elements match, or a
    /// [`QueryError`] when `css` does not parse.
    pub fn select(&self, css: &str, nth: usize) -> Result<Option<NodeId>, QueryError> {
        let selector = parse_selector(css)?;
        Ok(self.doc.query_all(&selector).get(nth).copied())
    }

    /// Deliver one event.
    ///
    /// Clicks bubble (see the module docs for handler order). Enter and
    /// leave do not: they only reach handlers bound to the target itself.
    /// Clicks on detached elements are dropped.
    ///
    /// # Arguments
    /// * `event` - The event; its targets must come from this page's
    ///   document.
    ///
    /// # Returns
    /// `true` if a handler prevented the default browser action (link
    /// navigation).
    #[instrument(level = "debug", skip_all, fields(event = event.name()))]
    pub fn dispatch(&mut self, event: Event) -> bool {
        match event {
            Event::Click { target } => self.click(target),
            Event::MouseEnter { target } => {
                self.hover(target, true);
                false
            }
            Event::MouseLeave { target } => {
                self.hover(target, false);
                false
            }
            Event::Focus { target } => {
                self.focused = Some(target);
                self.effects.on_focus(&mut self.doc, target);
                false
            }
            Event::Blur { target } => {
                if self.focused == Some(target) {
                    self.focused = None;
                }
                self.effects.on_blur(&mut self.doc, target);
                false
            }
            Event::Input { target, value } => {
                self.doc.set_attr(target, "value", &value);
                false
            }
            Event::Key { target, key } => self.key(target.or(self.focused), &key),
            Event::Scroll { scroll_y } => {
                self.viewport.scroll_y = scroll_y.clamp(0.0, self.viewport.max_scroll());
                self.effects.on_scroll(&mut self.doc, &self.config, &self.viewport);
                false
            }
            Event::Resize { width, height } => {
                self.viewport.width = width;
                self.viewport.height = height;
                self.effects.on_resize(&mut self.doc, &self.config, &self.viewport);
                false
            }
            Event::DocumentResized { height } => {
                self.viewport.document_height = height;
                false
            }
            Event::Intersect { target, ratio } => {
                self.effects
                    .on_intersect(&mut self.doc, &self.config, target, ratio);
                false
            }
        }
    }

    fn click(&mut self, target: NodeId) -> bool {
        if !self.doc.is_connected(target) {
            debug!(%target, "Click on a detached element ignored");
            return false;
        }
        let mut prevented = false;

        // Element handlers.
        if let Some(search) = self.search.filter(|s| s.is_submit(&self.doc, target)) {
            search.submit(&self.doc, &mut self.host);
        }
        if let Some(newsletter) = self.newsletter.filter(|n| n.is_submit(&self.doc, target)) {
            newsletter.submit(&mut self.doc, &mut self.host);
        }
        if let Some(link) = self
            .nav_links
            .iter()
            .copied()
            .find(|&link| self.doc.contains(link, target))
        {
            prevented |= self.follow_nav_link(link);
        }
        self.effects
            .on_click(&mut self.doc, &mut self.scheduler, &self.config.timings, target);
        if let Some(id) = self.notifications.notification_for(&self.doc, target) {
            self.notifications
                .dismiss(&mut self.doc, &mut self.scheduler, id);
        }
        if let Some(modal) = self.modal.as_mut() {
            if modal.is_close_control(&self.doc, target) {
                modal.close(&mut self.doc);
            }
        }

        // Document-level delegated handlers.
        let ticker_click = self.ticker.as_ref().and_then(|ticker| {
            ticker
                .entry_for(&self.doc, target)
                .map(|entry| ticker.resolve_click(&self.doc, entry, &self.config.ticker))
        });
        match ticker_click {
            Some(TickerClick::OpenArticle(card)) => {
                self.click(card);
            }
            Some(TickerClick::Notify(title)) => self.show_notification(&title),
            None => {}
        }
        if let Some(card) = self.doc.closest(target, &ARTICLE_CARDS) {
            if self.doc.closest(target, &LINK).is_none() {
                prevented = true;
                let summary = summary_from_card(&self.doc, card);
                self.open_article(summary);
            }
        }
        if let Some(action) = ModalAction::for_target(&self.doc, target) {
            self.modal_action(action);
        }
        if let Some(card) = self.doc.closest(target, &TICKER_ARTICLE) {
            prevented = true;
            let summary = summary_from_ticker_article(&self.doc, card);
            self.open_article(summary);
        }

        // Window-level backdrop.
        if let Some(modal) = self.modal.as_mut() {
            if modal.root() == target {
                modal.close(&mut self.doc);
            }
        }

        prevented
    }

    fn hover(&mut self, target: NodeId, entering: bool) {
        if let Some(ticker) = self.ticker.as_mut() {
            if ticker.is_hover_target(target) {
                ticker.set_paused(&mut self.doc, entering);
            }
        }
        let timings = &self.config.timings;
        if entering {
            self.effects
                .on_enter(&mut self.doc, &mut self.scheduler, timings, target);
        } else {
            self.effects
                .on_leave(&mut self.doc, &mut self.scheduler, timings, target);
        }
    }

    fn key(&mut self, target: Option<NodeId>, key: &str) -> bool {
        match key {
            "Enter" => {
                if let Some(search) = self.search.filter(|s| Some(s.input()) == target) {
                    self.click(search.button());
                }
            }
            "Escape" => {
                if let Some(modal) = self.modal.as_mut().filter(|m| m.is_open()) {
                    modal.close(&mut self.doc);
                }
            }
            _ => {}
        }
        false
    }

    /// Smooth-scroll for in-page anchors. Returns whether the default
    /// navigation was prevented.
    fn follow_nav_link(&mut self, link: NodeId) -> bool {
        let Some(href) = self.doc.attr(link, "href").map(str::to_string) else {
            return false;
        };
        let Some(id) = href.strip_prefix('#') else {
            return false;
        };
        if !id.is_empty() && self.doc.by_id(id).is_some() {
            self.host.scroll_into_view(id);
        } else {
            debug!(%href, "Anchor has no target");
        }
        true
    }

    fn open_article(&mut self, summary: ArticleSummary) {
        match self.modal.as_mut() {
            Some(modal) => modal.open_with(&mut self.doc, &self.content, summary),
            None => debug!(title = summary.lookup_title(), "No modal to open"),
        }
    }

    fn modal_action(&mut self, action: ModalAction) {
        let title = self
            .modal
            .as_ref()
            .map(|modal| modal.title_text(&self.doc))
            .unwrap_or_default();
        let url = self.page_url.as_str();
        match action {
            ModalAction::Share => {
                if !self.host.share(&title, url) {
                    self.host.write_clipboard(&format!("{title} - {url}"));
                    self.host.alert("Article link copied to clipboard!");
                }
            }
            ModalAction::Bookmark => {
                self.host
                    .alert(&format!("\"{title}\" has been added to your bookmarks!"));
            }
            ModalAction::Print => self.host.print(),
        }
    }

    fn show_notification(&mut self, title: &str) {
        match self.doc.body() {
            Some(body) => {
                self.notifications.show(
                    &mut self.doc,
                    body,
                    &mut self.scheduler,
                    &self.config.timings,
                    title,
                );
            }
            None => debug!(%title, "No body to attach a notification to"),
        }
    }

    /// Move virtual time forward by `by`, running every timer that comes
    /// due, including ones scheduled along the way.
    ///
    /// # Arguments
    /// * `by` - How far to move the virtual clock. Timers run in deadline
    ///   order, ties in the order they were scheduled.
    pub fn advance(&mut self, by: Duration) {
        let until = self.scheduler.now() + by;
        while let Some((timer, task)) = self.scheduler.pop_due(until) {
            self.run_task(timer, task);
        }
        self.scheduler.set_now(until);
    }

    /// Run timers until none are left.
    ///
    /// # Returns
    /// The virtual time spent. Gives up with a warning after a fixed number
    /// of timers so a self-rearming task cannot spin forever.
    pub fn run_until_idle(&mut self) -> Duration {
        let start = self.scheduler.now();
        let mut fired = 0;
        while let Some((timer, task)) = self.scheduler.pop_due(Duration::MAX) {
            self.run_task(timer, task);
            fired += 1;
            if fired >= IDLE_TIMER_LIMIT {
                warn!(fired, "Timer queue never settled; giving up");
                break;
            }
        }
        self.scheduler.now() - start
    }

    fn run_task(&mut self, timer: TimerId, task: Task) {
        let timings: &Timings = &self.config.timings;
        match task {
            Task::Effect(task) => {
                self.effects
                    .run(&mut self.doc, &mut self.scheduler, timings, timer, task)
            }
            Task::Notification(task) => {
                self.notifications
                    .run(&mut self.doc, &mut self.scheduler, timings, task)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostCall, RecordingHost};
    use crate::test_helpers::front_page;

    fn page() -> Page<RecordingHost> {
        page_with(RecordingHost::new(false))
    }

    fn page_with(host: RecordingHost) -> Page<RecordingHost> {
        Page::new(
            front_page(),
            PageConfig::default(),
            ContentTable::builtin().unwrap(),
            host,
            Viewport::default(),
        )
        .unwrap()
    }

    fn node(page: &Page<RecordingHost>, selector: &str) -> NodeId {
        page.select(selector, 0).unwrap().unwrap()
    }

    fn click(page: &mut Page<RecordingHost>, selector: &str) -> bool {
        let target = node(page, selector);
        page.dispatch(Event::Click { target })
    }

    fn ticker_entry(page: &Page<RecordingHost>, prefix: &str) -> NodeId {
        let doc = page.document();
        page.ticker()
            .unwrap()
            .entries()
            .iter()
            .copied()
            .find(|&e| doc.text_content(e).starts_with(prefix))
            .unwrap()
    }

    #[test]
    fn test_setup_on_front_page() {
        let page = page();
        let ticker = page.ticker().unwrap();
        assert_eq!(ticker.entries().len(), 2 * ticker.original_count());
        assert_eq!(page.progress_width(), Some("0%"));
        assert!(!page.modal_state().unwrap().is_open);
        assert_eq!(page.pending_timers(), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = PageConfig {
            page_url: "eden".to_string(),
            ..PageConfig::default()
        };
        let result = Page::new(
            front_page(),
            config,
            ContentTable::builtin().unwrap(),
            RecordingHost::new(false),
            Viewport::default(),
        );
        assert!(matches!(result, Err(ConfigError::InvalidPageUrl(_))));
    }

    #[test]
    fn test_card_click_opens_modal_and_escape_closes() {
        let mut page = page();
        let prevented = click(&mut page, "#pwd-card h3");
        assert!(prevented);

        let state = page.modal_state().unwrap();
        assert!(state.is_open);
        let article = state.current_article.as_ref().unwrap();
        assert_eq!(article.title.as_deref(), Some("PWD Bamenda Advances to Quarter Finals"));

        let doc = page.document();
        let body = doc.body().unwrap();
        assert_eq!(doc.style(body, "overflow"), Some("hidden"));
        let content = doc.by_id("modalContent").unwrap();
        assert!(doc.text_content(content).contains("Man of the Match"));

        page.dispatch(Event::Key {
            target: None,
            key: "Escape".to_string(),
        });
        assert!(!page.modal_state().unwrap().is_open);
        let doc = page.document();
        assert_eq!(doc.style(doc.body().unwrap(), "overflow"), None);
    }

    #[test]
    fn test_link_inside_card_does_not_open_modal() {
        let mut page = page();
        let prevented = click(&mut page, ".read-more");
        assert!(!prevented);
        assert!(!page.modal_state().unwrap().is_open);
    }

    #[test]
    fn test_backdrop_and_close_control() {
        let mut page = page();
        click(&mut page, "#pwd-card");
        click(&mut page, "#modalContent");
        assert!(page.modal_state().unwrap().is_open);

        click(&mut page, "#articleModal");
        assert!(!page.modal_state().unwrap().is_open);

        click(&mut page, "#pwd-card");
        click(&mut page, ".close-modal");
        assert!(!page.modal_state().unwrap().is_open);
        // Current article survives the close.
        assert!(page.modal_state().unwrap().current_article.is_some());
    }

    #[test]
    fn test_escape_when_closed_is_noop() {
        let mut page = page();
        page.dispatch(Event::Key {
            target: None,
            key: "Escape".to_string(),
        });
        let doc = page.document();
        assert_eq!(doc.style(doc.body().unwrap(), "overflow"), None);
    }

    #[test]
    fn test_ticker_match_opens_article() {
        let mut page = page();
        let entry = ticker_entry(&page, "PWD Bamenda");
        page.dispatch(Event::Click { target: entry });

        let state = page.modal_state().unwrap();
        assert!(state.is_open);
        assert_eq!(
            state.current_article.as_ref().unwrap().category.as_deref(),
            Some("SPORTS")
        );
        assert_eq!(page.notifications().live_count(), 0);
    }

    #[test]
    fn test_ticker_miss_notifies_then_expires() {
        let mut page = page();
        let entry = ticker_entry(&page, "Heavy Rains");
        page.dispatch(Event::Click { target: entry });

        assert!(!page.modal_state().unwrap().is_open);
        assert_eq!(
            page.notifications().titles(),
            vec!["Heavy Rains Expected Across the Littoral Region"]
        );
        assert!(page.select(".ticker-notification", 0).unwrap().is_some());

        page.advance(Duration::from_millis(5499));
        assert_eq!(page.notifications().live_count(), 1);
        page.advance(Duration::from_millis(1));
        assert_eq!(page.notifications().live_count(), 0);
        assert!(page.select(".ticker-notification", 0).unwrap().is_none());
    }

    #[test]
    fn test_notification_click_dismisses() {
        let mut page = page();
        let entry = ticker_entry(&page, "Heavy Rains");
        page.dispatch(Event::Click { target: entry });
        page.dispatch(Event::Click { target: entry });
        assert_eq!(page.notifications().live_count(), 2);

        click(&mut page, ".notification-close");
        assert_eq!(page.notifications().live_count(), 1);
        click(&mut page, ".notification-text");
        assert_eq!(page.notifications().live_count(), 0);

        page.run_until_idle();
        assert_eq!(page.pending_timers(), 0);
    }

    #[test]
    fn test_ticker_hover_pauses_all_entries() {
        let mut page = page();
        let container = node(&page, ".header-news-ticker");
        page.dispatch(Event::MouseEnter { target: container });
        assert!(page.ticker().unwrap().is_paused());
        for &entry in page.ticker().unwrap().entries() {
            assert_eq!(
                page.document().style(entry, "animation-play-state"),
                Some("paused")
            );
        }
        page.dispatch(Event::MouseLeave { target: container });
        assert!(!page.ticker().unwrap().is_paused());
    }

    #[test]
    fn test_ticker_stays_paused_while_moving_over_entries() {
        let mut page = page();
        let container = node(&page, ".header-news-ticker");
        let entry = node(&page, ".ticker-item");
        page.dispatch(Event::MouseEnter { target: container });
        page.dispatch(Event::MouseEnter { target: entry });
        page.dispatch(Event::MouseLeave { target: entry });
        assert!(page.ticker().unwrap().is_paused());
        assert_eq!(
            page.document().style(entry, "animation-play-state"),
            Some("paused")
        );

        page.dispatch(Event::MouseLeave { target: container });
        assert!(!page.ticker().unwrap().is_paused());
    }

    #[test]
    fn test_select_accepts_full_css() {
        let page = page();
        let doc = page.document();

        let latest = page.select("nav a[href]", 0).unwrap().unwrap();
        assert_eq!(doc.attr(latest, "href"), Some("#latest"));
        let contact = page.select("nav > a", 1).unwrap().unwrap();
        assert_eq!(doc.attr(contact, "href"), Some("#contact"));
        assert_eq!(page.select("nav > a", 2).unwrap(), None);
        let sections = page.select("nav a:not([href^='#l'])", 0).unwrap().unwrap();
        assert_eq!(doc.text_content(sections), "Sections");
        let top_level = page.select("nav a:not(.dropdown-content a)", 2).unwrap().unwrap();
        assert_eq!(top_level, contact);

        let first = page.select(".ticker-item:first-child", 0).unwrap().unwrap();
        assert!(doc.text_content(first).starts_with("PWD Bamenda"));

        let card = node(&page, "#pwd-card");
        assert_eq!(doc.attr(card, "class"), Some("article-card"));
        assert!(page.select("nav >", 0).is_err());
    }

    #[test]
    fn test_share_falls_back_to_clipboard() {
        let mut page = page();
        click(&mut page, "#pwd-card");
        click(&mut page, ".share-btn");
        assert_eq!(
            page.host().calls(),
            &[
                HostCall::Clipboard {
                    text: "PWD Bamenda Advances to Quarter Finals - https://eden-newspaper.cm/"
                        .to_string()
                },
                HostCall::Alert {
                    message: "Article link copied to clipboard!".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_share_uses_native_sheet() {
        let mut page = page_with(RecordingHost::new(true));
        click(&mut page, "#pwd-card");
        click(&mut page, ".share-btn");
        assert_eq!(
            page.host().calls(),
            &[HostCall::Share {
                title: "PWD Bamenda Advances to Quarter Finals".to_string(),
                url: "https://eden-newspaper.cm/".to_string(),
            }]
        );
    }

    #[test]
    fn test_bookmark_and_print() {
        let mut page = page();
        click(&mut page, "#pwd-card");
        click(&mut page, ".bookmark-btn");
        click(&mut page, ".print-btn");
        assert_eq!(
            page.host().alerts(),
            vec!["\"PWD Bamenda Advances to Quarter Finals\" has been added to your bookmarks!"]
        );
        assert_eq!(page.host().calls().last(), Some(&HostCall::Print));
    }

    #[test]
    fn test_ticker_article_opens_with_fixed_meta() {
        let mut page = page();
        click(&mut page, ".ticker-article .ticker-title");
        let doc = page.document();
        let date = doc.by_id("modalDate").unwrap();
        assert_eq!(doc.text_content(date), "EDEN Newspaper - Latest News");
        let title = doc.by_id("modalTitle").unwrap();
        assert_eq!(doc.text_content(title), "Local Artist Wins International Award");
        let content = doc.by_id("modalContent").unwrap();
        assert!(doc.text_content(content).contains("African Creativity Award"));
    }

    #[test]
    fn test_search_enter_key_clicks_button() {
        let mut page = page();
        let input = node(&page, ".search-bar input");
        page.dispatch(Event::Focus { target: input });
        page.dispatch(Event::Input {
            target: input,
            value: "Limbe port".to_string(),
        });
        page.dispatch(Event::Key {
            target: None,
            key: "Enter".to_string(),
        });
        assert_eq!(page.host().alerts(), vec!["Searching for: Limbe port"]);

        // The synthetic click also presses the button.
        let button = node(&page, ".search-bar button");
        assert_eq!(page.document().style(button, "transform"), Some("scale(0.95)"));
        page.advance(Duration::from_millis(150));
        assert_eq!(page.document().style(button, "transform"), Some("scale(1)"));
    }

    #[test]
    fn test_newsletter_flow() {
        let mut page = page();
        let input = node(&page, ".newsletter input");
        page.dispatch(Event::Input {
            target: input,
            value: "not-an-email".to_string(),
        });
        click(&mut page, ".newsletter button");
        page.dispatch(Event::Input {
            target: input,
            value: "reader@eden-newspaper.cm".to_string(),
        });
        click(&mut page, ".newsletter button");
        assert_eq!(
            page.host().alerts(),
            vec![
                "Please enter a valid email address",
                "Thank you for subscribing! You will receive our latest news."
            ]
        );
        assert_eq!(page.document().attr(input, "value"), Some(""));
    }

    #[test]
    fn test_nav_anchor_scrolls_smoothly() {
        let mut page = page();
        assert!(click(&mut page, "nav a"));
        assert_eq!(
            page.host().calls(),
            &[HostCall::ScrollIntoView {
                element_id: "latest".to_string()
            }]
        );

        // Dropdown entries keep their default behavior.
        assert!(!click(&mut page, ".dropdown-content a"));
        assert_eq!(page.host().calls().len(), 1);
    }

    #[test]
    fn test_scroll_drives_progress_and_clamps() {
        let mut page = page();
        page.dispatch(Event::Scroll { scroll_y: 1200.0 });
        assert_eq!(page.progress_width(), Some("50%"));
        page.dispatch(Event::Scroll { scroll_y: 99_999.0 });
        assert_eq!(page.progress_width(), Some("100%"));
        assert_eq!(page.viewport().scroll_y, 2400.0);

        page.dispatch(Event::DocumentResized { height: 700.0 });
        page.dispatch(Event::Scroll { scroll_y: 10.0 });
        assert_eq!(page.progress_width(), Some("0%"));
    }

    #[test]
    fn test_resize_toggles_mobile_class() {
        let mut page = page();
        page.dispatch(Event::Resize {
            width: 414.0,
            height: 896.0,
        });
        let doc = page.document();
        assert!(doc.has_class(doc.body().unwrap(), "mobile-animations"));
    }

    #[test]
    fn test_card_press_does_not_pile_up_timers() {
        let mut page = page();
        for _ in 0..5 {
            click(&mut page, "#pwd-card");
        }
        assert_eq!(page.pending_timers(), 1);
        assert_eq!(page.run_until_idle(), Duration::from_millis(150));
        let card = node(&page, "#pwd-card");
        assert_eq!(
            page.document().style(card, "transform"),
            Some("translateY(-8px) scale(1.02)")
        );
    }

    #[test]
    fn test_click_on_detached_element_is_ignored() {
        let mut page = page();
        let entry = ticker_entry(&page, "Heavy Rains");
        page.dispatch(Event::Click { target: entry });
        let close = node(&page, ".notification-close");
        page.dispatch(Event::Click { target: close });
        assert!(!page.dispatch(Event::Click { target: close }));
        assert!(page.host().calls().is_empty());
    }
}
