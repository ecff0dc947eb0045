//! Cosmetic page effects.
//!
//! Each binding maps one event on one element to an inline-style change.
//! Elements are collected once at page load; a binding whose elements are
//! missing simply never fires.
//!
//! # Reverts
//!
//! Press, spin, dropdown and load-more effects apply a style now and undo it
//! later. Each `(element, effect)` pair holds at most one pending revert:
//! re-triggering cancels the old timer before arming a new one, so rapid
//! clicks never leave a stale revert behind.
//!
//! # Hover
//!
//! Enter and leave do not bubble: a hover binding fires only when the event
//! target is the bound element itself. Moving from a card onto its image is
//! not a leave of the card. Clicks do bubble, so press effects fire for any
//! target inside the bound element.

use crate::config::{PageConfig, Timings};
use crate::dom::{selector, Document, NodeId};
use crate::event::Viewport;
use crate::page::Task;
use crate::scheduler::{Scheduler, TimerId};
use crate::utils::{css_number, reading_progress};
use once_cell::sync::Lazy;
use scraper::Selector;
use std::collections::HashMap;
use tracing::{debug, info, instrument, trace};

const PROGRESS_BAR_CSS: &str = "position: fixed; top: 0; left: 0; width: 0%; height: 3px; \
background: linear-gradient(90deg, #e74c3c, #c0392b); z-index: 1001; transition: width 0.3s ease;";

static CARDS: Lazy<Selector> = Lazy::new(|| selector(".article-card"));
static IMAGE: Lazy<Selector> = Lazy::new(|| selector("img"));
static FEATURED_IMAGES: Lazy<Selector> = Lazy::new(|| selector(".featured-article img"));

const CARD_LIFT: &str = "translateY(-8px) scale(1.02)";
const CARD_REST: &str = "translateY(0) scale(1)";

/// Which revert a pending timer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    ButtonPress,
    CardPress,
    LogoSpin,
    Dropdown,
    LoadMore,
    Typewriter,
}

/// Deferred effect work.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectTask {
    /// Set `transform` back on `target`.
    Revert {
        target: NodeId,
        kind: EffectKind,
        transform: &'static str,
    },
    /// Second half of the dropdown fade-in.
    DropdownFadeIn { content: NodeId },
    /// Take a faded-out dropdown out of layout.
    DropdownHide { content: NodeId },
    /// Load-more button finished its simulated fetch.
    LoadMoreReset { button: NodeId },
    /// Type the next character of a heading.
    TypeNext { heading: NodeId, text: Vec<char>, index: usize },
}

impl EffectTask {
    fn key(&self) -> (NodeId, EffectKind) {
        match self {
            EffectTask::Revert { target, kind, .. } => (*target, *kind),
            EffectTask::DropdownFadeIn { content } | EffectTask::DropdownHide { content } => {
                (*content, EffectKind::Dropdown)
            }
            EffectTask::LoadMoreReset { button } => (*button, EffectKind::LoadMore),
            EffectTask::TypeNext { heading, .. } => (*heading, EffectKind::Typewriter),
        }
    }
}

#[derive(Debug, Clone)]
struct Dropdown {
    root: NodeId,
    content: NodeId,
}

/// Element bindings captured at load, plus the pending reverts.
#[derive(Debug, Clone, Default)]
pub struct Effects {
    cards: Vec<NodeId>,
    buttons: Vec<NodeId>,
    nav_links: Vec<NodeId>,
    logo: Option<NodeId>,
    search_input: Option<NodeId>,
    legacy_ticker: Option<NodeId>,
    animate_targets: Vec<NodeId>,
    dropdowns: Vec<Dropdown>,
    load_more: Option<NodeId>,
    progress_bar: Option<NodeId>,
    pending: HashMap<(NodeId, EffectKind), TimerId>,
}

impl Effects {
    /// Collect bindings and apply the load-time effects: card stagger,
    /// reading-progress bar, responsive class and, when enabled, the
    /// typewriter headings.
    #[instrument(level = "info", skip_all)]
    pub fn bind(
        doc: &mut Document,
        scheduler: &mut Scheduler<Task>,
        config: &PageConfig,
        viewport: &Viewport,
    ) -> Self {
        let cards = doc.query_all(&CARDS);
        for (index, &card) in cards.iter().enumerate() {
            doc.set_style(card, "animation-delay", &format!("{}s", css_number(index as f64 / 10.0)));
        }

        let dropdowns = doc
            .query_all(&selector(".dropdown"))
            .into_iter()
            .filter_map(|root| {
                doc.query_first_within(root, &selector(".dropdown-content"))
                    .map(|content| Dropdown { root, content })
            })
            .collect();

        let progress_bar = doc.body().map(|body| {
            let bar = doc.create_element("div");
            doc.add_class(bar, "reading-progress");
            doc.set_css_text(bar, PROGRESS_BAR_CSS);
            doc.append_child(body, bar);
            bar
        });

        let mut effects = Self {
            cards,
            buttons: doc.query_all(&selector("button, .category-btn")),
            nav_links: doc.query_all(&selector("nav a")),
            logo: doc.query_first(&selector(".logo h1")),
            search_input: doc.query_first(&selector(".search-bar input")),
            legacy_ticker: doc.query_first(&selector(".ticker span")),
            animate_targets: doc.query_all(&selector(".article-card, .sidebar-section, .featured-article")),
            dropdowns,
            load_more: doc.by_id("load-more-btn"),
            progress_bar,
            pending: HashMap::new(),
        };
        effects.on_resize(doc, config, viewport);
        if config.typewriter_headings {
            effects.start_typewriter(doc, scheduler, config.timings.typewriter);
        }

        info!(
            cards = effects.cards.len(),
            buttons = effects.buttons.len(),
            dropdowns = effects.dropdowns.len(),
            animate_targets = effects.animate_targets.len(),
            "Page effects bound"
        );
        effects
    }

    /// Number of reverts waiting on a timer.
    pub fn pending_reverts(&self) -> usize {
        self.pending.len()
    }

    pub fn progress_bar(&self) -> Option<NodeId> {
        self.progress_bar
    }

    /// Current width of the reading-progress bar.
    pub fn progress_width<'a>(&self, doc: &'a Document) -> Option<&'a str> {
        self.progress_bar.and_then(|bar| doc.style(bar, "width"))
    }

    /// Arm a revert, replacing any still pending for the same element and
    /// effect.
    fn arm(&mut self, scheduler: &mut Scheduler<Task>, delay: u64, task: EffectTask) {
        let key = task.key();
        if let Some(previous) = self.pending.remove(&key) {
            if scheduler.cancel(previous) {
                trace!(element = %key.0, kind = ?key.1, "Superseded pending revert");
            }
        }
        let timer = scheduler.schedule(Timings::ms(delay), Task::Effect(task));
        self.pending.insert(key, timer);
    }

    /// Press feedback for a click. Bubbles: every bound card, button, logo
    /// or load-more button containing `target` reacts.
    ///
    /// # Arguments
    /// * `doc` - Page being styled.
    /// * `scheduler` - Where the revert timers are armed.
    /// * `timings` - Press, spin and load-more durations.
    /// * `target` - Innermost clicked element.
    pub fn on_click(
        &mut self,
        doc: &mut Document,
        scheduler: &mut Scheduler<Task>,
        timings: &Timings,
        target: NodeId,
    ) {
        let cards: Vec<NodeId> = self
            .cards
            .iter()
            .copied()
            .filter(|&card| doc.contains(card, target))
            .collect();
        for card in cards {
            doc.set_style(card, "transform", "scale(0.98)");
            self.arm(
                scheduler,
                timings.press,
                EffectTask::Revert {
                    target: card,
                    kind: EffectKind::CardPress,
                    transform: CARD_LIFT,
                },
            );
        }

        let buttons: Vec<NodeId> = self
            .buttons
            .iter()
            .copied()
            .filter(|&button| doc.contains(button, target))
            .collect();
        for button in buttons {
            doc.set_style(button, "transform", "scale(0.95)");
            self.arm(
                scheduler,
                timings.press,
                EffectTask::Revert {
                    target: button,
                    kind: EffectKind::ButtonPress,
                    transform: "scale(1)",
                },
            );
        }

        if let Some(logo) = self.logo.filter(|&logo| doc.contains(logo, target)) {
            doc.set_style(logo, "transform", "scale(1.1) rotate(5deg)");
            self.arm(
                scheduler,
                timings.logo_spin,
                EffectTask::Revert {
                    target: logo,
                    kind: EffectKind::LogoSpin,
                    transform: "scale(1) rotate(0deg)",
                },
            );
        }

        if let Some(button) = self.load_more.filter(|&b| doc.contains(b, target)) {
            doc.add_class(button, "loading");
            doc.set_text(button, "Loading...");
            self.arm(scheduler, timings.load_more, EffectTask::LoadMoreReset { button });
            debug!("Loading more articles");
        }
    }

    /// Pointer entered `target`. Only bindings on `target` itself react.
    ///
    /// # Arguments
    /// * `doc` - Page being styled.
    /// * `scheduler` - Where the dropdown fade-in is armed.
    /// * `timings` - Dropdown fade-in delay.
    /// * `target` - Element the pointer entered.
    pub fn on_enter(
        &mut self,
        doc: &mut Document,
        scheduler: &mut Scheduler<Task>,
        timings: &Timings,
        target: NodeId,
    ) {
        if self.cards.contains(&target) {
            doc.set_style(target, "transform", CARD_LIFT);
            doc.set_style(target, "box-shadow", "0 15px 30px rgba(0,0,0,0.2)");
            if let Some(img) = doc.query_first_within(target, &IMAGE) {
                doc.set_style(img, "transform", "scale(1.1)");
            }
        }

        if self.nav_links.contains(&target) {
            doc.set_style(target, "transform", "translateY(-2px)");
        }

        if self.legacy_ticker == Some(target) {
            doc.set_style(target, "animation-play-state", "paused");
        }

        if let Some(content) = self.dropdown_content(target) {
            doc.set_style(content, "opacity", "0");
            doc.set_style(content, "transform", "translateY(-10px)");
            doc.set_style(content, "display", "block");
            self.arm(scheduler, timings.dropdown_fade_in, EffectTask::DropdownFadeIn { content });
        }
    }

    /// Pointer left `target`. The mirror of [`Effects::on_enter`].
    ///
    /// # Arguments
    /// * `doc` - Page being styled.
    /// * `scheduler` - Where the dropdown hide is armed.
    /// * `timings` - Dropdown hide delay.
    /// * `target` - Element the pointer left.
    pub fn on_leave(
        &mut self,
        doc: &mut Document,
        scheduler: &mut Scheduler<Task>,
        timings: &Timings,
        target: NodeId,
    ) {
        if self.cards.contains(&target) {
            doc.set_style(target, "transform", CARD_REST);
            doc.set_style(target, "box-shadow", "0 2px 5px rgba(0,0,0,0.1)");
            if let Some(img) = doc.query_first_within(target, &IMAGE) {
                doc.set_style(img, "transform", "scale(1)");
            }
        }

        if self.nav_links.contains(&target) {
            doc.set_style(target, "transform", "translateY(0)");
        }

        if self.legacy_ticker == Some(target) {
            doc.set_style(target, "animation-play-state", "running");
        }

        if let Some(content) = self.dropdown_content(target) {
            doc.set_style(content, "opacity", "0");
            doc.set_style(content, "transform", "translateY(-10px)");
            self.arm(scheduler, timings.dropdown_hide, EffectTask::DropdownHide { content });
        }
    }

    fn dropdown_content(&self, root: NodeId) -> Option<NodeId> {
        self.dropdowns.iter().find(|d| d.root == root).map(|d| d.content)
    }

    /// Glow around the search bar while its input has focus.
    pub fn on_focus(&self, doc: &mut Document, target: NodeId) {
        if let Some(wrapper) = self.search_wrapper(doc, target) {
            doc.set_style(wrapper, "transform", "scale(1.02)");
            doc.set_style(wrapper, "box-shadow", "0 0 20px rgba(231, 76, 60, 0.3)");
        }
    }

    pub fn on_blur(&self, doc: &mut Document, target: NodeId) {
        if let Some(wrapper) = self.search_wrapper(doc, target) {
            doc.set_style(wrapper, "transform", "scale(1)");
            doc.set_style(wrapper, "box-shadow", "none");
        }
    }

    fn search_wrapper(&self, doc: &Document, target: NodeId) -> Option<NodeId> {
        self.search_input
            .filter(|&input| input == target)
            .and_then(|input| doc.parent(input))
    }

    /// Parallax on featured images and the reading-progress bar.
    ///
    /// # Arguments
    /// * `doc` - Page being styled.
    /// * `config` - Parallax rate and factor.
    /// * `viewport` - Current scroll offset and document height.
    pub fn on_scroll(&self, doc: &mut Document, config: &PageConfig, viewport: &Viewport) {
        let offset = viewport.scroll_y * config.parallax_rate * config.parallax_factor;
        let transform = format!("translateY({}px)", css_number(offset));
        let images = doc.query_all(&FEATURED_IMAGES);
        for img in images {
            doc.set_style(img, "transform", &transform);
        }

        if let Some(bar) = self.progress_bar {
            let pct = reading_progress(viewport.scroll_y, viewport.max_scroll());
            doc.set_style(bar, "width", &format!("{}%", css_number(pct)));
            trace!(scroll_y = viewport.scroll_y, pct, "Reading progress");
        }
    }

    /// Toggle `mobile-animations` on the body around the breakpoint.
    pub fn on_resize(&self, doc: &mut Document, config: &PageConfig, viewport: &Viewport) {
        let Some(body) = doc.body() else {
            return;
        };
        if viewport.width <= config.mobile_breakpoint_px {
            doc.add_class(body, "mobile-animations");
        } else {
            doc.remove_class(body, "mobile-animations");
        }
    }

    /// Entrance animation once enough of a watched element is visible.
    pub fn on_intersect(&self, doc: &mut Document, config: &PageConfig, target: NodeId, ratio: f64) {
        if ratio > 0.0 && ratio >= config.animate_threshold && self.animate_targets.contains(&target) {
            doc.add_class(target, "animate-in");
        }
    }

    fn start_typewriter(&mut self, doc: &mut Document, scheduler: &mut Scheduler<Task>, delay: u64) {
        for heading in doc.query_all(&selector("h1")) {
            let text: Vec<char> = doc.text_content(heading).chars().collect();
            doc.set_text(heading, "");
            self.type_next(doc, scheduler, delay, heading, text, 0);
        }
    }

    fn type_next(
        &mut self,
        doc: &mut Document,
        scheduler: &mut Scheduler<Task>,
        delay: u64,
        heading: NodeId,
        text: Vec<char>,
        index: usize,
    ) {
        let Some(&c) = text.get(index) else {
            return;
        };
        doc.append_text(heading, c.encode_utf8(&mut [0; 4]));
        if index + 1 < text.len() {
            self.arm(
                scheduler,
                delay,
                EffectTask::TypeNext { heading, text, index: index + 1 },
            );
        }
    }

    /// Run a fired effect timer.
    pub fn run(
        &mut self,
        doc: &mut Document,
        scheduler: &mut Scheduler<Task>,
        timings: &Timings,
        timer: TimerId,
        task: EffectTask,
    ) {
        let key = task.key();
        if self.pending.get(&key) == Some(&timer) {
            self.pending.remove(&key);
        }
        match task {
            EffectTask::Revert { target, transform, .. } => {
                doc.set_style(target, "transform", transform);
            }
            EffectTask::DropdownFadeIn { content } => {
                doc.set_style(content, "opacity", "1");
                doc.set_style(content, "transform", "translateY(0)");
            }
            EffectTask::DropdownHide { content } => {
                doc.set_style(content, "display", "none");
            }
            EffectTask::LoadMoreReset { button } => {
                doc.remove_class(button, "loading");
                doc.set_text(button, "Load More Articles");
            }
            EffectTask::TypeNext { heading, text, index } => {
                self.type_next(doc, scheduler, timings.typewriter, heading, text, index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const PAGE: &str = r##"<body>
        <nav><a href="#top" id="home">Home</a>
          <div class="dropdown" id="more"><a href="#">More</a>
            <div class="dropdown-content" id="menu"><a href="#x">X</a></div></div></nav>
        <div class="logo"><h1 id="logo">EDEN</h1></div>
        <div class="search-bar" id="search"><input id="q"><button id="go">Go</button></div>
        <div class="featured-article"><img id="hero" src="hero.jpg"><h2>Lead</h2></div>
        <div class="article-card" id="c0"><img id="c0img" src="a.jpg"><h3>First</h3></div>
        <div class="article-card" id="c1"><h3>Second</h3></div>
        <div class="article-card" id="c2"><h3>Third</h3></div>
        <aside class="sidebar-section" id="side"></aside>
        <button id="load-more-btn">Load More Articles</button>
    </body>"##;

    struct Fixture {
        doc: Document,
        scheduler: Scheduler<Task>,
        effects: Effects,
        config: PageConfig,
        viewport: Viewport,
    }

    impl Fixture {
        fn with_config(config: PageConfig) -> Self {
            let mut doc = Document::parse(PAGE);
            let mut scheduler = Scheduler::new();
            let viewport = Viewport::default();
            let effects = Effects::bind(&mut doc, &mut scheduler, &config, &viewport);
            Self { doc, scheduler, effects, config, viewport }
        }

        fn new() -> Self {
            Self::with_config(PageConfig::default())
        }

        fn id(&self, id: &str) -> NodeId {
            self.doc.by_id(id).unwrap()
        }

        fn click(&mut self, id: &str) {
            let target = self.id(id);
            self.effects
                .on_click(&mut self.doc, &mut self.scheduler, &self.config.timings, target);
        }

        fn enter(&mut self, id: &str) {
            let target = self.id(id);
            self.effects
                .on_enter(&mut self.doc, &mut self.scheduler, &self.config.timings, target);
        }

        fn leave(&mut self, id: &str) {
            let target = self.id(id);
            self.effects
                .on_leave(&mut self.doc, &mut self.scheduler, &self.config.timings, target);
        }

        fn advance_to(&mut self, ms: u64) {
            let until = Duration::from_millis(ms);
            while let Some((timer, task)) = self.scheduler.pop_due(until) {
                if let Task::Effect(task) = task {
                    self.effects.run(
                        &mut self.doc,
                        &mut self.scheduler,
                        &self.config.timings,
                        timer,
                        task,
                    );
                }
            }
            self.scheduler.set_now(until);
        }

        fn transform(&self, id: &str) -> Option<&str> {
            self.doc.style(self.id(id), "transform")
        }
    }

    #[test]
    fn test_cards_get_staggered_delay() {
        let fx = Fixture::new();
        assert_eq!(fx.doc.style(fx.id("c0"), "animation-delay"), Some("0s"));
        assert_eq!(fx.doc.style(fx.id("c1"), "animation-delay"), Some("0.1s"));
        assert_eq!(fx.doc.style(fx.id("c2"), "animation-delay"), Some("0.2s"));
    }

    #[test]
    fn test_card_hover_lifts_and_zooms_image() {
        let mut fx = Fixture::new();
        fx.enter("c0");
        assert_eq!(fx.transform("c0"), Some(CARD_LIFT));
        assert_eq!(fx.doc.style(fx.id("c0"), "box-shadow"), Some("0 15px 30px rgba(0,0,0,0.2)"));
        assert_eq!(fx.transform("c0img"), Some("scale(1.1)"));

        fx.leave("c0");
        assert_eq!(fx.transform("c0"), Some(CARD_REST));
        assert_eq!(fx.transform("c0img"), Some("scale(1)"));
        assert_eq!(fx.transform("c1"), None);
    }

    #[test]
    fn test_hover_does_not_bubble_from_children() {
        let mut fx = Fixture::new();
        fx.enter("c0img");
        assert_eq!(fx.transform("c0"), None);

        fx.enter("c0");
        fx.leave("c0img");
        assert_eq!(fx.transform("c0"), Some(CARD_LIFT));
        assert_eq!(fx.transform("c0img"), Some("scale(1.1)"));

        // Leaving the dropdown's own link is not leaving the dropdown.
        fx.enter("more");
        fx.advance_to(50);
        let link = fx.doc.query_first_within(fx.id("more"), &selector("a")).unwrap();
        fx.effects
            .on_leave(&mut fx.doc, &mut fx.scheduler, &fx.config.timings, link);
        fx.advance_to(1000);
        assert_eq!(fx.doc.style(fx.id("menu"), "opacity"), Some("1"));
    }

    #[test]
    fn test_button_press_reverts_after_delay() {
        let mut fx = Fixture::new();
        fx.click("go");
        assert_eq!(fx.transform("go"), Some("scale(0.95)"));
        fx.advance_to(149);
        assert_eq!(fx.transform("go"), Some("scale(0.95)"));
        fx.advance_to(150);
        assert_eq!(fx.transform("go"), Some("scale(1)"));
        assert_eq!(fx.effects.pending_reverts(), 0);
    }

    #[test]
    fn test_retrigger_cancels_previous_revert() {
        let mut fx = Fixture::new();
        fx.click("go");
        fx.advance_to(100);
        fx.click("go");
        assert_eq!(fx.scheduler.pending(), 1);

        // The first press would have reverted at 150.
        fx.advance_to(200);
        assert_eq!(fx.transform("go"), Some("scale(0.95)"));
        fx.advance_to(250);
        assert_eq!(fx.transform("go"), Some("scale(1)"));
    }

    #[test]
    fn test_card_press_returns_to_lift() {
        let mut fx = Fixture::new();
        fx.click("c1");
        assert_eq!(fx.transform("c1"), Some("scale(0.98)"));
        fx.advance_to(150);
        assert_eq!(fx.transform("c1"), Some(CARD_LIFT));
    }

    #[test]
    fn test_logo_spin() {
        let mut fx = Fixture::new();
        fx.click("logo");
        assert_eq!(fx.transform("logo"), Some("scale(1.1) rotate(5deg)"));
        fx.advance_to(300);
        assert_eq!(fx.transform("logo"), Some("scale(1) rotate(0deg)"));
    }

    #[test]
    fn test_nav_hover() {
        let mut fx = Fixture::new();
        fx.enter("home");
        assert_eq!(fx.transform("home"), Some("translateY(-2px)"));
        fx.leave("home");
        assert_eq!(fx.transform("home"), Some("translateY(0)"));
    }

    #[test]
    fn test_dropdown_fade_in_and_hide() {
        let mut fx = Fixture::new();
        fx.enter("more");
        let menu = fx.id("menu");
        assert_eq!(fx.doc.style(menu, "display"), Some("block"));
        assert_eq!(fx.doc.style(menu, "opacity"), Some("0"));
        fx.advance_to(50);
        assert_eq!(fx.doc.style(menu, "opacity"), Some("1"));
        assert_eq!(fx.doc.style(menu, "transform"), Some("translateY(0)"));

        fx.leave("more");
        assert_eq!(fx.doc.style(menu, "opacity"), Some("0"));
        assert_eq!(fx.doc.style(menu, "display"), Some("block"));
        fx.advance_to(350);
        assert_eq!(fx.doc.style(menu, "display"), Some("none"));
    }

    #[test]
    fn test_dropdown_reenter_cancels_pending_hide() {
        let mut fx = Fixture::new();
        fx.enter("more");
        fx.advance_to(50);
        fx.leave("more");
        fx.advance_to(200);
        fx.enter("more");
        fx.advance_to(1000);
        let menu = fx.id("menu");
        assert_eq!(fx.doc.style(menu, "display"), Some("block"));
        assert_eq!(fx.doc.style(menu, "opacity"), Some("1"));
    }

    #[test]
    fn test_search_focus_glow() {
        let mut fx = Fixture::new();
        let input = fx.id("q");
        fx.effects.on_focus(&mut fx.doc, input);
        assert_eq!(fx.transform("search"), Some("scale(1.02)"));
        assert_eq!(
            fx.doc.style(fx.id("search"), "box-shadow"),
            Some("0 0 20px rgba(231, 76, 60, 0.3)")
        );
        fx.effects.on_blur(&mut fx.doc, input);
        assert_eq!(fx.transform("search"), Some("scale(1)"));
        assert_eq!(fx.doc.style(fx.id("search"), "box-shadow"), Some("none"));
    }

    #[test]
    fn test_load_more_cycle() {
        let mut fx = Fixture::new();
        fx.click("load-more-btn");
        let button = fx.id("load-more-btn");
        assert!(fx.doc.has_class(button, "loading"));
        assert_eq!(fx.doc.text_content(button), "Loading...");
        fx.advance_to(2000);
        assert!(!fx.doc.has_class(button, "loading"));
        assert_eq!(fx.doc.text_content(button), "Load More Articles");
    }

    #[test]
    fn test_scroll_parallax_and_progress() {
        let mut fx = Fixture::new();
        assert_eq!(fx.effects.progress_width(&fx.doc), Some("0%"));

        fx.viewport.scroll_y = 1200.0;
        fx.effects.on_scroll(&mut fx.doc, &fx.config, &fx.viewport);
        assert_eq!(fx.transform("hero"), Some("translateY(-60px)"));
        assert_eq!(fx.effects.progress_width(&fx.doc), Some("50%"));

        fx.viewport.scroll_y = 0.0;
        fx.effects.on_scroll(&mut fx.doc, &fx.config, &fx.viewport);
        assert_eq!(fx.transform("hero"), Some("translateY(0px)"));
    }

    #[test]
    fn test_progress_guarded_when_document_fits() {
        let mut fx = Fixture::new();
        fx.viewport.document_height = 600.0;
        fx.viewport.scroll_y = 10.0;
        fx.effects.on_scroll(&mut fx.doc, &fx.config, &fx.viewport);
        assert_eq!(fx.effects.progress_width(&fx.doc), Some("0%"));
    }

    #[test]
    fn test_mobile_class_follows_breakpoint() {
        let mut fx = Fixture::new();
        let body = fx.doc.body().unwrap();
        assert!(!fx.doc.has_class(body, "mobile-animations"));
        fx.viewport.width = 768.0;
        fx.effects.on_resize(&mut fx.doc, &fx.config, &fx.viewport);
        assert!(fx.doc.has_class(body, "mobile-animations"));
        fx.viewport.width = 769.0;
        fx.effects.on_resize(&mut fx.doc, &fx.config, &fx.viewport);
        assert!(!fx.doc.has_class(body, "mobile-animations"));
    }

    #[test]
    fn test_intersect_threshold() {
        let mut fx = Fixture::new();
        let side = fx.id("side");
        fx.effects.on_intersect(&mut fx.doc, &fx.config, side, 0.05);
        assert!(!fx.doc.has_class(side, "animate-in"));
        fx.effects.on_intersect(&mut fx.doc, &fx.config, side, 0.1);
        assert!(fx.doc.has_class(side, "animate-in"));

        let hero = fx.id("hero");
        fx.effects.on_intersect(&mut fx.doc, &fx.config, hero, 1.0);
        assert!(!fx.doc.has_class(hero, "animate-in"));
    }

    #[test]
    fn test_typewriter_retypes_headings() {
        let config = PageConfig {
            typewriter_headings: true,
            ..PageConfig::default()
        };
        let mut fx = Fixture::with_config(config);
        let logo = fx.id("logo");
        assert_eq!(fx.doc.text_content(logo), "E");
        fx.advance_to(100);
        assert_eq!(fx.doc.text_content(logo), "ED");
        fx.advance_to(300);
        assert_eq!(fx.doc.text_content(logo), "EDEN");
        assert_eq!(fx.scheduler.pending(), 0);
    }
}
