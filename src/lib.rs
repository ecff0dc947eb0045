//! # EDEN Newsdesk
//!
//! A headless runtime for the interactive parts of the EDEN Newspaper front
//! page. The page HTML is parsed into an in-memory [`dom::Document`]; events
//! from a browser shell, a test, or a scripted reader session are delivered
//! to a [`page::Page`], which mutates the document the way the site's
//! script does in a browser.
//!
//! ## Modules
//!
//! | Module | Role |
//! |---|---|
//! | [`dom`] | mutable `scraper` document: selectors, styles and classes |
//! | [`event`] | input events and viewport geometry |
//! | [`scheduler`] | virtual-time one-shot timers |
//! | [`host`] | alerts, share, clipboard, print, smooth scroll |
//! | [`email`] | newsletter address check |
//! | [`content`] | article bodies for the modal, with generic fallback |
//! | [`modal`] | the single article modal |
//! | [`ticker`] | breaking-news ticker duplication, pause and click matching |
//! | [`notification`] | transient "Breaking News" toasts |
//! | [`effects`] | hover, press, dropdown, parallax and progress effects |
//! | [`forms`] | search and newsletter boxes |
//! | [`page`] | the page-lifetime state and event dispatch |
//! | [`script`] | YAML reader sessions and their report |
//!
//! ## Example
//!
//! ```
//! use eden_newsdesk::{config::PageConfig, content::ContentTable, dom::Document};
//! use eden_newsdesk::{event::{Event, Viewport}, host::RecordingHost, page::Page};
//!
//! let doc = Document::parse(r#"<body>
//!   <div class="article-card"><div class="category">SPORTS</div><h3>Derby day</h3></div>
//!   <div id="articleModal"><h2 id="modalTitle"></h2><div id="modalContent"></div></div>
//! </body>"#);
//! let mut page = Page::new(
//!     doc,
//!     PageConfig::default(),
//!     ContentTable::builtin().unwrap(),
//!     RecordingHost::new(false),
//!     Viewport::default(),
//! )
//! .unwrap();
//!
//! let card = page.select(".article-card h3", 0).unwrap().unwrap();
//! page.dispatch(Event::Click { target: card });
//! assert!(page.modal_state().unwrap().is_open);
//! ```

pub mod cli;
pub mod config;
pub mod content;
pub mod dom;
pub mod effects;
pub mod email;
pub mod event;
pub mod forms;
pub mod host;
pub mod modal;
pub mod models;
pub mod notification;
pub mod page;
pub mod scheduler;
pub mod script;
pub mod ticker;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_helpers;
