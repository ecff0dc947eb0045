//! Shared fixtures for unit tests.

use crate::dom::Document;

/// Demo front page shipped under `demos/`.
pub const FRONT_PAGE_HTML: &str = include_str!("../demos/index.html");

/// A freshly parsed copy of the demo front page.
pub fn front_page() -> Document {
    Document::parse(FRONT_PAGE_HTML)
}
