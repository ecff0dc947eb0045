//! Browser capabilities the page cannot perform on its own document.
//!
//! The controllers call through [`Host`] for blocking alerts, the share
//! sheet, the clipboard, printing and smooth scrolling. [`RecordingHost`]
//! keeps every call in order, which is what the tests and the CLI session
//! report read back.

use serde::Serialize;
use tracing::info;

/// Side effects outside the document.
pub trait Host {
    /// Blocking `alert()`.
    fn alert(&mut self, message: &str);

    /// Native share sheet. Returns `false` when the platform has none, in
    /// which case the caller falls back to the clipboard.
    fn share(&mut self, title: &str, url: &str) -> bool;

    fn write_clipboard(&mut self, text: &str);

    fn print(&mut self);

    /// Smooth-scroll the element with `element_id` into view.
    fn scroll_into_view(&mut self, element_id: &str);
}

/// One recorded host interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostCall {
    Alert { message: String },
    Share { title: String, url: String },
    Clipboard { text: String },
    Print,
    ScrollIntoView { element_id: String },
}

/// [`Host`] that records calls and logs them.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    /// Whether [`Host::share`] reports native share support.
    pub share_supported: bool,
    calls: Vec<HostCall>,
}

impl RecordingHost {
    pub fn new(share_supported: bool) -> Self {
        Self {
            share_supported,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Messages of every alert so far.
    pub fn alerts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Alert { message } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }
}

impl Host for RecordingHost {
    fn alert(&mut self, message: &str) {
        info!(%message, "alert");
        self.calls.push(HostCall::Alert {
            message: message.to_string(),
        });
    }

    fn share(&mut self, title: &str, url: &str) -> bool {
        if !self.share_supported {
            return false;
        }
        info!(%title, %url, "share");
        self.calls.push(HostCall::Share {
            title: title.to_string(),
            url: url.to_string(),
        });
        true
    }

    fn write_clipboard(&mut self, text: &str) {
        info!(%text, "clipboard write");
        self.calls.push(HostCall::Clipboard {
            text: text.to_string(),
        });
    }

    fn print(&mut self) {
        info!("print");
        self.calls.push(HostCall::Print);
    }

    fn scroll_into_view(&mut self, element_id: &str) {
        info!(%element_id, "smooth scroll");
        self.calls.push(HostCall::ScrollIntoView {
            element_id: element_id.to_string(),
        });
    }
}
