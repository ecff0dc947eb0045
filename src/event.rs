//! Input events delivered to the page by the host or a driver script.

use crate::dom::NodeId;
use serde::Serialize;

/// A single user or environment event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Click { target: NodeId },
    MouseEnter { target: NodeId },
    MouseLeave { target: NodeId },
    Focus { target: NodeId },
    Blur { target: NodeId },
    /// The user edited a form control.
    Input { target: NodeId, value: String },
    /// Key press. `target` is the focused element, if any.
    Key { target: Option<NodeId>, key: String },
    /// Window scrolled to `scroll_y`.
    Scroll { scroll_y: f64 },
    /// Window resized.
    Resize { width: f64, height: f64 },
    /// Total document height changed (content loaded, images decoded).
    DocumentResized { height: f64 },
    /// Visible fraction of `target` changed, as an intersection observer
    /// would report it.
    Intersect { target: NodeId, ratio: f64 },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Click { .. } => "click",
            Event::MouseEnter { .. } => "mouseenter",
            Event::MouseLeave { .. } => "mouseleave",
            Event::Focus { .. } => "focus",
            Event::Blur { .. } => "blur",
            Event::Input { .. } => "input",
            Event::Key { .. } => "key",
            Event::Scroll { .. } => "scroll",
            Event::Resize { .. } => "resize",
            Event::DocumentResized { .. } => "document_resized",
            Event::Intersect { .. } => "intersect",
        }
    }
}

/// Window geometry used by scroll and resize handlers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_y: f64,
    pub document_height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            scroll_y: 0.0,
            document_height: 3200.0,
        }
    }
}

impl Viewport {
    /// Largest reachable scroll offset. Zero when the document fits.
    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.height).max(0.0)
    }
}
