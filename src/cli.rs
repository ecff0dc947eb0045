//! Command-line interface definitions for EDEN Newsdesk.
//!
//! This module defines the CLI arguments using the `clap` crate. The binary
//! loads a front page, optionally replays a reader session against it and
//! prints what the page did.

use clap::Parser;

/// Command-line arguments for the EDEN Newsdesk runner.
///
/// # Examples
///
/// ```sh
/// # Load the page and report its initial state
/// eden_newsdesk --page demos/index.html
///
/// # Replay a session on a phone-sized viewport, as JSON
/// eden_newsdesk -p demos/index.html -s demos/session.yaml --width 414 --height 896 --json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Front page HTML file
    #[arg(short, long)]
    pub page: String,

    /// Reader session script (YAML list of steps)
    #[arg(short, long)]
    pub script: Option<String>,

    /// Optional path to a page config YAML file
    #[arg(short, long, env = "EDEN_CONFIG")]
    pub config: Option<String>,

    /// Content table YAML; overrides `content_path` from the config
    #[arg(long)]
    pub content: Option<String>,

    /// Initial viewport width in CSS pixels
    #[arg(long, default_value_t = 1280.0)]
    pub width: f64,

    /// Initial viewport height in CSS pixels
    #[arg(long, default_value_t = 800.0)]
    pub height: f64,

    /// Total document height in CSS pixels
    #[arg(long, default_value_t = 3200.0)]
    pub document_height: f64,

    /// Sleep through script waits instead of skipping ahead
    #[arg(long)]
    pub realtime: bool,

    /// Print the session report as JSON
    #[arg(long)]
    pub json: bool,
}
