//! # EDEN Newsdesk
//!
//! Loads the EDEN Newspaper front page into the headless page runtime,
//! replays an optional reader session against it and prints a report of
//! what the page did: alerts, shares, the modal, notifications and the
//! reading-progress bar.
//!
//! ## Usage
//!
//! ```sh
//! eden_newsdesk --page demos/index.html --script demos/session.yaml
//! ```
//!
//! ## Flow
//!
//! 1. **Configuration**: page config and content table, defaults when absent
//! 2. **Load**: parse the page and run its load-time setup
//! 3. **Session**: dispatch each scripted step, then drain pending timers
//! 4. **Output**: text summary, or JSON with `--json`

use clap::Parser;
use eden_newsdesk::cli::Cli;
use eden_newsdesk::config::PageConfig;
use eden_newsdesk::content::ContentTable;
use eden_newsdesk::dom::Document;
use eden_newsdesk::event::Viewport;
use eden_newsdesk::host::RecordingHost;
use eden_newsdesk::page::Page;
use eden_newsdesk::script::{load_script, run_session, SessionReport};
use std::error::Error;
use tokio::fs;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("eden_newsdesk starting up");

    let args = Cli::parse();
    debug!(?args.page, ?args.script, ?args.config, "Parsed CLI arguments");

    // --- Configuration ---
    let config = match &args.config {
        Some(path) => PageConfig::load(path).await?,
        None => {
            info!("No config given; using defaults");
            PageConfig::default()
        }
    };

    let content_path = args.content.as_deref().or(config.content_path.as_deref());
    let content = match content_path {
        Some(path) => ContentTable::load(path).await?,
        None => ContentTable::builtin()?,
    };

    // --- Load page ---
    let html = match fs::read_to_string(&args.page).await {
        Ok(html) => html,
        Err(e) => {
            error!(path = %args.page, error = %e, "Could not read page");
            return Err(e.into());
        }
    };
    let doc = Document::parse(&html);
    let viewport = Viewport {
        width: args.width,
        height: args.height,
        scroll_y: 0.0,
        document_height: args.document_height,
    };
    let mut page = Page::new(doc, config, content, RecordingHost::new(false), viewport)?;

    // --- Session ---
    let steps = match &args.script {
        Some(path) => load_script(path).await?,
        None => Vec::new(),
    };
    let outcomes = run_session(&mut page, &steps, args.realtime).await?;
    let report = SessionReport::collect(&page, outcomes);

    // --- Output ---
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    info!(
        elapsed_secs = start_time.elapsed().as_secs_f64(),
        virtual_ms = report.elapsed_ms,
        host_calls = report.host_calls.len(),
        "eden_newsdesk finished"
    );
    Ok(())
}
