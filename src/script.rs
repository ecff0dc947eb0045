//! Scripted reader sessions.
//!
//! A session is a YAML list of steps. Each step may wait (virtual time, or
//! wall-clock time with `--realtime`) and then performs exactly one action
//! on the page:
//!
//! ```yaml
//! - click: ".article-card h3"
//!   nth: 0
//! - wait_ms: 500
//!   key: Escape
//! - input: ".newsletter input"
//!   value: reader@eden-newspaper.cm
//! - scroll: 1200
//! - resize: { width: 414, height: 896 }
//! ```
//!
//! Element actions take a CSS selector (anything [`Page::select`] accepts)
//! and an optional `nth` to pick among several matches.

use crate::dom::{NodeId, QueryError};
use crate::event::Event;
use crate::host::{Host, HostCall, RecordingHost};
use crate::models::ModalState;
use crate::page::Page;
use crate::utils::truncate_for_log;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeStep {
    pub width: f64,
    pub height: f64,
}

/// One line of a session script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Step {
    /// Time to let pass before the action.
    pub wait_ms: u64,
    /// Which match of the selector to act on.
    pub nth: usize,
    pub click: Option<String>,
    pub hover: Option<String>,
    pub leave: Option<String>,
    pub focus: Option<String>,
    pub blur: Option<String>,
    /// Form control to edit; goes with `value`.
    pub input: Option<String>,
    pub value: Option<String>,
    /// Key name, delivered to the focused element.
    pub key: Option<String>,
    pub scroll: Option<f64>,
    pub resize: Option<ResizeStep>,
    pub document_height: Option<f64>,
    /// Element whose visibility changes; goes with `ratio` (default 1).
    pub intersect: Option<String>,
    pub ratio: Option<f64>,
}

/// A step's action with its target still unresolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Action<'a> {
    Click(&'a str),
    Hover(&'a str),
    Leave(&'a str),
    Focus(&'a str),
    Blur(&'a str),
    Input(&'a str, &'a str),
    Key(&'a str),
    Scroll(f64),
    Resize(ResizeStep),
    DocumentHeight(f64),
    Intersect(&'a str, f64),
}

impl Step {
    /// The single action this step performs.
    pub fn action(&self, index: usize) -> Result<Action<'_>, ScriptError> {
        let mut found = Vec::new();
        if let Some(s) = &self.click {
            found.push(("click", Action::Click(s)));
        }
        if let Some(s) = &self.hover {
            found.push(("hover", Action::Hover(s)));
        }
        if let Some(s) = &self.leave {
            found.push(("leave", Action::Leave(s)));
        }
        if let Some(s) = &self.focus {
            found.push(("focus", Action::Focus(s)));
        }
        if let Some(s) = &self.blur {
            found.push(("blur", Action::Blur(s)));
        }
        if let Some(s) = &self.input {
            let value = self
                .value
                .as_deref()
                .ok_or(ScriptError::MissingValue { step: index })?;
            found.push(("input", Action::Input(s, value)));
        }
        if let Some(k) = &self.key {
            found.push(("key", Action::Key(k)));
        }
        if let Some(y) = self.scroll {
            found.push(("scroll", Action::Scroll(y)));
        }
        if let Some(r) = self.resize {
            found.push(("resize", Action::Resize(r)));
        }
        if let Some(h) = self.document_height {
            found.push(("document_height", Action::DocumentHeight(h)));
        }
        if let Some(s) = &self.intersect {
            found.push(("intersect", Action::Intersect(s, self.ratio.unwrap_or(1.0))));
        }

        match found.len() {
            0 => Err(ScriptError::NoAction { step: index }),
            1 => Ok(found.remove(0).1),
            _ => Err(ScriptError::MultipleActions {
                step: index,
                actions: found.iter().map(|(name, _)| *name).collect(),
            }),
        }
    }
}

#[derive(Debug)]
pub enum ScriptError {
    NoAction { step: usize },
    MultipleActions { step: usize, actions: Vec<&'static str> },
    MissingValue { step: usize },
    BadSelector { step: usize, source: QueryError },
    NoMatch { step: usize, selector: String, nth: usize },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::NoAction { step } => write!(f, "step {step}: no action given"),
            ScriptError::MultipleActions { step, actions } => write!(
                f,
                "step {step}: expected one action, found {}",
                actions.iter().join(", ")
            ),
            ScriptError::MissingValue { step } => {
                write!(f, "step {step}: `input` needs a `value`")
            }
            ScriptError::BadSelector { step, source } => write!(f, "step {step}: {source}"),
            ScriptError::NoMatch { step, selector, nth } => {
                write!(f, "step {step}: no match #{nth} for `{selector}`")
            }
        }
    }
}

impl Error for ScriptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ScriptError::BadSelector { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Parse and check a session script. Steps are numbered from 1 in errors.
pub fn parse_script(yaml: &str) -> Result<Vec<Step>, Box<dyn Error>> {
    if yaml.trim().is_empty() {
        return Ok(Vec::new());
    }
    let steps: Vec<Step> = serde_yaml::from_str(yaml)?;
    for (i, step) in steps.iter().enumerate() {
        step.action(i + 1)?;
    }
    Ok(steps)
}

#[instrument(level = "info", skip_all, fields(%path))]
pub async fn load_script(path: &str) -> Result<Vec<Step>, Box<dyn Error>> {
    let yaml = fs::read_to_string(path).await?;
    let steps = parse_script(&yaml)?;
    info!(steps = steps.len(), "Loaded session script");
    Ok(steps)
}

/// What one step did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub step: usize,
    /// Virtual time when the action ran, in milliseconds.
    pub at_ms: u64,
    pub event: Event,
    pub default_prevented: bool,
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn resolve<H: Host>(
    page: &Page<H>,
    step: usize,
    selector: &str,
    nth: usize,
) -> Result<NodeId, ScriptError> {
    page.select(selector, nth)
        .map_err(|source| ScriptError::BadSelector { step, source })?
        .ok_or_else(|| ScriptError::NoMatch {
            step,
            selector: selector.to_string(),
            nth,
        })
}

fn to_event<H: Host>(page: &Page<H>, step: usize, nth: usize, action: Action<'_>) -> Result<Event, ScriptError> {
    let event = match action {
        Action::Click(s) => Event::Click { target: resolve(page, step, s, nth)? },
        Action::Hover(s) => Event::MouseEnter { target: resolve(page, step, s, nth)? },
        Action::Leave(s) => Event::MouseLeave { target: resolve(page, step, s, nth)? },
        Action::Focus(s) => Event::Focus { target: resolve(page, step, s, nth)? },
        Action::Blur(s) => Event::Blur { target: resolve(page, step, s, nth)? },
        Action::Input(s, value) => Event::Input {
            target: resolve(page, step, s, nth)?,
            value: value.to_string(),
        },
        Action::Key(key) => Event::Key {
            target: None,
            key: key.to_string(),
        },
        Action::Scroll(scroll_y) => Event::Scroll { scroll_y },
        Action::Resize(r) => Event::Resize {
            width: r.width,
            height: r.height,
        },
        Action::DocumentHeight(height) => Event::DocumentResized { height },
        Action::Intersect(s, ratio) => Event::Intersect {
            target: resolve(page, step, s, nth)?,
            ratio,
        },
    };
    Ok(event)
}

/// Replay `steps` against `page`, then let every pending timer fire.
///
/// With `realtime` each wait also sleeps on the tokio clock, so a host
/// watching the page sees the session at reading pace.
#[instrument(level = "info", skip_all, fields(steps = steps.len(), realtime = realtime))]
pub async fn run_session<H: Host>(
    page: &mut Page<H>,
    steps: &[Step],
    realtime: bool,
) -> Result<Vec<StepOutcome>, Box<dyn Error>> {
    let mut outcomes = Vec::with_capacity(steps.len());
    for (i, step) in steps.iter().enumerate() {
        let index = i + 1;
        if step.wait_ms > 0 {
            let wait = Duration::from_millis(step.wait_ms);
            if realtime {
                tokio::time::sleep(wait).await;
            }
            page.advance(wait);
        }
        let action = step.action(index)?;
        let event = to_event(page, index, step.nth, action)?;
        debug!(step = index, event = event.name(), "Dispatching");
        let default_prevented = page.dispatch(event.clone());
        outcomes.push(StepOutcome {
            step: index,
            at_ms: millis(page.now()),
            event,
            default_prevented,
        });
    }

    let settled = page.run_until_idle();
    info!(
        steps = outcomes.len(),
        settled_ms = millis(settled),
        "Session finished"
    );
    Ok(outcomes)
}

/// End-of-session summary printed by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub steps: Vec<StepOutcome>,
    pub elapsed_ms: u64,
    pub host_calls: Vec<HostCall>,
    pub modal: Option<ModalState>,
    pub notifications: Vec<String>,
    pub progress_width: Option<String>,
    pub ticker_paused: bool,
}

impl SessionReport {
    pub fn collect(page: &Page<RecordingHost>, steps: Vec<StepOutcome>) -> Self {
        Self {
            steps,
            elapsed_ms: millis(page.now()),
            host_calls: page.host().calls().to_vec(),
            modal: page.modal_state().cloned(),
            notifications: page
                .notifications()
                .titles()
                .into_iter()
                .map(str::to_string)
                .collect(),
            progress_width: page.progress_width().map(str::to_string),
            ticker_paused: page.ticker().is_some_and(|t| t.is_paused()),
        }
    }
}

fn describe_call(call: &HostCall) -> String {
    match call {
        HostCall::Alert { message } => format!("alert: {}", truncate_for_log(message, 120)),
        HostCall::Share { title, url } => format!("share: {title} <{url}>"),
        HostCall::Clipboard { text } => format!("clipboard: {}", truncate_for_log(text, 120)),
        HostCall::Print => "print".to_string(),
        HostCall::ScrollIntoView { element_id } => format!("scroll to #{element_id}"),
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Session: {} steps over {} ms", self.steps.len(), self.elapsed_ms)?;
        for outcome in &self.steps {
            writeln!(
                f,
                "  [{:>6} ms] step {}: {}{}",
                outcome.at_ms,
                outcome.step,
                outcome.event.name(),
                if outcome.default_prevented { " (default prevented)" } else { "" }
            )?;
        }

        let calls = self.host_calls.iter().map(describe_call).join("\n  ");
        if calls.is_empty() {
            writeln!(f, "Host calls: none")?;
        } else {
            writeln!(f, "Host calls:\n  {calls}")?;
        }

        match &self.modal {
            None => writeln!(f, "Modal: not on page")?,
            Some(state) => {
                let title = state
                    .current_article
                    .as_ref()
                    .map(|a| a.lookup_title())
                    .unwrap_or("");
                let status = if state.is_open { "open" } else { "closed" };
                writeln!(f, "Modal: {status} {title}")?;
            }
        }
        writeln!(
            f,
            "Notifications: {}",
            if self.notifications.is_empty() {
                "none".to_string()
            } else {
                self.notifications.iter().join(" | ")
            }
        )?;
        writeln!(
            f,
            "Reading progress: {}",
            self.progress_width.as_deref().unwrap_or("n/a")
        )?;
        write!(f, "Ticker: {}", if self.ticker_paused { "paused" } else { "running" })
    }
}
