//! Transient "Breaking News" notifications.
//!
//! Each notification is a fixed-position element appended to `<body>`. It
//! expires on its own: after the time-to-live it starts its exit animation
//! and is removed once that finishes. Clicking the notification (or its
//! close button) removes it at once and cancels its pending timers.
//! Any number may be on screen together; each owns its own timers.

use crate::config::Timings;
use crate::dom::{selector, Document, NodeId};
use crate::page::Task;
use crate::scheduler::{Scheduler, TimerId};
use crate::utils::truncate_for_log;
use once_cell::sync::Lazy;
use scraper::Selector;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

static NOTIFICATION: Lazy<Selector> = Lazy::new(|| selector(".ticker-notification"));

const NOTIFICATION_CSS: &str = "position: fixed; top: 20px; right: 20px; \
background: linear-gradient(135deg, #e74c3c, #c0392b); color: white; padding: 15px 20px; \
border-radius: 8px; box-shadow: 0 4px 12px rgba(0,0,0,0.3); z-index: 10001; \
max-width: 300px; animation: slideInRight 0.5s ease-out; cursor: pointer;";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NotificationId(u64);

/// Deferred notification work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationTask {
    /// Time-to-live elapsed: start the exit animation.
    Expire(NotificationId),
    /// Exit animation finished: take it off the page.
    Remove(NotificationId),
}

#[derive(Debug, Clone)]
struct Live {
    id: NotificationId,
    element: NodeId,
    title: String,
    created_at: Duration,
    timer: Option<TimerId>,
}

/// Owner of every notification currently on the page.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    next_id: u64,
    live: Vec<Live>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notifications on screen.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Headlines on screen, oldest first.
    pub fn titles(&self) -> Vec<&str> {
        self.live.iter().map(|n| n.title.as_str()).collect()
    }

    pub fn element(&self, id: NotificationId) -> Option<NodeId> {
        self.live.iter().find(|n| n.id == id).map(|n| n.element)
    }

    pub fn created_at(&self, id: NotificationId) -> Option<Duration> {
        self.live.iter().find(|n| n.id == id).map(|n| n.created_at)
    }

    /// Build the notification for `title`, attach it to `body` and arm its
    /// expiry timer.
    pub fn show(
        &mut self,
        doc: &mut Document,
        body: NodeId,
        scheduler: &mut Scheduler<Task>,
        timings: &Timings,
        title: &str,
    ) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;

        let element = doc.create_element("div");
        doc.add_class(element, "ticker-notification");
        doc.set_css_text(element, NOTIFICATION_CSS);

        let content = doc.create_element("div");
        doc.add_class(content, "notification-content");
        doc.append_child(element, content);

        let icon = doc.create_element("span");
        doc.add_class(icon, "notification-icon");
        doc.set_text(icon, "📰");
        doc.append_child(content, icon);

        let text = doc.create_element("div");
        doc.add_class(text, "notification-text");
        let label = doc.create_element("strong");
        doc.set_text(label, "Breaking News:");
        doc.append_child(text, label);
        let line_break = doc.create_element("br");
        doc.append_child(text, line_break);
        doc.append_text(text, title);
        doc.append_child(content, text);

        let close = doc.create_element("button");
        doc.add_class(close, "notification-close");
        doc.set_text(close, "×");
        doc.append_child(content, close);

        doc.append_child(body, element);

        let timer = scheduler.schedule(
            Timings::ms(timings.notification_ttl),
            Task::Notification(NotificationTask::Expire(id)),
        );
        self.live.push(Live {
            id,
            element,
            title: title.to_string(),
            created_at: scheduler.now(),
            timer: Some(timer),
        });
        info!(
            ?id,
            title = %truncate_for_log(title, 80),
            live = self.live.len(),
            "Breaking news notification shown"
        );
        id
    }

    /// The live notification containing `target`, if any. Covers both the
    /// notification body and its close button.
    pub fn notification_for(&self, doc: &Document, target: NodeId) -> Option<NotificationId> {
        let element = doc.closest(target, &NOTIFICATION)?;
        self.live.iter().find(|n| n.element == element).map(|n| n.id)
    }

    /// Remove immediately and cancel whatever timer is still pending.
    pub fn dismiss(
        &mut self,
        doc: &mut Document,
        scheduler: &mut Scheduler<Task>,
        id: NotificationId,
    ) -> bool {
        let Some(index) = self.live.iter().position(|n| n.id == id) else {
            return false;
        };
        let live = self.live.remove(index);
        if let Some(timer) = live.timer {
            scheduler.cancel(timer);
        }
        doc.remove(live.element);
        info!(?id, "Notification dismissed");
        true
    }

    /// Run a fired notification timer.
    pub fn run(
        &mut self,
        doc: &mut Document,
        scheduler: &mut Scheduler<Task>,
        timings: &Timings,
        task: NotificationTask,
    ) {
        match task {
            NotificationTask::Expire(id) => {
                let Some(live) = self.live.iter_mut().find(|n| n.id == id) else {
                    return;
                };
                if !doc.is_connected(live.element) {
                    return;
                }
                doc.set_style(live.element, "animation", "slideOutRight 0.5s ease-in");
                live.timer = Some(scheduler.schedule(
                    Timings::ms(timings.notification_exit),
                    Task::Notification(NotificationTask::Remove(id)),
                ));
                debug!(?id, "Notification exiting");
            }
            NotificationTask::Remove(id) => {
                if let Some(index) = self.live.iter().position(|n| n.id == id) {
                    let live = self.live.remove(index);
                    doc.remove(live.element);
                    debug!(?id, "Notification expired");
                }
            }
        }
    }
}
