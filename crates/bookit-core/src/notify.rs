// ── Toast notifications ──
//
// Transient user-facing messages, independent of the store. Each toast
// gets its own timer task: visible for `display`, then flagged as leaving
// for `exit`, then removed. Lifecycle changes are broadcast so any surface
// can render them.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, EnumString};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::config::NotificationConfig;

const EVENT_CHANNEL_SIZE: usize = 64;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
    Warning,
    Info,
}

/// A live toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    pub shown_at: DateTime<Utc>,
    /// In its exit transition.
    pub leaving: bool,
}

/// Toast lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastEvent {
    Shown(Toast),
    Leaving(u64),
    Removed(u64),
}

/// Cheaply cloneable handle to the toast queue.
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<NotifierInner>,
}

struct NotifierInner {
    config: NotificationConfig,
    toasts: Mutex<VecDeque<Toast>>,
    next_id: AtomicU64,
    events: broadcast::Sender<ToastEvent>,
    cancel: CancellationToken,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(NotificationConfig::default())
    }
}

impl Notifier {
    pub fn new(config: NotificationConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        Self {
            inner: Arc::new(NotifierInner {
                config,
                toasts: Mutex::new(VecDeque::new()),
                next_id: AtomicU64::new(1),
                events,
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.inner.config
    }

    /// Show a toast and schedule its removal. Returns the toast id.
    ///
    /// Outside a tokio runtime no timer is scheduled and the toast stays
    /// until [`dismiss`](Self::dismiss) is called.
    pub fn show(&self, message: impl Into<String>, level: NotificationLevel) -> u64 {
        let toast = Toast {
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
            message: message.into(),
            level,
            shown_at: Utc::now(),
            leaving: false,
        };
        let id = toast.id;
        debug!(id, %level, message = %toast.message, "toast");

        let evicted = {
            let mut toasts = self.inner.toasts.lock().unwrap_or_else(PoisonError::into_inner);
            toasts.push_back(toast.clone());
            let mut evicted = Vec::new();
            if let Some(max) = self.inner.config.max_visible {
                while toasts.len() > max.max(1) {
                    if let Some(old) = toasts.pop_front() {
                        evicted.push(old.id);
                    }
                }
            }
            evicted
        };

        for old in evicted {
            trace!(id = old, "toast evicted");
            let _ = self.inner.events.send(ToastEvent::Removed(old));
        }
        let _ = self.inner.events.send(ToastEvent::Shown(toast));

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(toast_timer(Arc::clone(&self.inner), id));
        }
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.show(message, NotificationLevel::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.show(message, NotificationLevel::Error)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.show(message, NotificationLevel::Warning)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.show(message, NotificationLevel::Info)
    }

    /// Remove a toast immediately. Returns `false` if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        self.inner.remove(id)
    }

    /// Live toasts, oldest first.
    pub fn active(&self) -> Vec<Toast> {
        self.inner
            .toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ToastEvent> {
        self.inner.events.subscribe()
    }

    /// Stop all pending timers. Live toasts stay until dismissed.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("config", &self.inner.config)
            .field("active", &self.active().len())
            .finish_non_exhaustive()
    }
}

impl NotifierInner {
    fn mark_leaving(&self, id: u64) -> bool {
        let mut toasts = self.toasts.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(toast) = toasts.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        toast.leaving = true;
        drop(toasts);
        let _ = self.events.send(ToastEvent::Leaving(id));
        true
    }

    fn remove(&self, id: u64) -> bool {
        let mut toasts = self.toasts.lock().unwrap_or_else(PoisonError::into_inner);
        let before = toasts.len();
        toasts.retain(|t| t.id != id);
        let removed = toasts.len() != before;
        drop(toasts);
        if removed {
            let _ = self.events.send(ToastEvent::Removed(id));
        }
        removed
    }
}

async fn toast_timer(inner: Arc<NotifierInner>, id: u64) {
    let cancel = inner.cancel.clone();
    tokio::select! {
        () = cancel.cancelled() => return,
        () = tokio::time::sleep(inner.config.display) => {}
    }
    // Evicted or dismissed while visible.
    if !inner.mark_leaving(id) {
        return;
    }
    tokio::select! {
        () = cancel.cancelled() => {}
        () = tokio::time::sleep(inner.config.exit) => {
            inner.remove(id);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn capped(max: Option<usize>) -> Notifier {
        Notifier::new(NotificationConfig {
            max_visible: max,
            ..NotificationConfig::default()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn toast_leaves_then_disappears() {
        let notifier = Notifier::default();
        let mut events = notifier.subscribe();

        let id = notifier.success("Reservation created successfully");
        assert!(matches!(events.recv().await.unwrap(), ToastEvent::Shown(ref t) if t.id == id));
        assert_eq!(notifier.active().len(), 1);

        tokio::time::sleep(Duration::from_millis(5_001)).await;
        assert!(notifier.active()[0].leaving);
        assert_eq!(events.recv().await.unwrap(), ToastEvent::Leaving(id));

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(notifier.active().is_empty());
        assert_eq!(events.recv().await.unwrap(), ToastEvent::Removed(id));
    }

    #[tokio::test(start_paused = true)]
    async fn timers_are_independent() {
        let notifier = Notifier::default();
        let first = notifier.info("first");
        tokio::time::sleep(Duration::from_secs(2)).await;
        let second = notifier.info("second");

        tokio::time::sleep(Duration::from_millis(3_400)).await;
        let ids: Vec<u64> = notifier.active().iter().map(|t| t.id).collect();
        assert_eq!(ids, [second]);
        assert_ne!(first, second);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(notifier.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cap_evicts_oldest() {
        let notifier = capped(Some(2));
        let a = notifier.warning("a");
        let b = notifier.warning("b");
        let c = notifier.warning("c");

        let ids: Vec<u64> = notifier.active().iter().map(|t| t.id).collect();
        assert_eq!(ids, [b, c]);
        assert!(!notifier.dismiss(a));
    }

    #[tokio::test(start_paused = true)]
    async fn unbounded_keeps_everything() {
        let notifier = capped(None);
        for i in 0..20 {
            notifier.error(format!("failure {i}"));
        }
        assert_eq!(notifier.active().len(), 20);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_timers() {
        let notifier = Notifier::default();
        notifier.info("stays");
        notifier.shutdown();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(notifier.active().len(), 1);
    }

    #[test]
    fn without_runtime_toast_persists_until_dismissed() {
        let notifier = Notifier::default();
        let id = notifier.show("offline", NotificationLevel::Info);
        assert_eq!(notifier.active().len(), 1);
        assert!(notifier.dismiss(id));
        assert!(notifier.active().is_empty());
    }
}
