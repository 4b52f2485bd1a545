//! Console surface for the controller: the view renderer and the toast
//! printer. Both write to stderr so stdout stays machine-readable.

use chrono::Utc;
use owo_colors::OwoColorize;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::debug;

use bookit_core::{AppState, NotificationLevel, Notifier, ToastEvent, ViewKind, ViewRenderer};

use crate::output;

// ── View renderer ────────────────────────────────────────────────────

/// Prints a one-line banner when the dashboard comes up.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleRenderer {
    banner: bool,
    color: bool,
}

impl ConsoleRenderer {
    pub fn new(banner: bool, color: bool) -> Self {
        Self { banner, color }
    }
}

impl ViewRenderer for ConsoleRenderer {
    fn mount(&mut self, view: ViewKind, state: &AppState) {
        debug!(%view, "mount");
        if view != ViewKind::Dashboard || !self.banner {
            return;
        }
        eprintln!("{}", dashboard_banner(state, self.color));
    }

    fn unmount(&mut self, view: ViewKind) {
        debug!(%view, "unmount");
    }
}

fn dashboard_banner(state: &AppState, color: bool) -> String {
    let user = state
        .current_user
        .as_ref()
        .map_or("(unknown)", |u| u.username.as_str());
    let upcoming = state.upcoming_reservations_at(Utc::now()).len();
    let summary = format!(
        "{} resources · {} upcoming reservations",
        state.resources.len(),
        upcoming
    );
    if color {
        format!("Signed in as {} · {}", user.bold(), summary.dimmed())
    } else {
        format!("Signed in as {user} · {summary}")
    }
}

// ── Toasts ───────────────────────────────────────────────────────────

/// Drains notifier events and prints each shown toast once.
pub struct ToastPrinter {
    events: broadcast::Receiver<ToastEvent>,
    color: bool,
    quiet: bool,
}

impl ToastPrinter {
    pub fn new(notifier: &Notifier, color: bool, quiet: bool) -> Self {
        Self {
            events: notifier.subscribe(),
            color,
            quiet,
        }
    }

    /// Print pending toasts. Error toasts are dropped when `skip_errors`
    /// is set, since the failing command reports the error itself.
    pub fn flush(&mut self, skip_errors: bool) {
        loop {
            match self.events.try_recv() {
                Ok(ToastEvent::Shown(toast)) => {
                    let is_error = toast.level == NotificationLevel::Error;
                    if self.quiet || (skip_errors && is_error) {
                        continue;
                    }
                    eprintln!("{}", output::format_toast(&toast, self.color));
                }
                Ok(ToastEvent::Leaving(_) | ToastEvent::Removed(_)) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "toast events dropped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }
}
