//! Shared helpers for command handlers.

use std::future::Future;
use std::io::IsTerminal;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use secrecy::SecretString;

use bookit_core::{AppController, User};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Validate the stored token and return the signed-in user.
pub async fn require_session(controller: &AppController) -> Result<User, CliError> {
    Ok(controller.resume_session().await?)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, global: &GlobalOpts) -> Result<bool, CliError> {
    if global.yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.trim_end_matches('?').into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer / terminal failure into `CliError`.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::validation("interactive", format!("prompt failed: {e}"))
}

/// Read a password without echo.
pub fn prompt_password(prompt: &str) -> Result<SecretString, CliError> {
    let password = rpassword::prompt_password(prompt).map_err(prompt_err)?;
    if password.is_empty() {
        return Err(CliError::validation("password", "must not be empty"));
    }
    Ok(SecretString::from(password))
}

/// Read a new password twice; `BOOKIT_PASSWORD` skips the prompt.
pub fn prompt_new_password() -> Result<SecretString, CliError> {
    if let Ok(pw) = std::env::var("BOOKIT_PASSWORD") {
        return Ok(SecretString::from(pw));
    }
    let first = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
    let second = rpassword::prompt_password("Repeat password: ").map_err(prompt_err)?;
    if first != second {
        return Err(CliError::validation("password", "passwords do not match"));
    }
    if first.is_empty() {
        return Err(CliError::validation("password", "must not be empty"));
    }
    Ok(SecretString::from(first))
}

// ── Time ─────────────────────────────────────────────────────────────

/// Parse a reservation bound.
///
/// Accepts RFC 3339 (`2030-05-01T09:00:00Z`), the space-separated form
/// without an offset (taken as UTC), or `+<duration>` relative to `now`.
pub fn parse_time(field: &str, raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, CliError> {
    let raw = raw.trim();
    if let Some(offset) = raw.strip_prefix('+') {
        return shift(field, now, offset);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    humantime::parse_rfc3339_weak(raw)
        .map(DateTime::<Utc>::from)
        .map_err(|e| CliError::validation(field, format!("'{raw}' is not a timestamp: {e}")))
}

/// Parse a humantime span such as `90m` or `1h 30m`.
pub fn parse_duration(field: &str, raw: &str) -> Result<TimeDelta, CliError> {
    let span = humantime::parse_duration(raw.trim())
        .map_err(|e| CliError::validation(field, format!("'{raw}' is not a duration: {e}")))?;
    TimeDelta::from_std(span).map_err(|_| CliError::validation(field, "duration is too large"))
}

/// `at` moved forward by the span in `raw`.
pub fn shift(field: &str, at: DateTime<Utc>, raw: &str) -> Result<DateTime<Utc>, CliError> {
    at.checked_add_signed(parse_duration(field, raw)?)
        .ok_or_else(|| CliError::validation(field, "time is out of range"))
}

/// `in 2h 5m` / `3h ago`, rounded to the minute.
pub fn relative(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = at - now;
    let minutes = delta.num_minutes().unsigned_abs();
    if minutes == 0 {
        return "now".into();
    }
    let span = humantime::format_duration(Duration::from_secs(minutes * 60));
    if delta > TimeDelta::zero() {
        format!("in {span}")
    } else {
        format!("{span} ago")
    }
}

pub fn short_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

// ── Progress ─────────────────────────────────────────────────────────

/// Run `fut` behind a stderr spinner when attached to a terminal.
pub async fn with_spinner<F: Future>(global: &GlobalOpts, message: &str, fut: F) -> F::Output {
    if global.quiet || !std::io::stderr().is_terminal() {
        return fut.await;
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(Duration::from_millis(80));
    let out = fut.await;
    spinner.finish_and_clear();
    out
}
