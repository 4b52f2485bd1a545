//! Reservation command handlers.

use chrono::{DateTime, Utc};
use tabled::Tabled;

use bookit_core::{AppController, Reservation, ReservationHistory};

use crate::cli::{GlobalOpts, OutputFormat, ReservationsArgs, ReservationsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReservationRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "When")]
    when: String,
}

impl ReservationRow {
    fn new(r: &Reservation, now: DateTime<Utc>) -> Self {
        Self {
            id: r.id,
            resource: r.resource_label(),
            start: util::short_time(r.start_time),
            end: util::short_time(r.end_time),
            status: r.status.to_string(),
            when: if r.is_active() {
                util::relative(r.start_time, now)
            } else {
                String::from("-")
            },
        }
    }
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Details")]
    details: String,
}

impl From<&ReservationHistory> for HistoryRow {
    fn from(h: &ReservationHistory) -> Self {
        Self {
            time: util::short_time(h.timestamp),
            action: h.action.clone(),
            user: h.user_id.map(|id| id.to_string()).unwrap_or_default(),
            details: h.details.clone().unwrap_or_default(),
        }
    }
}

/// Table view shared with the dashboard.
pub(super) fn table(reservations: &[Reservation], now: DateTime<Utc>) -> String {
    output::render_list(
        OutputFormat::Table,
        reservations,
        |r| ReservationRow::new(r, now),
        |r| r.id.to_string(),
    )
}

fn print_list(list: &[Reservation], global: &GlobalOpts) {
    let now = Utc::now();
    let out = output::render_list(
        global.output,
        list,
        |r| ReservationRow::new(r, now),
        |r| r.id.to_string(),
    );
    output::print_output(&out, global.quiet);
}

/// End of the booking window from `--end` or `--duration`.
fn window_end(
    start: DateTime<Utc>,
    end: Option<&str>,
    duration: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, CliError> {
    match (end, duration) {
        (Some(end), _) => util::parse_time("end", end, now),
        (None, Some(span)) => util::shift("duration", start, span),
        (None, None) => Err(CliError::validation("end", "pass --end or --duration")),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &AppController,
    args: ReservationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_session(controller).await?;
    let service = &controller.services().reservations;

    match args.command {
        ReservationsCommand::List {
            include_cancelled,
            upcoming,
        } => {
            let list = util::with_spinner(
                global,
                "Loading reservations",
                service.load_reservations(include_cancelled),
            )
            .await?;
            if upcoming {
                print_list(&service.get_upcoming_reservations(), global);
            } else {
                print_list(&list, global);
            }
            Ok(())
        }

        ReservationsCommand::Create {
            resource_id,
            start,
            end,
            duration,
        } => {
            let now = Utc::now();
            let start = util::parse_time("start", &start, now)?;
            let end = window_end(start, end.as_deref(), duration.as_deref(), now)?;

            let created = service.create_reservation(resource_id, start, end).await?;
            let out = output::render_single(
                global.output,
                &created,
                |r| table(std::slice::from_ref(r), Utc::now()),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ReservationsCommand::Cancel { id } => {
            let known = service.load_reservations(false).await?;
            if let Some(existing) = known.iter().find(|r| r.id == id) {
                if !service.can_cancel_reservation(existing) {
                    return Err(CliError::validation(
                        "id",
                        format!("reservation {id} has already started"),
                    ));
                }
            }
            if !util::confirm(&format!("Cancel reservation {id}?"), global)? {
                return Ok(());
            }
            service.cancel_reservation(id).await?;
            Ok(())
        }

        ReservationsCommand::History { id } => {
            let history = service.get_reservation_history(id).await?;
            let out = output::render_list(global.output, &history, |h| HistoryRow::from(h), |h| {
                h.action.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
