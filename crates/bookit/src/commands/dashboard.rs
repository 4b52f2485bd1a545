//! Dashboard command: restore the session and summarize what the
//! dashboard view shows.

use chrono::Utc;
use serde::Serialize;

use bookit_core::{AppController, Reservation, Resource, SystemStatus, User, ViewKind};

use crate::cli::{DashboardArgs, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::{reservations, resources, util};

#[derive(Serialize)]
struct DashboardView {
    user: Option<User>,
    page: usize,
    total_pages: usize,
    resources: Vec<Resource>,
    upcoming: Vec<Reservation>,
    system: Option<SystemStatus>,
}

pub async fn handle(
    controller: &AppController,
    args: DashboardArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let view = util::with_spinner(global, "Loading dashboard", controller.start()).await;
    if view != ViewKind::Dashboard {
        return Err(CliError::NotLoggedIn);
    }
    if let Some(per_page) = args.per_page {
        controller.store().set_items_per_page(per_page);
    }

    let state = controller.store().state();
    let dashboard = DashboardView {
        user: state.current_user.clone(),
        page: state.current_page,
        total_pages: state.total_pages,
        resources: state.current_page_resources().to_vec(),
        upcoming: state.upcoming_reservations_at(Utc::now()),
        system: state.system_status.clone(),
    };

    if global.output != OutputFormat::Table {
        let out = output::render_single(global.output, &dashboard, |_| String::new(), |d| {
            d.user
                .as_ref()
                .map(|u| u.username.clone())
                .unwrap_or_default()
        });
        output::print_output(&out, global.quiet);
        return Ok(());
    }

    let now = Utc::now();
    let mut sections = Vec::new();

    sections.push(format!(
        "Resources (page {} of {})",
        dashboard.page, dashboard.total_pages
    ));
    sections.push(or_none(resources::table(&dashboard.resources)));

    sections.push(format!("Upcoming reservations ({})", dashboard.upcoming.len()));
    sections.push(or_none(reservations::table(&dashboard.upcoming, now)));

    if let Some(ref system) = dashboard.system {
        sections.push(format!("Server: {}", system.status));
    }

    output::print_output(&sections.join("\n"), global.quiet);
    Ok(())
}

fn or_none(table: String) -> String {
    if table.is_empty() {
        "  (none)".into()
    } else {
        table
    }
}
