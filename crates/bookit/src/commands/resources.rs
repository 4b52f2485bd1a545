//! Resource command handlers.

use tabled::Tabled;

use bookit_core::{AppController, AvailabilityInfo, Resource, ResourceFilter};

use crate::cli::{
    AvailabilityFilter, GlobalOpts, OutputFormat, ResourceListArgs, ResourcesArgs,
    ResourcesCommand,
};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Available")]
    available: String,
}

impl From<&Resource> for ResourceRow {
    fn from(r: &Resource) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            tags: r.tags.join(", "),
            available: output::yes_no(r.available),
        }
    }
}

/// Table view shared with the dashboard.
pub(super) fn table(resources: &[Resource]) -> String {
    output::render_list(
        OutputFormat::Table,
        resources,
        |r| ResourceRow::from(r),
        |r| r.id.to_string(),
    )
}

impl From<AvailabilityFilter> for ResourceFilter {
    fn from(filter: AvailabilityFilter) -> Self {
        match filter {
            AvailabilityFilter::All => Self::All,
            AvailabilityFilter::Available => Self::Available,
            AvailabilityFilter::Unavailable => Self::Unavailable,
        }
    }
}

fn availability_detail(info: &AvailabilityInfo) -> String {
    let mut lines = vec![
        format!(
            "Available now: {}",
            output::yes_no(info.is_currently_available)
        ),
        format!("Bookable:      {}", output::yes_no(info.base_available)),
        format!("Checked at:    {}", util::short_time(info.current_time)),
    ];
    if !info.reservations.is_empty() {
        lines.push(String::from("Reserved:"));
        for r in &info.reservations {
            lines.push(format!(
                "  {} - {}",
                util::short_time(r.start_time),
                util::short_time(r.end_time)
            ));
        }
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &AppController,
    args: ResourcesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_session(controller).await?;
    let service = &controller.services().resources;

    match args.command {
        ResourcesCommand::List(list) => list_page(controller, list, global).await,

        ResourcesCommand::Search {
            query,
            available_only,
        } => {
            let found = service.search_remote(&query, available_only).await?;
            let out = output::render_list(global.output, &found, |r| ResourceRow::from(r), |r| {
                r.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResourcesCommand::Availability { id } => {
            let info = service.availability(id).await?;
            let out = output::render_single(global.output, &info, availability_detail, |i| {
                i.is_currently_available.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResourcesCommand::Create {
            name,
            tags,
            unavailable,
        } => {
            let created = service.create_resource(&name, tags, !unavailable).await?;
            let out = output::render_single(
                global.output,
                &created,
                |r| table(std::slice::from_ref(r)),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

/// Load everything, then narrow and page locally through the store.
async fn list_page(
    controller: &AppController,
    args: ResourceListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let service = &controller.services().resources;
    util::with_spinner(global, "Loading resources", service.load_resources()).await?;

    let store = controller.store();
    if let Some(per_page) = args.per_page {
        if per_page == 0 {
            return Err(CliError::validation("per-page", "must be at least 1"));
        }
        store.set_items_per_page(per_page);
    }
    service.search(args.search.as_deref().unwrap_or_default());
    service.set_filter(args.filter.into());
    service.set_page(args.page);

    let state = store.state();
    let rows: &[Resource] = if args.all {
        &state.filtered_resources
    } else {
        state.current_page_resources()
    };

    let out = output::render_list(global.output, rows, |r| ResourceRow::from(r), |r| {
        r.id.to_string()
    });
    output::print_output(&out, global.quiet);

    if global.output == OutputFormat::Table && !args.all {
        output::status(
            &format!(
                "Page {} of {} ({} matching)",
                state.current_page,
                state.total_pages,
                state.filtered_resources.len()
            ),
            global.quiet,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn filter_flag_maps_to_store_filter() {
        assert_eq!(
            ResourceFilter::from(AvailabilityFilter::Unavailable),
            ResourceFilter::Unavailable
        );
        assert_eq!(ResourceFilter::from(AvailabilityFilter::All), ResourceFilter::All);
    }

    #[test]
    fn row_joins_tags() {
        let r = Resource {
            id: 4,
            name: "Room B".into(),
            tags: vec!["projector".into(), "whiteboard".into()],
            available: false,
        };
        let row = ResourceRow::from(&r);
        assert_eq!(row.tags, "projector, whiteboard");
        assert_eq!(row.available, "no");
    }

    #[test]
    fn availability_detail_without_bookings() {
        let info = AvailabilityInfo {
            is_currently_available: true,
            base_available: true,
            current_time: Utc
                .with_ymd_and_hms(2030, 1, 1, 12, 0, 0)
                .single()
                .unwrap_or_default(),
            reservations: vec![],
        };
        let text = availability_detail(&info);
        assert!(text.starts_with("Available now: yes"));
        assert!(!text.contains("Reserved:"));
    }
}
