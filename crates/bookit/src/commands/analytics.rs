//! Analytics handlers.
//!
//! Report payloads vary per report, so table mode lays out whatever JSON
//! comes back: arrays of objects as a table, objects as key/value lines.

use std::path::Path;

use serde_json::Value;
use tabled::{builder::Builder, settings::Style};

use bookit_core::{AnalyticsReport, AppController};

use crate::cli::{AnalyticsArgs, AnalyticsCommand, GlobalOpts, OutputFormat, ReportKind};
use crate::error::CliError;
use crate::output;

use super::util;

impl From<ReportKind> for AnalyticsReport {
    fn from(kind: ReportKind) -> Self {
        match kind {
            ReportKind::Utilization => Self::Utilization,
            ReportKind::PopularResources => Self::PopularResources,
            ReportKind::PeakTimes => Self::PeakTimes,
            ReportKind::UserPatterns => Self::UserPatterns,
        }
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Best-effort table for an arbitrary report payload.
fn report_table(value: &Value) -> String {
    match value {
        Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
            let mut headers: Vec<&str> = Vec::new();
            for item in items {
                if let Value::Object(map) = item {
                    for key in map.keys() {
                        if !headers.contains(&key.as_str()) {
                            headers.push(key);
                        }
                    }
                }
            }
            let mut builder = Builder::default();
            builder.push_record(headers.iter().map(|h| (*h).to_owned()));
            for item in items {
                builder.push_record(
                    headers
                        .iter()
                        .map(|h| item.get(*h).map(cell).unwrap_or_default()),
                );
            }
            builder.build().with(Style::rounded()).to_string()
        }
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| match v {
                Value::Array(_) | Value::Object(_) => format!("{k}:\n{}", report_table(v)),
                scalar => format!("{k}: {}", cell(scalar)),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => cell(other),
    }
}

fn write_csv(csv: &str, file: Option<&Path>, global: &GlobalOpts) -> Result<(), CliError> {
    match file {
        Some(path) => {
            std::fs::write(path, csv)?;
            output::status(&format!("Wrote {}", path.display()), global.quiet);
        }
        None => output::print_output(csv.trim_end(), global.quiet),
    }
    Ok(())
}

pub async fn handle(
    controller: &AppController,
    args: AnalyticsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_session(controller).await?;
    let admin = &controller.services().admin;

    let (report, days, limit) = match args.command {
        AnalyticsCommand::Dashboard => (AnalyticsReport::Dashboard, None, None),
        AnalyticsCommand::Utilization(w) => (AnalyticsReport::Utilization, w.days, None),
        AnalyticsCommand::Popular { window, limit } => {
            (AnalyticsReport::PopularResources, window.days, limit)
        }
        AnalyticsCommand::PeakTimes(w) => (AnalyticsReport::PeakTimes, w.days, None),
        AnalyticsCommand::UserPatterns(w) => (AnalyticsReport::UserPatterns, w.days, None),
        AnalyticsCommand::Export {
            report,
            window,
            file,
        } => {
            let csv = admin.export_csv(report.into(), window.days).await?;
            return write_csv(&csv, file.as_deref(), global);
        }
    };

    let value = util::with_spinner(global, "Fetching report", admin.analytics(report, days, limit))
        .await?;
    let out = match global.output {
        OutputFormat::Table | OutputFormat::Plain => report_table(&value),
        format => output::render_single(format, &value, report_table, cell),
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
