//! Server health handler.

use bookit_core::{AppController, SystemStatus};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn status_detail(status: &SystemStatus) -> String {
    let mut lines = vec![format!("Status:  {}", status.status)];
    if let Some(ts) = status.timestamp {
        lines.push(format!("Checked: {}", ts.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    if let Some(ref tasks) = status.background_tasks {
        lines.push(format!("Tasks:   {tasks}"));
    }
    if let Some(ref error) = status.error {
        lines.push(format!("Error:   {error}"));
    }
    lines.join("\n")
}

/// `GET /health` needs no session.
pub async fn handle(controller: &AppController, global: &GlobalOpts) -> Result<(), CliError> {
    let status = controller.services().system.load_status().await?;
    let out = output::render_single(global.output, &status, status_detail, |s| {
        s.status.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
