pub mod analytics;
pub mod auth;
pub mod config_cmd;
pub mod dashboard;
pub mod reservations;
pub mod resources;
pub mod roles;
pub mod setup;
pub mod status;
pub mod util;

use bookit_core::AppController;

use crate::cli::{Command, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;

/// Dispatch a server-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    controller: &AppController,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(controller, resolved, args, global).await,
        Command::Logout => {
            auth::logout(controller);
            Ok(())
        }
        Command::Whoami => auth::whoami(controller, global).await,
        Command::Register(args) => auth::register(controller, args, global).await,
        Command::Dashboard(args) => dashboard::handle(controller, args, global).await,
        Command::Resources(args) => resources::handle(controller, args, global).await,
        Command::Reservations(args) => reservations::handle(controller, args, global).await,
        Command::Roles(args) => roles::handle(controller, args, global).await,
        Command::Analytics(args) => analytics::handle(controller, args, global).await,
        Command::Setup(args) => setup::handle(controller, args, global).await,
        Command::Status => status::handle(controller, global).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are handled before dispatch".into(),
        )),
    }
}
