//! First-run setup handlers. None of these need a session.

use secrecy::SecretString;
use serde::Serialize;

use bookit_core::{AppController, SetupStatus};

use crate::cli::{GlobalOpts, SetupArgs, SetupCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct SetupView {
    user_count: u64,
    setup_complete: bool,
    needs_setup: bool,
}

impl From<SetupStatus> for SetupView {
    fn from(s: SetupStatus) -> Self {
        Self {
            user_count: s.user_count,
            setup_complete: s.setup_complete,
            needs_setup: s.needs_setup(),
        }
    }
}

pub async fn handle(
    controller: &AppController,
    args: SetupArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let admin = &controller.services().admin;

    match args.command {
        SetupCommand::Status => {
            let view = SetupView::from(admin.setup_status().await?);
            let out = output::render_single(
                global.output,
                &view,
                |v| {
                    if v.needs_setup {
                        "Setup pending. Run: bookit setup init".to_owned()
                    } else {
                        format!("Setup complete ({} users)", v.user_count)
                    }
                },
                |v| v.needs_setup.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SetupCommand::Init {
            username,
            email,
            token,
        } => {
            let password = util::prompt_new_password()?;
            let token = token.map(SecretString::from);
            admin
                .initialize_setup(&username, &email, &password, token.as_ref())
                .await?;
            Ok(())
        }

        SetupCommand::Unlock { token } => {
            admin.unlock_setup(&SecretString::from(token)).await?;
            Ok(())
        }
    }
}
