//! Role administration handlers.

use tabled::Tabled;

use bookit_core::{AppController, Role};

use crate::cli::{GlobalOpts, RolesArgs, RolesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct RoleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Permissions")]
    permissions: String,
}

impl From<&Role> for RoleRow {
    fn from(r: &Role) -> Self {
        Self {
            id: r.id.map(|id| id.to_string()).unwrap_or_default(),
            name: r.name.clone(),
            description: r.description.clone().unwrap_or_default(),
            permissions: r.permissions.join(", "),
        }
    }
}

pub async fn handle(
    controller: &AppController,
    args: RolesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_session(controller).await?;
    let admin = &controller.services().admin;

    match args.command {
        RolesCommand::List => {
            let roles = admin.list_roles().await?;
            let out = output::render_list(global.output, &roles, |r| RoleRow::from(r), |r| r.name.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RolesCommand::Create {
            name,
            description,
            permission,
        } => {
            let role = admin.create_role(&name, description, permission).await?;
            let out = output::render_single(
                global.output,
                &role,
                |_| String::new(),
                |r| r.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RolesCommand::Assign { user_id, role } => {
            admin.assign_role(user_id, &role).await?;
            Ok(())
        }

        RolesCommand::Remove { user_id, role } => {
            if !util::confirm(&format!("Remove role {role} from user {user_id}?"), global)? {
                return Ok(());
            }
            admin.remove_role(user_id, &role).await?;
            Ok(())
        }
    }
}
