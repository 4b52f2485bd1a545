//! Session command handlers: login, logout, whoami, register.

use serde::Serialize;

use bookit_core::{AppController, User};

use crate::cli::{GlobalOpts, LoginArgs, RegisterArgs};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util;

fn user_detail(user: &User) -> String {
    let mut lines = vec![format!("Username: {}", user.username)];
    if let Some(id) = user.id {
        lines.push(format!("ID:       {id}"));
    }
    if let Some(ref email) = user.email {
        lines.push(format!("Email:    {email}"));
    }
    let roles = if user.roles.is_empty() {
        "-".to_owned()
    } else {
        user.roles.join(", ")
    };
    lines.push(format!("Roles:    {roles}"));
    lines.push(format!("Admin:    {}", output::yes_no(user.is_admin())));
    lines.join("\n")
}

pub async fn login(
    controller: &AppController,
    resolved: &Resolved,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let username = match args
        .username
        .or_else(|| bookit_config::resolve_username(&resolved.profile))
    {
        Some(name) => name,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(util::prompt_err)?,
    };
    let password = match bookit_config::resolve_password(&resolved.profile_name) {
        Some(pw) => pw,
        None => util::prompt_password("Password: ")?,
    };

    let user = util::with_spinner(global, "Signing in", controller.login(&username, &password))
        .await?;

    // Table mode relies on the welcome toast.
    let out = output::render_single(global.output, &user, |_| String::new(), |u| {
        u.username.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn logout(controller: &AppController) {
    controller.logout();
}

pub async fn whoami(controller: &AppController, global: &GlobalOpts) -> Result<(), CliError> {
    let user = util::require_session(controller).await?;
    let out = output::render_single(global.output, &user, user_detail, |u| u.username.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}

#[derive(Serialize)]
struct Registered<'a> {
    username: &'a str,
    email: &'a str,
}

pub async fn register(
    controller: &AppController,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let password = util::prompt_new_password()?;
    let user = controller
        .services()
        .auth
        .register(&args.username, &args.email, &password)
        .await?;

    let summary = Registered {
        username: &user.username,
        email: user.email.as_deref().unwrap_or(&args.email),
    };
    let out = output::render_single(
        global.output,
        &summary,
        |s| format!("Log in with: bookit login --username {}", s.username),
        |s| s.username.to_owned(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
