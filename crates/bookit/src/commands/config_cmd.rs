//! Config subcommand handlers.

use dialoguer::{Confirm, Input};

use bookit_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util::{self, prompt_err};

fn profile_not_found(name: String, cfg: &Config) -> CliError {
    let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
    available.sort_unstable();
    CliError::ProfileNotFound {
        name,
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

fn validate_server(server: &str) -> Result<(), CliError> {
    url::Url::parse(server)
        .map(drop)
        .map_err(|e| CliError::validation("server", format!("invalid URL '{server}': {e}")))
}

/// Insert `profile` under `name`; the first profile becomes the default.
fn upsert_profile(cfg: &mut Config, name: &str, profile: Profile) {
    let first = cfg.profiles.is_empty();
    cfg.profiles.insert(name.to_owned(), profile);
    if first || cfg.default_profile.is_none() {
        cfg.default_profile = Some(name.to_owned());
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let path = bookit_config::config_path();
            eprintln!("bookit configuration wizard");
            eprintln!("  Config path: {}\n", path.display());

            let name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let server: String = Input::new()
                .with_prompt("Server URL")
                .default("http://localhost:8000".into())
                .validate_with(|s: &String| validate_server(s).map_err(|e| e.to_string()))
                .interact_text()
                .map_err(prompt_err)?;

            let username: String = Input::new()
                .with_prompt("Username (blank to ask at login)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let remember = Confirm::new()
                .with_prompt("Store the password in the system keyring?")
                .default(false)
                .interact()
                .map_err(prompt_err)?;
            if remember {
                let password = util::prompt_password("Password: ")?;
                bookit_config::store_password(&name, &password)?;
                eprintln!("  ✓ Password stored in system keyring");
            }

            let mut cfg = bookit_config::load_config_or_default();
            let profile = Profile {
                server,
                username: (!username.trim().is_empty()).then_some(username),
                ..Profile::default()
            };
            upsert_profile(&mut cfg, &name, profile);
            cfg.default_profile = Some(name.clone());
            bookit_config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("  Active profile: {name}");
            eprintln!("\n  Next: bookit login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = bookit_config::load_config_or_default();
            let out = output::render_single(
                global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("{c:#?}\n# {e}")),
                |c| config::active_profile_name(global, c),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", bookit_config::config_path().display());
            Ok(())
        }

        // ── SetProfile ──────────────────────────────────────────────
        ConfigCommand::SetProfile {
            name,
            server,
            username,
        } => {
            validate_server(&server)?;
            let mut cfg = bookit_config::load_config_or_default();
            let mut profile = cfg.profiles.get(&name).cloned().unwrap_or_default();
            profile.server = server;
            if username.is_some() {
                profile.username = username;
            }
            upsert_profile(&mut cfg, &name, profile);
            bookit_config::save_config(&cfg)?;
            output::status(&format!("✓ Saved profile '{name}'"), global.quiet);
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = bookit_config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(name, &cfg));
            }
            cfg.default_profile = Some(name.clone());
            bookit_config::save_config(&cfg)?;
            output::status(&format!("✓ Default profile set to '{name}'"), global.quiet);
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword => {
            let cfg = bookit_config::load_config_or_default();
            let name = config::active_profile_name(global, &cfg);
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(name, &cfg));
            }
            let password = util::prompt_password("Password: ")?;
            bookit_config::store_password(&name, &password)?;
            output::status(
                &format!("✓ Password stored in system keyring for profile '{name}'"),
                global.quiet,
            );
            Ok(())
        }
    }
}
