//! Profile resolution for the CLI.
//!
//! Loads the shared TOML config, picks the active profile, applies
//! `--server` / `--insecure` / `--timeout` overrides and chooses where the
//! session token lives.

use std::sync::Arc;

use secrecy::SecretString;

use bookit_config::{Config, KeyringTokenStore, Profile};
use bookit_core::{ClientConfig, MemoryTokenStore, TokenStore};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Env var holding a bearer token that bypasses the keyring.
pub const TOKEN_ENV: &str = "BOOKIT_TOKEN";

/// Everything a controller-bound command needs from configuration.
pub struct Resolved {
    pub profile_name: String,
    pub profile: Profile,
    pub client: ClientConfig,
    pub sessions: Arc<dyn TokenStore>,
}

pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Merge the config file, the active profile, and CLI overrides.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = bookit_config::load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        // An explicitly requested profile must exist unless --server covers it
        None if global.profile.is_some() && global.server.is_none() => {
            let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
            names.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if names.is_empty() {
                    "(none)".into()
                } else {
                    names.join(", ")
                },
            });
        }
        None => Profile::default(),
    };

    apply_overrides(&mut profile, global);

    if profile.server.trim().is_empty() {
        return Err(CliError::NoConfig {
            path: bookit_config::config_path().display().to_string(),
        });
    }

    let client = bookit_config::profile_to_client_config(&profile, &cfg.defaults)?;
    let sessions = session_store(&profile_name);
    tracing::debug!(profile = %profile_name, server = %client.url, "resolved profile");

    Ok(Resolved {
        profile_name,
        profile,
        client,
        sessions,
    })
}

fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}

/// `BOOKIT_TOKEN` wins over the keyring so scripts and CI never touch it.
fn session_store(profile_name: &str) -> Arc<dyn TokenStore> {
    match std::env::var(TOKEN_ENV) {
        Ok(token) if !token.is_empty() => {
            Arc::new(MemoryTokenStore::with_token(SecretString::from(token)))
        }
        _ => Arc::new(KeyringTokenStore::new(profile_name)),
    }
}
