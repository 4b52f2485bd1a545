// ── Runtime client configuration ──
//
// Describes *how* to reach the backend and how the client layer behaves.
// Never touches disk: the CLI builds a `ClientConfig` from its profile
// and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

use bookit_api::transport::{TlsMode, TransportConfig};

/// Page size used when nothing else is configured.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development servers).
    DangerAcceptInvalid,
}

/// What a service does to the store after a successful write.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RefreshPolicy {
    /// Reload the affected list from the backend.
    #[default]
    Refetch,
    /// Patch the store from the write's own response.
    OptimisticMerge,
}

/// Toast behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    /// How long a toast stays fully visible.
    pub display: Duration,
    /// Exit transition before the toast is removed.
    pub exit: Duration,
    /// Maximum concurrent toasts; `None` means unbounded.
    pub max_visible: Option<usize>,
    /// Emit an error toast when creating a reservation fails.
    pub notify_create_failure: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            display: Duration::from_secs(5),
            exit: Duration::from_millis(300),
            max_visible: Some(5),
            notify_create_failure: false,
        }
    }
}

/// Configuration for one backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., `http://localhost:8000`).
    pub url: Url,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    pub items_per_page: usize,
    pub refresh_policy: RefreshPolicy,
    pub notifications: NotificationConfig,
}

impl ClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            refresh_policy: RefreshPolicy::default(),
            notifications: NotificationConfig::default(),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn refresh_policy_parses_kebab_case() {
        assert_eq!(
            "optimistic-merge".parse::<RefreshPolicy>().unwrap(),
            RefreshPolicy::OptimisticMerge
        );
        assert_eq!(RefreshPolicy::Refetch.to_string(), "refetch");
    }

    #[test]
    fn notification_defaults() {
        let n = NotificationConfig::default();
        assert_eq!(n.display, Duration::from_secs(5));
        assert_eq!(n.exit, Duration::from_millis(300));
        assert_eq!(n.max_visible, Some(5));
        assert!(!n.notify_create_failure);
    }
}
