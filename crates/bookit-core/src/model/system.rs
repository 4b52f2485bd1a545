use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Coarse backend health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Error,
}

/// Last known backend health snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub status: HealthState,
    pub timestamp: Option<DateTime<Utc>>,
    pub background_tasks: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl SystemStatus {
    /// Snapshot recorded when the health check itself failed.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: HealthState::Error,
            timestamp: Some(Utc::now()),
            background_tasks: None,
            error: Some(message.into()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthState::Healthy
    }
}
