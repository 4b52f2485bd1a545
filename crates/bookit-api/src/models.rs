// Wire types for the bookit REST API.
//
// These mirror the backend's JSON shapes. Status fields stay as raw
// strings here; `bookit-core` converts them into typed domain enums.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

// ── Auth / users ────────────────────────────────────────────────────

/// `POST /token` response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: SecretString,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub roles: Vec<RoleRef>,
}

/// Roles appear either as bare names or as `{ "name": ... }` objects
/// depending on the endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleRef {
    Name(String),
    Object { name: String },
}

impl RoleRef {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(n) | Self::Object { name: n } => n,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

// ── Resources ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceResponse {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_true")]
    pub available: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateResourceRequest {
    pub name: String,
    pub tags: Vec<String>,
    pub available: bool,
}

/// `GET /api/v1/resources/{id}/availability` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub is_currently_available: bool,
    pub base_available: bool,
    pub current_time: DateTime<Utc>,
    #[serde(default)]
    pub reservations: Vec<ReservationResponse>,
}

// ── Reservations ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationResponse {
    pub id: i64,
    pub resource_id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Embedded resource, present on the `/me` listing.
    #[serde(default)]
    pub resource: Option<ResourceResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateReservationRequest {
    pub resource_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationHistoryResponse {
    pub id: i64,
    pub reservation_id: i64,
    pub action: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub details: Option<String>,
}

// ── System / setup ──────────────────────────────────────────────────

/// `GET /health` response.
///
/// `background_tasks` is loosely typed because its shape depends on
/// which workers the backend runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub background_tasks: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupStatusResponse {
    pub user_count: u64,
    pub setup_complete: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitializeSetupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

// ── Roles ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleResponse {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleAssignmentRequest {
    pub user_id: i64,
    pub role_name: String,
}

// ── Analytics ───────────────────────────────────────────────────────

/// Reports available under `/api/v1/analytics/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsReport {
    Dashboard,
    Utilization,
    PopularResources,
    PeakTimes,
    UserPatterns,
}

impl AnalyticsReport {
    /// Path segment under `/api/v1/analytics/`.
    pub fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Utilization => "utilization",
            Self::PopularResources => "popular-resources",
            Self::PeakTimes => "peak-times",
            Self::UserPatterns => "user-patterns",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_refs_accept_both_shapes() {
        let user: UserResponse = serde_json::from_value(json!({
            "username": "alice",
            "roles": ["admin", { "name": "approver" }]
        }))
        .unwrap();
        let names: Vec<&str> = user.roles.iter().map(RoleRef::name).collect();
        assert_eq!(names, ["admin", "approver"]);
    }

    #[test]
    fn resource_defaults_to_available() {
        let r: ResourceResponse =
            serde_json::from_value(json!({ "id": 1, "name": "Room A" })).unwrap();
        assert!(r.available);
        assert!(r.tags.is_empty());
    }
}
