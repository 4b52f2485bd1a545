// ── Reservations ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::resource::Resource;

/// Lifecycle state of a reservation.
///
/// Anything the backend sends that is not `active` or `cancelled` maps to
/// `Unknown` rather than failing the whole listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReservationStatus {
    Active,
    Cancelled,
    Unknown,
}

impl ReservationStatus {
    pub fn from_api(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::Unknown)
    }
}

/// A time-bounded booking of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub resource_id: i64,
    /// Embedded resource when the listing endpoint included it.
    pub resource: Option<Resource>,
    pub user_id: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: ReservationStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl Reservation {
    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Active
    }

    /// Starts strictly after `now`.
    pub fn is_upcoming_at(&self, now: DateTime<Utc>) -> bool {
        self.start_time > now
    }

    /// Active and not yet started.
    pub fn can_cancel_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && self.is_upcoming_at(now)
    }

    /// `start_time <= at < end_time`.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start_time <= at && at < self.end_time
    }

    /// Display name of the booked resource, falling back to its id.
    pub fn resource_label(&self) -> String {
        self.resource
            .as_ref()
            .map_or_else(|| format!("#{}", self.resource_id), |r| r.name.clone())
    }
}

/// One audit entry for a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationHistory {
    pub id: i64,
    pub reservation_id: i64,
    pub action: String,
    pub user_id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    pub details: Option<String>,
}
