// ── Resources and availability ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::reservation::Reservation;

/// A bookable entity (room, equipment).
///
/// `available` is the base flag set by an administrator. It says nothing
/// about time-bound reservations; see [`AvailabilityInfo`] for that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: i64,
    pub name: String,
    pub tags: Vec<String>,
    pub available: bool,
}

impl Resource {
    /// Case-insensitive match on name or any tag. An empty query matches.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }
}

/// Availability of one resource at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityInfo {
    pub is_currently_available: bool,
    pub base_available: bool,
    pub current_time: DateTime<Utc>,
    /// Active reservations overlapping `current_time`.
    pub reservations: Vec<Reservation>,
}

impl AvailabilityInfo {
    /// Derive availability locally from the base flag and known
    /// reservations, without asking the backend.
    pub fn derive(resource: &Resource, reservations: &[Reservation], now: DateTime<Utc>) -> Self {
        let overlapping: Vec<Reservation> = reservations
            .iter()
            .filter(|r| r.resource_id == resource.id && r.is_active() && r.contains(now))
            .cloned()
            .collect();

        Self {
            is_currently_available: resource.available && overlapping.is_empty(),
            base_available: resource.available,
            current_time: now,
            reservations: overlapping,
        }
    }
}
