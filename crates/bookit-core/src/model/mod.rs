// ── Domain model ──
//
// Canonical client-side types. Services convert API wire types into
// these (see `convert`) before anything reaches the store.

pub mod admin;
pub mod reservation;
pub mod resource;
pub mod system;
pub mod user;

// ── Re-exports ──────────────────────────────────────────────────────

pub use admin::{Role, SetupStatus};
pub use reservation::{Reservation, ReservationHistory, ReservationStatus};
pub use resource::{AvailabilityInfo, Resource};
pub use system::{HealthState, SystemStatus};
pub use user::User;
