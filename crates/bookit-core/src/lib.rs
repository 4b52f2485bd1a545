//! Client-side state and orchestration for the bookit booking backend.
//!
//! Sits between `bookit-api` and whatever surface drives it (the `bookit`
//! CLI, tests, a future TUI):
//!
//! - **[`AppController`]** owns everything below, restores a persisted
//!   session on [`start()`](AppController::start), and swaps the mounted
//!   view through a [`ViewRenderer`] whenever `current_view` changes.
//!
//! - **[`AppStore`]** is the single state container. Setters publish an
//!   immutable [`AppState`] snapshot and call subscribers in order;
//!   [`AppStore::watch`] offers the same snapshots as a stream.
//!
//! - **Services** ([`service`]) wrap the API client per concern (auth,
//!   resources, reservations, system health, administration), write
//!   results into the store and report outcomes through the [`Notifier`].
//!
//! - **Domain model** ([`model`]) holds the typed versions of the wire
//!   structures.

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod notify;
pub mod service;
pub mod session;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, NotificationConfig, RefreshPolicy, TlsVerification};
pub use controller::{transition, AppController, HeadlessRenderer, Transition, ViewRenderer};
pub use error::CoreError;
pub use notify::{NotificationLevel, Notifier, Toast, ToastEvent};
pub use service::Services;
pub use session::{MemoryTokenStore, TokenStore};
pub use store::{
    AppState, AppStore, DashboardTab, ResourceFilter, StateStream, Subscription, ViewKind,
};

pub use model::{
    AvailabilityInfo, HealthState, Reservation, ReservationHistory, ReservationStatus, Resource,
    Role, SetupStatus, SystemStatus, User,
};

// Analytics report selector lives in the API crate.
pub use bookit_api::AnalyticsReport;
