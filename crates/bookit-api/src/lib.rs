//! Async HTTP client for the bookit resource-booking backend.
//!
//! [`ApiClient`] exposes one method per REST endpoint and attaches the
//! bearer token set through [`ApiClient::set_auth_token`]. Wire types live
//! in [`models`]; `bookit-core` converts them into domain types.

pub mod admin;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod reservations;
pub mod resources;
pub mod system;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use models::AnalyticsReport;
pub use transport::{TlsMode, TransportConfig};
