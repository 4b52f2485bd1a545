// ── Application state store ──
//
// Single authoritative state container. Writers go through setters;
// readers get immutable `Arc<AppState>` snapshots.

mod app_store;
mod state;
mod stream;

pub use app_store::{AppStore, Subscription};
pub use state::{AppState, DashboardTab, ResourceFilter, ViewKind};
pub use stream::{StateStream, StateWatchStream};
