// ── Domain services ──
//
// Each service wraps a narrow slice of the API client, turns responses
// into domain types, writes them into the store and tells the user what
// happened through the notifier. Errors are logged and re-raised; no
// service swallows a failure.

mod admin;
mod auth;
mod reservation;
mod resource;
mod system;

use std::sync::Arc;

use bookit_api::ApiClient;

use crate::config::{ClientConfig, RefreshPolicy};
use crate::notify::Notifier;
use crate::store::AppStore;

pub use admin::AdminService;
pub use auth::AuthService;
pub use reservation::ReservationService;
pub use resource::ResourceService;
pub use system::SystemService;

/// Dependencies every service shares.
#[derive(Clone)]
pub(crate) struct ServiceContext {
    pub(crate) api: Arc<ApiClient>,
    pub(crate) store: Arc<AppStore>,
    pub(crate) notifier: Notifier,
    pub(crate) refresh_policy: RefreshPolicy,
}

/// All domain services wired to one API client, store and notifier.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub resources: ResourceService,
    pub reservations: ReservationService,
    pub system: SystemService,
    pub admin: AdminService,
}

impl Services {
    pub fn new(
        api: Arc<ApiClient>,
        store: Arc<AppStore>,
        notifier: Notifier,
        config: &ClientConfig,
    ) -> Self {
        let ctx = ServiceContext {
            api,
            store,
            notifier,
            refresh_policy: config.refresh_policy,
        };
        Self {
            auth: AuthService::new(ctx.clone()),
            resources: ResourceService::new(ctx.clone()),
            reservations: ReservationService::new(
                ctx.clone(),
                config.notifications.notify_create_failure,
            ),
            system: SystemService::new(ctx.clone()),
            admin: AdminService::new(ctx),
        }
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.auth.ctx.api
    }

    pub fn store(&self) -> &Arc<AppStore> {
        &self.auth.ctx.store
    }

    pub fn notifier(&self) -> &Notifier {
        &self.auth.ctx.notifier
    }
}
