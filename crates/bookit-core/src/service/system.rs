// ── SystemService ──

use tracing::warn;

use super::ServiceContext;
use crate::error::CoreError;
use crate::model::SystemStatus;

/// Backend health.
#[derive(Clone)]
pub struct SystemService {
    ctx: ServiceContext,
}

impl SystemService {
    pub(crate) fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Fetch `/health` into the store.
    ///
    /// A failed check still records a snapshot (status `error` with the
    /// message) before the error is returned. No toast.
    pub async fn load_status(&self) -> Result<SystemStatus, CoreError> {
        match self.ctx.api.health().await {
            Ok(health) => {
                let status = SystemStatus::from(health);
                self.ctx.store.set_system_status(status.clone());
                Ok(status)
            }
            Err(e) => {
                let e = CoreError::from(e);
                warn!(error = %e, "health check failed");
                self.ctx
                    .store
                    .set_system_status(SystemStatus::error(e.to_string()));
                Err(e)
            }
        }
    }
}
