// ── AdminService ──
//
// Roles, first-run setup and analytics. Mutations announce their outcome
// through the notifier; reads are plain passthroughs.

use std::future::Future;

use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use bookit_api::models::{CreateRoleRequest, InitializeSetupRequest, RoleAssignmentRequest};
use bookit_api::AnalyticsReport;

use super::ServiceContext;
use crate::error::CoreError;
use crate::model::{Role, SetupStatus};

#[derive(Clone)]
pub struct AdminService {
    ctx: ServiceContext,
}

impl AdminService {
    pub(crate) fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    // ── Roles ────────────────────────────────────────────────────────

    pub async fn list_roles(&self) -> Result<Vec<Role>, CoreError> {
        let roles = self.ctx.api.list_roles().await?;
        Ok(roles.into_iter().map(Role::from).collect())
    }

    pub async fn create_role(
        &self,
        name: &str,
        description: Option<String>,
        permissions: Vec<String>,
    ) -> Result<Role, CoreError> {
        let request = CreateRoleRequest {
            name: name.to_owned(),
            description,
            permissions,
        };
        self.announce(
            async { Ok(Role::from(self.ctx.api.create_role(&request).await?)) },
            &format!("Role {name} created"),
            "Failed to create role",
        )
        .await
    }

    pub async fn assign_role(&self, user_id: i64, role_name: &str) -> Result<(), CoreError> {
        let request = RoleAssignmentRequest {
            user_id,
            role_name: role_name.to_owned(),
        };
        self.announce(
            async { Ok(self.ctx.api.assign_role(&request).await?) },
            &format!("Role {role_name} assigned to user {user_id}"),
            "Failed to assign role",
        )
        .await
    }

    pub async fn remove_role(&self, user_id: i64, role_name: &str) -> Result<(), CoreError> {
        let request = RoleAssignmentRequest {
            user_id,
            role_name: role_name.to_owned(),
        };
        self.announce(
            async { Ok(self.ctx.api.remove_role(&request).await?) },
            &format!("Role {role_name} removed from user {user_id}"),
            "Failed to remove role",
        )
        .await
    }

    // ── Setup ────────────────────────────────────────────────────────

    pub async fn setup_status(&self) -> Result<SetupStatus, CoreError> {
        Ok(SetupStatus::from(self.ctx.api.setup_status().await?))
    }

    /// Create the first administrator.
    pub async fn initialize_setup(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
        setup_token: Option<&SecretString>,
    ) -> Result<(), CoreError> {
        let request = InitializeSetupRequest {
            username: username.to_owned(),
            email: email.to_owned(),
            password: password.expose_secret().to_owned(),
        };
        self.announce(
            async {
                Ok(self
                    .ctx
                    .api
                    .initialize_setup(&request, setup_token)
                    .await?)
            },
            "Setup complete",
            "Setup failed",
        )
        .await
    }

    pub async fn unlock_setup(&self, setup_token: &SecretString) -> Result<(), CoreError> {
        self.announce(
            async { Ok(self.ctx.api.unlock_setup(setup_token).await?) },
            "Setup unlocked",
            "Failed to unlock setup",
        )
        .await
    }

    // ── Analytics ────────────────────────────────────────────────────

    pub async fn analytics(
        &self,
        report: AnalyticsReport,
        days: Option<u32>,
        limit: Option<u32>,
    ) -> Result<serde_json::Value, CoreError> {
        Ok(self.ctx.api.analytics(report, days, limit).await?)
    }

    pub async fn export_csv(
        &self,
        report: AnalyticsReport,
        days: Option<u32>,
    ) -> Result<String, CoreError> {
        Ok(self.ctx.api.export_analytics_csv(report, days).await?)
    }

    // ── Private helpers ──────────────────────────────────────────────

    async fn announce<T>(
        &self,
        op: impl Future<Output = Result<T, CoreError>>,
        success: &str,
        failure: &str,
    ) -> Result<T, CoreError> {
        match op.await {
            Ok(value) => {
                self.ctx.notifier.success(success);
                Ok(value)
            }
            Err(e) => {
                warn!(error = %e, "{failure}");
                self.ctx.notifier.error(format!("{failure}: {e}"));
                Err(e)
            }
        }
    }
}
