// Administrative endpoints: roles and analytics.
//
// Analytics payloads are returned as loosely-typed JSON because the
// report shapes vary per report and per backend version.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{AnalyticsReport, CreateRoleRequest, RoleAssignmentRequest, RoleResponse};

impl ApiClient {
    // ── Roles ────────────────────────────────────────────────────────

    /// `GET /api/v1/roles`
    pub async fn list_roles(&self) -> Result<Vec<RoleResponse>, Error> {
        self.get("api/v1/roles", &[]).await
    }

    /// `POST /api/v1/roles`
    pub async fn create_role(&self, request: &CreateRoleRequest) -> Result<RoleResponse, Error> {
        debug!(name = %request.name, "creating role");
        self.post("api/v1/roles", request).await
    }

    /// `POST /api/v1/roles/assign`
    pub async fn assign_role(&self, request: &RoleAssignmentRequest) -> Result<(), Error> {
        debug!(user_id = request.user_id, role = %request.role_name, "assigning role");
        self.post_no_response("api/v1/roles/assign", request, &[])
            .await
    }

    /// `DELETE /api/v1/roles/assign`
    pub async fn remove_role(&self, request: &RoleAssignmentRequest) -> Result<(), Error> {
        debug!(user_id = request.user_id, role = %request.role_name, "removing role");
        self.delete_with_body("api/v1/roles/assign", request).await
    }

    // ── Analytics ────────────────────────────────────────────────────

    /// Fetch one analytics report.
    ///
    /// `GET /api/v1/analytics/{report}` with `days` (all but the dashboard)
    /// and `limit` (popular resources only).
    pub async fn analytics(
        &self,
        report: AnalyticsReport,
        days: Option<u32>,
        limit: Option<u32>,
    ) -> Result<serde_json::Value, Error> {
        let mut params = Vec::new();
        if let Some(days) = days {
            params.push(("days", days.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        self.get(&format!("api/v1/analytics/{}", report.path()), &params)
            .await
    }

    /// Export a report as CSV text.
    ///
    /// `GET /api/v1/analytics/export/{report}.csv?days=`
    pub async fn export_analytics_csv(
        &self,
        report: AnalyticsReport,
        days: Option<u32>,
    ) -> Result<String, Error> {
        let params: Vec<(&str, String)> = days.map(|d| ("days", d.to_string())).into_iter().collect();
        self.get_text(
            &format!("api/v1/analytics/export/{}.csv", report.path()),
            &params,
        )
        .await
    }
}
