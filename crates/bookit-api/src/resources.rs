// Resource endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{AvailabilityResponse, CreateResourceRequest, ResourceResponse};

impl ApiClient {
    /// Search bookable resources.
    ///
    /// `GET /api/v1/resources/search?q=&available_only=`. An empty query
    /// lists everything.
    pub async fn search_resources(
        &self,
        query: &str,
        available_only: bool,
    ) -> Result<Vec<ResourceResponse>, Error> {
        let mut params = vec![("available_only", available_only.to_string())];
        if !query.is_empty() {
            params.push(("q", query.to_owned()));
        }
        self.get("api/v1/resources/search", &params).await
    }

    /// Create a resource (admin).
    ///
    /// `POST /api/v1/resources`
    pub async fn create_resource(
        &self,
        request: &CreateResourceRequest,
    ) -> Result<ResourceResponse, Error> {
        debug!(name = %request.name, "creating resource");
        self.post("api/v1/resources", request).await
    }

    /// Current availability of one resource, including the reservations
    /// that overlap "now".
    ///
    /// `GET /api/v1/resources/{id}/availability`
    pub async fn resource_availability(&self, id: i64) -> Result<AvailabilityResponse, Error> {
        self.get(&format!("api/v1/resources/{id}/availability"), &[])
            .await
    }
}
