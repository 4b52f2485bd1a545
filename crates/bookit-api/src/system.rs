// System endpoints
//
// Health snapshot and the first-run setup flow. Setup calls carry the
// one-time `X-Setup-Token` header instead of a bearer token.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{HealthResponse, InitializeSetupRequest, SetupStatusResponse};

const SETUP_TOKEN_HEADER: &str = "X-Setup-Token";

impl ApiClient {
    /// `GET /health`
    pub async fn health(&self) -> Result<HealthResponse, Error> {
        self.get("health", &[]).await
    }

    /// `GET /setup/status`
    pub async fn setup_status(&self) -> Result<SetupStatusResponse, Error> {
        self.get("setup/status", &[]).await
    }

    /// Create the first administrator account.
    ///
    /// `POST /setup/initialize`
    pub async fn initialize_setup(
        &self,
        request: &InitializeSetupRequest,
        setup_token: Option<&SecretString>,
    ) -> Result<(), Error> {
        debug!(username = %request.username, "initializing setup");
        match setup_token {
            Some(token) => {
                self.post_no_response(
                    "setup/initialize",
                    request,
                    &[(SETUP_TOKEN_HEADER, token.expose_secret())],
                )
                .await
            }
            None => self.post_no_response("setup/initialize", request, &[]).await,
        }
    }

    /// Unlock the setup endpoints with a one-time token.
    ///
    /// `POST /setup/unlock` with header `X-Setup-Token`
    pub async fn unlock_setup(&self, setup_token: &SecretString) -> Result<(), Error> {
        debug!("unlocking setup");
        self.post_no_response(
            "setup/unlock",
            &json!({}),
            &[(SETUP_TOKEN_HEADER, setup_token.expose_secret())],
        )
        .await
    }
}
