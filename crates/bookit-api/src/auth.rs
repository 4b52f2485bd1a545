// Authentication endpoints
//
// Password login exchanges form credentials for a bearer token; the
// token is then validated by fetching the current user.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{RegisterRequest, TokenResponse, UserResponse};

impl ApiClient {
    /// Exchange username/password for a bearer token.
    ///
    /// `POST /token` (form-encoded). Does NOT store the token; callers
    /// decide whether to call [`set_auth_token`](Self::set_auth_token).
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<TokenResponse, Error> {
        debug!(username, "requesting access token");
        let form = [("username", username), ("password", password.expose_secret())];
        self.post_form("token", &form)
            .await
            .map_err(|e| match e {
                Error::Unauthorized { message }
                | Error::Api {
                    status: 400,
                    message,
                } => Error::Authentication { message },
                other => other,
            })
    }

    /// Create a new account.
    ///
    /// `POST /register`
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserResponse, Error> {
        debug!(username = %request.username, "registering user");
        self.post("register", request).await
    }

    /// Fetch the user behind the current bearer token.
    ///
    /// `GET /users/me` -- doubles as the session validity check.
    pub async fn current_user(&self) -> Result<UserResponse, Error> {
        self.get("users/me", &[]).await
    }
}
