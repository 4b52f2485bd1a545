// ── AuthService ──

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use bookit_api::models::RegisterRequest;

use super::ServiceContext;
use crate::error::CoreError;
use crate::model::User;

/// Login, session validation, registration.
#[derive(Clone)]
pub struct AuthService {
    pub(super) ctx: ServiceContext,
}

impl AuthService {
    pub(crate) fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Exchange credentials for a token, then record the session.
    ///
    /// The token is installed on the API client before the user lookup
    /// and removed again if anything fails.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<(User, SecretString), CoreError> {
        let result = async {
            let token = self.ctx.api.login(username, password).await?.access_token;
            self.ctx.api.set_auth_token(token.clone());
            let user = User::from(self.ctx.api.current_user().await?);
            Ok::<_, CoreError>((user, token))
        }
        .await;

        match result {
            Ok((user, token)) => {
                info!(username = %user.username, "logged in");
                self.ctx.store.login(user.clone(), token.clone());
                Ok((user, token))
            }
            Err(e) => {
                warn!(username, error = %e, "login failed");
                self.ctx.api.clear_auth_token();
                self.ctx.notifier.error(format!("Login failed: {e}"));
                Err(e)
            }
        }
    }

    /// Install a previously persisted token and validate it.
    pub async fn restore_session(&self, token: SecretString) -> Result<User, CoreError> {
        self.ctx.api.set_auth_token(token.clone());
        self.ctx.store.set_auth_token(Some(token));
        self.check_session().await
    }

    /// Validate the current token via `GET /users/me` and record the user.
    pub async fn check_session(&self) -> Result<User, CoreError> {
        if !self.ctx.api.has_auth_token() {
            return Err(CoreError::NotLoggedIn);
        }
        let user = User::from(self.ctx.api.current_user().await?);
        self.ctx.store.set_current_user(Some(user.clone()));
        Ok(user)
    }

    /// Drop the session from the client and the store. Silent.
    pub fn logout(&self) {
        self.ctx.api.clear_auth_token();
        self.ctx.store.logout();
        info!("session cleared");
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<User, CoreError> {
        let request = RegisterRequest {
            username: username.to_owned(),
            email: email.to_owned(),
            password: password.expose_secret().to_owned(),
        };
        match self.ctx.api.register(&request).await {
            Ok(user) => {
                self.ctx
                    .notifier
                    .success(format!("Account {username} created"));
                Ok(User::from(user))
            }
            Err(e) => {
                let e = CoreError::from(e);
                warn!(username, error = %e, "registration failed");
                self.ctx.notifier.error(format!("Registration failed: {e}"));
                Err(e)
            }
        }
    }
}
