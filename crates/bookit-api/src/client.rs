// bookit REST client
//
// Wraps `reqwest::Client` with base-URL joining, bearer token injection,
// and FastAPI-style error decoding. Endpoint groups (auth, resources,
// reservations, system, admin) are inherent methods in sibling files so
// this module stays focused on transport mechanics.

use std::sync::{PoisonError, RwLock};

use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Error body shape returned by the backend: `{"detail": ...}`.
///
/// `detail` is a plain string for most errors and a list of field
/// errors for request validation failures.
#[derive(serde::Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Async HTTP client for the bookit backend.
///
/// Every call is a fresh request: no retry, no caching. When a token is
/// set, `Authorization: Bearer <token>` is attached to every request.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` using the given transport settings.
    pub fn new(base_url: &Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &Url) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
            token: RwLock::new(None),
        }
    }

    /// The backend base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Token management ─────────────────────────────────────────────

    /// Attach `token` as the bearer credential for all subsequent calls.
    pub fn set_auth_token(&self, token: SecretString) {
        debug!("storing bearer token");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Drop the bearer credential; subsequent calls are anonymous.
    pub fn clear_auth_token(&self) {
        debug!("clearing bearer token");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn has_auth_token(&self) -> bool {
        self.token.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let guard = self.token.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"api/v1/reservations/me"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.authorize(self.http.get(url).query(params)).send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn get_text(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<String, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.authorize(self.http.get(url).query(params)).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp.text().await?)
        } else {
            Err(parse_error(status, resp).await)
        }
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.authorize(self.http.post(url).json(body)).send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn post_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        headers: &[(&'static str, &str)],
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let mut builder = self.http.post(url).json(body);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let resp = self.authorize(builder).send().await?;
        handle_empty(resp).await
    }

    pub(crate) async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url} (form)");

        let resp = self.http.post(url).form(form).send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.authorize(self.http.delete(url)).send().await?;
        handle_empty(resp).await
    }

    pub(crate) async fn delete_with_body<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self
            .authorize(self.http.delete(url).json(body))
            .send()
            .await?;
        handle_empty(resp).await
    }
}

/// Ensure the base URL ends with `/` so relative joins keep its path.
fn normalize_base_url(raw: &Url) -> Url {
    let mut url = raw.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

// ── Response handling ────────────────────────────────────────────────

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(parse_error(status, resp).await);
    }

    let body = resp.text().await?;
    trace!(len = body.len(), "response body received");
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(parse_error(status, resp).await)
    }
}

async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();
    let message = detail_message(&raw).unwrap_or_else(|| {
        if raw.is_empty() {
            status.to_string()
        } else {
            raw.chars().take(200).collect()
        }
    });

    if status == reqwest::StatusCode::UNAUTHORIZED {
        Error::Unauthorized { message }
    } else {
        Error::Api {
            status: status.as_u16(),
            message,
        }
    }
}

/// Extract a human-readable message from a `{"detail": ...}` body.
fn detail_message(raw: &str) -> Option<String> {
    let body: ErrorBody = serde_json::from_str(raw).ok()?;
    match body.detail? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()).map(String::from))
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        other => Some(other.to_string()),
    }
}
