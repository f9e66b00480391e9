//! REST API Client
//!
//! Thin typed wrapper over the Neswara REST API. Every call attaches the
//! bearer token when one is held and converts failures into [`ApiError`].
//! A `401` clears the held token and fires the unauthorized hook so the
//! access-control store can fall back to the guest state.

pub mod activity;
pub mod auth;
pub mod comments;
pub mod likes;
pub mod news;
pub mod roles;
pub mod taxonomy;
pub mod users;
pub mod videos;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client as HttpClient, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};
use url::Url;

use crate::error::{ApiError, ApiResult};

/// Callback fired when the server reports the session as invalid.
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// Authentication state held by the client.
#[derive(Debug, Default)]
pub struct AuthState {
    /// Bearer token attached to requests.
    pub access_token: Option<String>,
}

/// HTTP client for the Neswara API.
#[derive(Clone)]
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
    auth: Arc<RwLock<AuthState>>,
    on_unauthorized: Arc<std::sync::RwLock<Option<UnauthorizedHook>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the given API base URL.
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| ApiError::InvalidResponse(format!("invalid API base URL: {e}")))?;

        Ok(Self {
            http,
            base_url,
            auth: Arc::new(RwLock::new(AuthState::default())),
            on_unauthorized: Arc::new(std::sync::RwLock::new(None)),
        })
    }

    /// API base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the held bearer token.
    pub async fn set_token(&self, token: Option<String>) {
        self.auth.write().await.access_token = token;
    }

    /// Currently held bearer token.
    pub async fn token(&self) -> Option<String> {
        self.auth.read().await.access_token.clone()
    }

    /// Check if a token is held.
    pub async fn is_authenticated(&self) -> bool {
        self.auth.read().await.access_token.is_some()
    }

    /// Install the callback fired on `401` responses.
    pub fn set_unauthorized_hook(&self, hook: UnauthorizedHook) {
        let mut slot = self
            .on_unauthorized
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = Some(hook);
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> ApiResult<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| ApiError::InvalidResponse(format!("invalid request URL: {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<RequestBuilder> {
        let url = self.url(path, query)?;
        let mut builder = self.http.request(method, url);
        if let Some(token) = self.token().await {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        Ok(builder)
    }

    async fn execute(&self, builder: RequestBuilder, what: &str) -> ApiResult<Envelope> {
        let response = builder.send().await.map_err(|e| {
            error!("Failed to {}: {}", what, e);
            ApiError::Network(e)
        })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::Null)
        };
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);

        if status == StatusCode::UNAUTHORIZED {
            warn!("Session rejected while trying to {}", what);
            self.invalidate_session().await;
            return Err(ApiError::Unauthorized {
                message: message.unwrap_or_default(),
            });
        }

        if !status.is_success() {
            error!("Failed to {}: {} - {}", what, status, text);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: message.unwrap_or_default(),
            });
        }

        debug!("{} succeeded ({})", what, status);
        Ok(Envelope { message, body })
    }

    async fn invalidate_session(&self) {
        self.set_token(None).await;
        let hook = self
            .on_unauthorized
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    pub(crate) async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> ApiResult<Envelope> {
        let builder = self.request(Method::GET, path, query).await?;
        self.execute(builder, what).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
        what: &str,
    ) -> ApiResult<Envelope> {
        let builder = self.request(Method::POST, path, query).await?.json(body);
        self.execute(builder, what).await
    }

    pub(crate) async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        what: &str,
    ) -> ApiResult<Envelope> {
        let builder = self.request(Method::PUT, path, &[]).await?.json(body);
        self.execute(builder, what).await
    }

    pub(crate) async fn delete(&self, path: &str, what: &str) -> ApiResult<Envelope> {
        let builder = self.request(Method::DELETE, path, &[]).await?;
        self.execute(builder, what).await
    }

    /// Fail fast when an endpoint needs a session and none is held.
    pub(crate) async fn require_token(&self) -> ApiResult<()> {
        if self.is_authenticated().await {
            Ok(())
        } else {
            Err(ApiError::NotAuthenticated)
        }
    }
}

/// Successful response body.
///
/// The API wraps payloads in differently named fields per endpoint
/// (`data`, `user`, `token`, ...), so the body is kept as JSON and fields
/// are pulled out by name.
#[derive(Debug, Clone)]
pub struct Envelope {
    message: Option<String>,
    body: Value,
}

impl Envelope {
    /// Server-provided message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Take the server message, for mutation acknowledgements.
    pub fn into_message(self) -> Option<String> {
        self.message
    }

    /// Decode a required payload field.
    pub fn field<T: DeserializeOwned>(&self, key: &str) -> ApiResult<T> {
        let value = self
            .body
            .get(key)
            .filter(|v| !v.is_null())
            .ok_or_else(|| ApiError::InvalidResponse(format!("missing `{key}`")))?;
        serde_json::from_value(value.clone())
            .map_err(|e| ApiError::InvalidResponse(format!("bad `{key}`: {e}")))
    }

    /// Decode an optional payload field.
    pub fn optional_field<T: DeserializeOwned>(&self, key: &str) -> ApiResult<Option<T>> {
        match self.body.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| ApiError::InvalidResponse(format!("bad `{key}`: {e}"))),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_json(body: Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        Self { message, body }
    }
}

/// Standard list query parameters (`page`, `limit`, `order`).
pub(crate) fn page_query(
    page: u32,
    limit: u32,
    order: nw_common::SortOrder,
) -> Vec<(&'static str, String)> {
    vec![
        ("page", page.to_string()),
        ("limit", limit.to_string()),
        ("order", order.as_str().to_string()),
    ]
}
