//! Neswara Dashboard Core
//!
//! Headless core of the Neswara admin dashboard: the REST client, the
//! access-control store with its page guard and capability gates, and the
//! comment thread engine.

pub mod access;
pub mod api;
pub mod cli;
pub mod comments;
pub mod config;
pub mod credential;
pub mod error;
pub mod format;
pub mod listing;
pub mod logging;
pub mod navigation;
pub mod notify;

use std::sync::{Arc, Weak};

use tracing::info;

use nw_common::{ContentType, Identity};

use access::{AccessControl, AccessReader, AccessSnapshot};
use api::ApiClient;
use comments::{CommentSource, CommentThread};
use config::Config;
use credential::{Credential, CredentialStore};
use error::ApiResult;

/// Application state shared by every page.
pub struct Dashboard {
    config: Config,
    api: ApiClient,
    store: Arc<dyn CredentialStore>,
    access: Arc<AccessControl>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("api", &self.api)
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// Build the dashboard with the configured credential store.
    pub fn new(config: Config) -> ApiResult<Self> {
        let store = config.credential_store();
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<dyn CredentialStore>) -> ApiResult<Self> {
        let api = ApiClient::new(&config.api_base_url, config.request_timeout())?;
        let access = Arc::new(AccessControl::with_guest_role(
            api.clone(),
            Arc::clone(&store),
            config.guest_role_id,
        ));

        // A 401 anywhere drops the session.
        let weak: Weak<AccessControl> = Arc::downgrade(&access);
        api.set_unauthorized_hook(Arc::new(move || {
            if let Some(access) = weak.upgrade() {
                access.reset_to_guest();
            }
        }));

        Ok(Self {
            config,
            api,
            store,
            access,
        })
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    pub fn reader(&self) -> AccessReader {
        self.access.reader()
    }

    pub fn snapshot(&self) -> Arc<AccessSnapshot> {
        self.access.snapshot()
    }

    /// Re-derive the session from the stored credential.
    pub async fn restore(&self) -> ApiResult<()> {
        self.access.initialize().await
    }

    /// Log in, persist the token and load the caller's permissions.
    ///
    /// The token stays stored even when loading permissions fails; a later
    /// [`restore`](Self::restore) retries.
    pub async fn login(&self, email: &str, password: &str, admin: bool) -> ApiResult<Identity> {
        let token = if admin {
            self.api.admin_login(email, password).await?
        } else {
            self.api.login(email, password).await?
        };
        let credential = Credential::decode(&token)?;
        self.store.save(&credential.token)?;
        info!("Logged in as user {}", credential.identity.id);

        self.access.refresh().await?;
        Ok(self
            .snapshot()
            .identity
            .clone()
            .unwrap_or(credential.identity))
    }

    /// Drop the session locally.
    pub async fn logout(&self) {
        self.api.set_token(None).await;
        self.access.reset_to_guest();
        info!("Logged out");
    }

    /// Comment thread for one content item, gated by the session.
    pub fn comment_thread(&self, content_type: ContentType, content_id: i64) -> CommentThread {
        let source: Arc<dyn CommentSource> = Arc::new(self.api.clone());
        CommentThread::new(source, content_type, content_id)
            .with_access(self.reader())
            .with_page_size(self.config.comment_page_size)
    }
}
