//! Dashboard Configuration
//!
//! Loads configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use nw_common::GUEST_ROLE_ID;

use crate::comments::DEFAULT_PAGE_SIZE;
use crate::credential::{CredentialStore, FileStore, KeyringStore, MemoryStore};

/// Where the session token is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialBackend {
    #[default]
    Keyring,
    File,
    Memory,
}

impl FromStr for CredentialBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyring" => Ok(Self::Keyring),
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => bail!("unknown credential store `{other}` (expected keyring, file or memory)"),
        }
    }
}

/// Dashboard configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// REST API base URL (e.g., "https://api.neswara.id/api")
    pub api_base_url: String,

    /// HTTP request timeout in seconds (default: 30)
    pub request_timeout_secs: u64,

    /// Role assumed without a valid session (default: 7)
    pub guest_role_id: i64,

    /// Comments per thread page (default: 5)
    pub comment_page_size: u32,

    /// Token persistence backend (default: keyring)
    pub credential_store: CredentialBackend,

    /// Directory of the file credential store (default: ".neswara")
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_base_url: env::var("NESWARA_API_BASE_URL")
                .context("NESWARA_API_BASE_URL must be set")?,
            request_timeout_secs: env::var("NESWARA_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            guest_role_id: env::var("NESWARA_GUEST_ROLE_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(GUEST_ROLE_ID),
            comment_page_size: env::var("NESWARA_COMMENT_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            credential_store: match env::var("NESWARA_CREDENTIAL_STORE") {
                Ok(value) => value
                    .parse::<CredentialBackend>()
                    .context("invalid NESWARA_CREDENTIAL_STORE")?,
                Err(_) => CredentialBackend::default(),
            },
            data_dir: env::var("NESWARA_DATA_DIR")
                .map_or_else(|_| PathBuf::from(".neswara"), PathBuf::from),
        })
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Build the configured credential store.
    pub fn credential_store(&self) -> Arc<dyn CredentialStore> {
        match self.credential_store {
            CredentialBackend::Keyring => Arc::new(KeyringStore::new(&self.api_base_url)),
            CredentialBackend::File => Arc::new(FileStore::new(&self.data_dir)),
            CredentialBackend::Memory => Arc::new(MemoryStore::new()),
        }
    }

    /// Create a configuration for tests against a local mock API.
    #[must_use]
    pub fn default_for_test(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            request_timeout_secs: 5,
            guest_role_id: GUEST_ROLE_ID,
            comment_page_size: DEFAULT_PAGE_SIZE,
            credential_store: CredentialBackend::Memory,
            data_dir: PathBuf::from(".neswara-test"),
        }
    }
}
