//! Credential Decoding and Persistence
//!
//! The bearer token is an opaque signed JWT. Its claims are read locally
//! without verifying the signature; the server stays the authority and
//! rejects forged tokens with `401`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use nw_common::Identity;

/// Keyring service name under which tokens are stored.
pub const KEYRING_SERVICE: &str = "neswara-dashboard";

/// Credential decode or storage failure.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Invalid Token: {0}")]
    Malformed(String),

    #[error("Session Expired")]
    Expired,

    #[error("Credential storage failed: {0}")]
    Storage(String),
}

/// Claims carried by the API's bearer tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    pub role_id: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    pub exp: i64,
}

/// A stored token together with its decoded identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub identity: Identity,
}

impl Credential {
    /// Decode `token` and reject it if it has expired.
    pub fn decode(token: &str) -> Result<Self, CredentialError> {
        Self::decode_at(token, Utc::now())
    }

    /// Decode `token` as of `now`.
    pub fn decode_at(token: &str, now: DateTime<Utc>) -> Result<Self, CredentialError> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let claims = decode::<Claims>(token.trim(), &DecodingKey::from_secret(&[]), &validation)
            .map_err(|e| CredentialError::Malformed(e.to_string()))?
            .claims;

        let expires_at = timestamp(claims.exp)
            .ok_or_else(|| CredentialError::Malformed("exp out of range".to_string()))?;
        if expires_at <= now {
            debug!("Credential for user {} expired at {}", claims.id, expires_at);
            return Err(CredentialError::Expired);
        }

        Ok(Self {
            token: token.trim().to_string(),
            identity: Identity {
                id: claims.id,
                name: claims.name,
                email: claims.email,
                photo: claims.photo,
                role_id: claims.role_id,
                issued_at: claims.iat.and_then(timestamp),
                expires_at,
            },
        })
    }
}

fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

/// Where the bearer token survives between runs.
pub trait CredentialStore: Send + Sync {
    /// The stored token, if any.
    fn load(&self) -> Result<Option<String>, CredentialError>;

    /// Replace the stored token.
    fn save(&self, token: &str) -> Result<(), CredentialError>;

    /// Forget the stored token. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), CredentialError>;
}

/// OS keyring store, one entry per API base URL.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    user: String,
}

impl KeyringStore {
    pub fn new(api_base_url: &str) -> Self {
        Self {
            user: format!("token:{api_base_url}"),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, CredentialError> {
        keyring::Entry::new(KEYRING_SERVICE, &self.user)
            .map_err(|e| CredentialError::Storage(e.to_string()))
    }
}

impl CredentialStore for KeyringStore {
    fn load(&self) -> Result<Option<String>, CredentialError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(CredentialError::Storage(e.to_string())),
        }
    }

    fn save(&self, token: &str) -> Result<(), CredentialError> {
        self.entry()?
            .set_password(token)
            .map_err(|e| CredentialError::Storage(e.to_string()))
    }

    fn clear(&self) -> Result<(), CredentialError> {
        match self.entry()?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(CredentialError::Storage(e.to_string())),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct SessionFile {
    token: Option<String>,
}

/// JSON file store (`session.json` in the data directory).
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store inside `data_dir`, created on first save.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join("session.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> SessionFile {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!("Corrupt session file, ignoring it: {e}");
                SessionFile::default()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => SessionFile::default(),
            Err(e) => {
                warn!("Failed to read session file, ignoring it: {e}");
                SessionFile::default()
            }
        }
    }

    fn write(&self, file: &SessionFile) -> Result<(), CredentialError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| {
                CredentialError::Storage(format!("Failed to create data directory: {e}"))
            })?;
        }
        let json = serde_json::to_string_pretty(file)
            .map_err(|e| CredentialError::Storage(format!("Failed to serialize session: {e}")))?;
        std::fs::write(&self.path, json)
            .map_err(|e| CredentialError::Storage(format!("Failed to write session file: {e}")))
    }
}

impl CredentialStore for FileStore {
    fn load(&self) -> Result<Option<String>, CredentialError> {
        Ok(self.read().token.filter(|t| !t.trim().is_empty()))
    }

    fn save(&self, token: &str) -> Result<(), CredentialError> {
        self.write(&SessionFile {
            token: Some(token.to_string()),
        })
    }

    fn clear(&self) -> Result<(), CredentialError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CredentialError::Storage(format!(
                "Failed to remove session file: {e}"
            ))),
        }
    }
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    token: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, CredentialError> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> Result<(), CredentialError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        *self.slot() = None;
        Ok(())
    }
}
