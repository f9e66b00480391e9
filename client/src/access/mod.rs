//! Access Control
//!
//! Application-scoped store for "who is signed in and what may they do".
//! [`AccessControl`] is the only mutation path; descendants receive an
//! [`AccessReader`] and can only look.
//!
//! The state is one immutable [`AccessSnapshot`] behind a lock. Every
//! resolution builds a complete snapshot and swaps it in, so readers see
//! either the old or the new permission set, never a mix. Concurrent
//! refreshes resolve last-writer-wins.

pub mod capability;
pub mod guard;

pub use guard::{GuardDecision, PageGuard, Redirect};

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use tracing::{debug, info, warn};

use nw_common::{Identity, GUEST_ROLE_ID};

use crate::api::ApiClient;
use crate::credential::{Credential, CredentialStore};
use crate::error::ApiResult;

/// Whether the permission set has been resolved yet.
///
/// An empty `Loaded` set (guest, or a role without grants) is distinct
/// from `NotLoaded`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PermissionState {
    #[default]
    NotLoaded,
    Loaded(Arc<HashSet<String>>),
}

impl PermissionState {
    pub fn loaded<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Loaded(Arc::new(names.into_iter().map(Into::into).collect()))
    }

    pub fn empty() -> Self {
        Self::Loaded(Arc::new(HashSet::new()))
    }

    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Membership test. Always `false` while not loaded.
    pub fn contains(&self, name: &str) -> bool {
        match self {
            Self::NotLoaded => false,
            Self::Loaded(set) => set.contains(name),
        }
    }

    /// Granted names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = match self {
            Self::NotLoaded => Vec::new(),
            Self::Loaded(set) => set.iter().map(String::as_str).collect(),
        };
        names.sort_unstable();
        names
    }
}

/// Immutable view of the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessSnapshot {
    pub role_id: i64,
    /// Decoded credential identity; `None` for guests.
    pub identity: Option<Identity>,
    pub permissions: PermissionState,
}

impl AccessSnapshot {
    /// Startup state: guest role, nothing resolved yet.
    pub const fn initial(guest_role_id: i64) -> Self {
        Self {
            role_id: guest_role_id,
            identity: None,
            permissions: PermissionState::NotLoaded,
        }
    }

    /// Resolved guest state: no identity, empty permission set.
    pub fn guest(guest_role_id: i64) -> Self {
        Self {
            role_id: guest_role_id,
            identity: None,
            permissions: PermissionState::empty(),
        }
    }

    pub fn has_permission(&self, name: &str) -> bool {
        self.permissions.contains(name)
    }

    pub fn has_any(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.permissions.contains(name))
    }

    pub fn has_all(&self, names: &[&str]) -> bool {
        names.iter().all(|name| self.permissions.contains(name))
    }

    pub const fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Whether the signed-in user is `author_id`.
    pub fn owns(&self, author_id: i64) -> bool {
        self.identity.as_ref().is_some_and(|id| id.id == author_id)
    }
}

#[derive(Debug)]
struct Slot {
    /// Bumped whenever the session is dropped; resolutions started under
    /// an older epoch are discarded.
    epoch: u64,
    snapshot: Arc<AccessSnapshot>,
}

type SharedSlot = Arc<RwLock<Slot>>;

fn read_slot(slot: &SharedSlot) -> Arc<AccessSnapshot> {
    Arc::clone(&slot.read().unwrap_or_else(PoisonError::into_inner).snapshot)
}

/// Read-only handle on the access-control state.
#[derive(Debug, Clone)]
pub struct AccessReader {
    slot: SharedSlot,
}

impl AccessReader {
    /// Reader over a fixed snapshot, for embedding the gates without a
    /// live session.
    pub fn from_snapshot(snapshot: AccessSnapshot) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Slot {
                epoch: 0,
                snapshot: Arc::new(snapshot),
            })),
        }
    }

    pub fn snapshot(&self) -> Arc<AccessSnapshot> {
        read_slot(&self.slot)
    }

    /// Pure lookup: `false` for unknown names and before the first load.
    pub fn has_permission(&self, name: &str) -> bool {
        self.snapshot().has_permission(name)
    }

    pub fn role_id(&self) -> i64 {
        self.snapshot().role_id
    }

    pub fn identity(&self) -> Option<Identity> {
        self.snapshot().identity.clone()
    }
}

/// Owner of the session's role and permission set.
pub struct AccessControl {
    api: ApiClient,
    store: Arc<dyn CredentialStore>,
    guest_role_id: i64,
    slot: SharedSlot,
}

impl std::fmt::Debug for AccessControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessControl")
            .field("guest_role_id", &self.guest_role_id)
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl AccessControl {
    pub fn new(api: ApiClient, store: Arc<dyn CredentialStore>) -> Self {
        Self::with_guest_role(api, store, GUEST_ROLE_ID)
    }

    pub fn with_guest_role(
        api: ApiClient,
        store: Arc<dyn CredentialStore>,
        guest_role_id: i64,
    ) -> Self {
        Self {
            api,
            store,
            guest_role_id,
            slot: Arc::new(RwLock::new(Slot {
                epoch: 0,
                snapshot: Arc::new(AccessSnapshot::initial(guest_role_id)),
            })),
        }
    }

    pub fn reader(&self) -> AccessReader {
        AccessReader {
            slot: Arc::clone(&self.slot),
        }
    }

    pub fn snapshot(&self) -> Arc<AccessSnapshot> {
        read_slot(&self.slot)
    }

    pub fn has_permission(&self, name: &str) -> bool {
        self.snapshot().has_permission(name)
    }

    pub const fn guest_role_id(&self) -> i64 {
        self.guest_role_id
    }

    /// Derive the session from the persisted credential on startup.
    pub async fn initialize(&self) -> ApiResult<()> {
        debug!("Initializing access control");
        self.resolve().await
    }

    /// Re-derive role and permissions, e.g. after login or a role change.
    pub async fn refresh(&self) -> ApiResult<()> {
        debug!("Refreshing access control");
        self.resolve().await
    }

    /// Drop the session: guest role, no identity, empty permission set,
    /// stored credential removed.
    ///
    /// Used for logout, expiry and `401` responses.
    pub fn reset_to_guest(&self) {
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear stored credential: {}", e);
        }
        self.fall_back_to_guest();
    }

    /// Guest snapshot for this run; the stored credential is left alone.
    fn fall_back_to_guest(&self) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        slot.epoch += 1;
        slot.snapshot = Arc::new(AccessSnapshot::guest(self.guest_role_id));
        info!("Session reset to guest role {}", self.guest_role_id);
    }

    fn epoch(&self) -> u64 {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .epoch
    }

    /// Swap in `snapshot` unless the session was dropped since `epoch`.
    fn publish(&self, epoch: u64, snapshot: AccessSnapshot) -> bool {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if slot.epoch != epoch {
            debug!("Discarding stale permission resolution");
            return false;
        }
        slot.snapshot = Arc::new(snapshot);
        true
    }

    async fn resolve(&self) -> ApiResult<()> {
        let epoch = self.epoch();

        let token = match self.store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!("Failed to read stored credential, continuing as guest: {}", e);
                self.api.set_token(None).await;
                self.fall_back_to_guest();
                return Ok(());
            }
        };
        let Some(token) = token else {
            debug!("No stored credential");
            self.api.set_token(None).await;
            self.reset_to_guest();
            return Ok(());
        };

        let credential = match Credential::decode_at(&token, Utc::now()) {
            Ok(credential) => credential,
            Err(e) => {
                warn!("Discarding stored credential: {}", e);
                self.api.set_token(None).await;
                self.reset_to_guest();
                return Ok(());
            }
        };
        self.api.set_token(Some(credential.token.clone())).await;

        let mut identity = credential.identity;
        match self.api.current_user().await {
            Ok(user) => {
                identity.role_id = user.role_id;
                identity.name = user.name.or(identity.name);
                identity.email = user.email.or(identity.email);
                identity.photo = user.photo.or(identity.photo);
            }
            Err(e) if e.is_unauthorized() => {
                self.reset_to_guest();
                return Ok(());
            }
            Err(e) => {
                warn!(
                    "Failed to fetch user info, using role {} from credential: {}",
                    identity.role_id, e
                );
            }
        }
        let role_id = identity.role_id;

        match self.api.fetch_role(role_id).await {
            Ok(role) => {
                let permissions = PermissionState::loaded(role.permission_names());
                let count = permissions.names().len();
                if self.publish(
                    epoch,
                    AccessSnapshot {
                        role_id,
                        identity: Some(identity),
                        permissions,
                    },
                ) {
                    info!("Loaded {} permissions for role {}", count, role_id);
                }
                Ok(())
            }
            Err(e) if e.is_unauthorized() => {
                self.reset_to_guest();
                Ok(())
            }
            Err(e) => {
                warn!(
                    "Failed to fetch permissions for role {}, keeping last known set: {}",
                    role_id, e
                );
                // A kept set stays paired with the role it was fetched for.
                let previous = self.snapshot();
                if previous.permissions.is_loaded() {
                    identity.role_id = previous.role_id;
                }
                self.publish(
                    epoch,
                    AccessSnapshot {
                        role_id: identity.role_id,
                        identity: Some(identity),
                        permissions: previous.permissions.clone(),
                    },
                );
                Err(e)
            }
        }
    }
}
