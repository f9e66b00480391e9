//! Page Guard
//!
//! Per-page authorization decision. A page is never considered ready while
//! the permission set is still unresolved.

use chrono::{DateTime, Utc};

use nw_common::permissions::DASHBOARD_ACCESS;

use super::{AccessReader, AccessSnapshot};

/// Where an unauthorized visitor is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Redirect {
    /// No valid session.
    Login,
    /// Signed in but lacking the required permission.
    NotFound,
}

impl Redirect {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::NotFound => "/404",
        }
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardDecision {
    /// Permissions are not loaded yet; show the blocking
    /// "checking authorization" state.
    Checking,
    Allow,
    Redirect(Redirect),
}

impl GuardDecision {
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Declarative route guard over a disjunction of permission names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageGuard {
    any_of: Vec<String>,
    session_required: bool,
}

impl PageGuard {
    /// Allow when any of `permissions` is held. An empty list accepts any
    /// valid session.
    pub fn new<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let any_of: Vec<String> = permissions.into_iter().map(Into::into).collect();
        Self {
            session_required: any_of.is_empty(),
            any_of,
        }
    }

    /// Layout-level gate: a live credential plus `dashboard-access`.
    pub fn dashboard() -> Self {
        Self {
            any_of: vec![DASHBOARD_ACCESS.to_string()],
            session_required: true,
        }
    }

    pub fn required(&self) -> &[String] {
        &self.any_of
    }

    pub fn check(&self, reader: &AccessReader) -> GuardDecision {
        self.decide_at(&reader.snapshot(), Utc::now())
    }

    pub fn decide(&self, snapshot: &AccessSnapshot) -> GuardDecision {
        self.decide_at(snapshot, Utc::now())
    }

    pub fn decide_at(&self, snapshot: &AccessSnapshot, now: DateTime<Utc>) -> GuardDecision {
        if !snapshot.permissions.is_loaded() {
            return GuardDecision::Checking;
        }

        let has_session = snapshot
            .identity
            .as_ref()
            .is_some_and(|identity| identity.expires_at > now);
        if self.session_required && !has_session {
            return GuardDecision::Redirect(Redirect::Login);
        }

        if self.any_of.is_empty() || self.any_of.iter().any(|p| snapshot.has_permission(p)) {
            GuardDecision::Allow
        } else {
            GuardDecision::Redirect(Redirect::NotFound)
        }
    }
}
