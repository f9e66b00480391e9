//! User Types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role id of the platform super administrator.
pub const SUPER_ADMIN_ROLE_ID: i64 = 1;

/// Lowest-privilege role, used when no valid session exists.
pub const GUEST_ROLE_ID: i64 = 7;

/// Identity fields carried by a decoded session credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// User ID.
    pub id: i64,
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Avatar path relative to the media host.
    pub photo: Option<String>,
    /// Role the session was issued for.
    pub role_id: i64,
    /// When the credential was issued.
    pub issued_at: Option<DateTime<Utc>>,
    /// When the credential stops being valid.
    pub expires_at: DateTime<Utc>,
}

/// Current session user as returned by `/user/user-info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    pub role_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub no_ktp: Option<String>,
}

/// Row of the administrative user list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub role_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub no_ktp: Option<String>,
}

/// Editable fields of the caller's own profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: String,
    pub username: String,
    #[serde(rename = "noKTP")]
    pub no_ktp: String,
    pub phone: String,
}
