//! Role Types

use serde::{Deserialize, Serialize};

/// Named capability in the permission catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    pub name: String,
}

/// Role with its granted permissions.
///
/// The API returns both the full permission records and a flattened list
/// of names; the dashboard only checks the names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub permission: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Role {
    /// Permission names granted by this role.
    ///
    /// Falls back to the full records when the flattened list is absent.
    pub fn permission_names(&self) -> Vec<String> {
        if self.permission.is_empty() {
            self.permissions.iter().map(|p| p.name.clone()).collect()
        } else {
            self.permission.clone()
        }
    }

    /// Whether this is the "banned" role, which needs `user-ban` to assign.
    pub fn is_banned_role(&self) -> bool {
        self.name.eq_ignore_ascii_case("banned")
    }
}

/// Body of role create/update requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRequest {
    pub name: String,
    pub permissions: Vec<Permission>,
}
