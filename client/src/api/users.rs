//! User Administration Endpoints

use serde::Serialize;
use tracing::{debug, info};

use nw_common::{ProfileUpdate, UserSummary};

use super::ApiClient;
use crate::error::ApiResult;

/// Role reassignment body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EditUserRoleRequest<'a> {
    target_email: &'a str,
    new_role: i64,
}

impl ApiClient {
    /// List all registered users.
    pub async fn list_users(&self) -> ApiResult<Vec<UserSummary>> {
        let env = self.get("/user/user-list", &[], "fetch user list").await?;
        let users: Vec<UserSummary> = env.optional_field("users")?.unwrap_or_default();
        debug!("Fetched {} users", users.len());
        Ok(users)
    }

    /// Move a user to another role.
    ///
    /// When the caller changes their own role, the access-control store
    /// must be refreshed afterwards.
    pub async fn edit_user_role(
        &self,
        target_email: &str,
        new_role: i64,
    ) -> ApiResult<Option<String>> {
        info!("Assigning role {} to {}", new_role, target_email);
        let env = self
            .put(
                "/user/edit-user-role",
                &EditUserRoleRequest {
                    target_email,
                    new_role,
                },
                "edit user role",
            )
            .await?;
        Ok(env.into_message())
    }

    /// Update the caller's own profile fields.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<Option<String>> {
        let env = self
            .put("/user/edit-info", update, "edit user info")
            .await?;
        Ok(env.into_message())
    }
}
