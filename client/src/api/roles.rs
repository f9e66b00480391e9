//! Role Management Endpoints
//!
//! Roles, the permission catalogue, and role CRUD.

use tracing::debug;

use nw_common::{Paged, Permission, Role, RoleRequest, SortOrder};

use super::{page_query, ApiClient};
use crate::error::ApiResult;

impl ApiClient {
    /// Fetch one role with its granted permission names.
    pub async fn fetch_role(&self, role_id: i64) -> ApiResult<Role> {
        debug!("Fetching role {}", role_id);
        let env = self
            .get("/roles/role", &[("id", role_id.to_string())], "fetch role")
            .await?;
        let role: Role = env.field("data")?;
        debug!(
            "Fetched role {} with {} permissions",
            role.id,
            role.permission_names().len()
        );
        Ok(role)
    }

    /// Search roles by name.
    pub async fn search_roles(
        &self,
        search: &str,
        page: u32,
        limit: u32,
        order: SortOrder,
    ) -> ApiResult<Paged<Role>> {
        let mut query = page_query(page, limit, order);
        query.push(("search", search.to_string()));
        let env = self.get("/roles", &query, "search roles").await?;
        Ok(Paged {
            items: env.optional_field("data")?.unwrap_or_default(),
            meta: env.optional_field("meta")?.unwrap_or_default(),
        })
    }

    /// Fetch the full permission catalogue.
    pub async fn list_permissions(&self) -> ApiResult<Vec<Permission>> {
        let env = self
            .get("/roles/permission/", &[], "fetch permissions")
            .await?;
        let permissions: Vec<Permission> = env.optional_field("data")?.unwrap_or_default();
        debug!("Fetched {} permissions", permissions.len());
        Ok(permissions)
    }

    /// Create a role.
    pub async fn add_role(&self, request: &RoleRequest) -> ApiResult<Option<String>> {
        debug!("Creating role '{}'", request.name);
        let env = self.post("/roles/add", &[], request, "create role").await?;
        Ok(env.into_message())
    }

    /// Replace a role's name and permissions.
    pub async fn update_role(
        &self,
        role_id: i64,
        request: &RoleRequest,
    ) -> ApiResult<Option<String>> {
        debug!("Updating role {}", role_id);
        let env = self
            .put(&format!("/roles/edit/{role_id}"), request, "update role")
            .await?;
        Ok(env.into_message())
    }

    /// Delete a role.
    pub async fn delete_role(&self, role_id: i64) -> ApiResult<Option<String>> {
        debug!("Deleting role {}", role_id);
        let env = self
            .delete(&format!("/roles/delete/{role_id}"), "delete role")
            .await?;
        Ok(env.into_message())
    }
}
