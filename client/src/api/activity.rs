//! Activity Log Endpoint

use nw_common::{ActivityFilter, Paged, SortOrder, UserActivity};

use super::{page_query, ApiClient};
use crate::error::ApiResult;

impl ApiClient {
    /// Fetch one page of the audited activity log.
    pub async fn user_activity(
        &self,
        filter: &ActivityFilter,
        page: u32,
        limit: u32,
        order: SortOrder,
    ) -> ApiResult<Paged<UserActivity>> {
        let env = self
            .post(
                "/user/user-activity",
                &page_query(page, limit, order),
                filter,
                "fetch user activity",
            )
            .await?;
        Ok(Paged {
            items: env.optional_field("data")?.unwrap_or_default(),
            meta: env.optional_field("meta")?.unwrap_or_default(),
        })
    }
}
