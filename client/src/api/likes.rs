//! Like Endpoints

use tracing::debug;

use nw_common::Like;

use super::ApiClient;
use crate::error::ApiResult;

impl ApiClient {
    /// Whether the caller has liked the article with this slug.
    pub async fn is_liked(&self, slug: &str) -> ApiResult<bool> {
        let env = self
            .get(&format!("/likes/{slug}/like"), &[], "fetch like")
            .await?;
        Ok(env.optional_field("data")?.unwrap_or(false))
    }

    /// Articles liked by the caller.
    pub async fn my_likes(&self) -> ApiResult<Vec<Like>> {
        let env = self.get("/likes/likes-list", &[], "fetch likes list").await?;
        Ok(env.optional_field("data")?.unwrap_or_default())
    }

    /// Users who liked an article.
    pub async fn news_likes(&self, news_id: i64) -> ApiResult<Vec<Like>> {
        let env = self
            .get(
                &format!("/likes/news-likes-list/{news_id}"),
                &[],
                "fetch news likes",
            )
            .await?;
        Ok(env.optional_field("data")?.unwrap_or_default())
    }

    /// Number of likes on an article.
    pub async fn likes_count(&self, news_id: i64) -> ApiResult<u64> {
        let env = self
            .get(&format!("/likes/{news_id}/count"), &[], "fetch likes count")
            .await?;
        Ok(env.optional_field("total")?.unwrap_or(0))
    }

    /// Like or unlike an article.
    pub async fn toggle_like(&self, news_id: i64) -> ApiResult<Option<String>> {
        debug!("Toggling like on news {}", news_id);
        let env = self
            .post(
                &format!("/likes/toggle-like/{news_id}"),
                &[],
                &serde_json::json!({}),
                "toggle like",
            )
            .await?;
        Ok(env.into_message())
    }
}
