//! News Endpoints

use tracing::debug;

use nw_common::{News, NewsRequest, NewsStatus, Paged, SortOrder};

use super::{page_query, ApiClient};
use crate::error::ApiResult;

impl ApiClient {
    /// List news articles, optionally narrowed to one status.
    pub async fn list_news(
        &self,
        page: u32,
        limit: u32,
        status: Option<NewsStatus>,
        order: SortOrder,
    ) -> ApiResult<Paged<News>> {
        let mut query = page_query(page, limit, order);
        if let Some(status) = status {
            query.push(("status", status.as_str().to_string()));
        }
        let env = self.get("/news", &query, "fetch news").await?;
        Ok(Paged {
            items: env.optional_field("data")?.unwrap_or_default(),
            meta: env.optional_field("meta")?.unwrap_or_default(),
        })
    }

    /// Full-text search over news articles.
    pub async fn search_news(
        &self,
        search: &str,
        page: u32,
        limit: u32,
        order: SortOrder,
    ) -> ApiResult<Paged<News>> {
        let mut query = page_query(page, limit, order);
        query.push(("search", search.to_string()));
        let env = self.get("/news/search", &query, "search news").await?;
        Ok(Paged {
            items: env.optional_field("data")?.unwrap_or_default(),
            meta: env.optional_field("meta")?.unwrap_or_default(),
        })
    }

    /// Fetch one article by slug.
    pub async fn news_by_slug(&self, slug: &str) -> ApiResult<News> {
        let env = self
            .get(&format!("/news/article/{slug}"), &[], "fetch news article")
            .await?;
        env.field("news")
    }

    /// Create an article.
    pub async fn add_news(&self, request: &NewsRequest) -> ApiResult<Option<String>> {
        debug!("Creating news '{}'", request.title);
        let env = self.post("/news/add", &[], request, "save news").await?;
        Ok(env.into_message())
    }

    /// Update an article; returns the (possibly regenerated) slug.
    pub async fn update_news(
        &self,
        news_id: i64,
        request: &NewsRequest,
    ) -> ApiResult<Option<String>> {
        debug!("Updating news {}", news_id);
        let env = self
            .put(&format!("/news/edit/{news_id}"), request, "save news")
            .await?;
        env.optional_field("slug")
    }

    /// Move an article through the editorial workflow.
    ///
    /// `reason` accompanies rejections.
    pub async fn update_news_status(
        &self,
        news_id: i64,
        status: NewsStatus,
        reason: Option<&str>,
    ) -> ApiResult<Option<String>> {
        debug!("Setting news {} status to {}", news_id, status);
        let env = self
            .put(
                &format!("/news/update-status/{news_id}"),
                &serde_json::json!({ "status": status, "reason": reason }),
                "set news status",
            )
            .await?;
        Ok(env.into_message())
    }

    /// Delete an article.
    pub async fn delete_news(&self, news_id: i64) -> ApiResult<Option<String>> {
        debug!("Deleting news {}", news_id);
        let env = self
            .delete(&format!("/news/delete/{news_id}"), "delete news")
            .await?;
        Ok(env.into_message())
    }
}
