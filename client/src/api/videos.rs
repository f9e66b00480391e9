//! Video Endpoints

use tracing::debug;

use nw_common::{Paged, SortOrder, Video, VideoRequest, VideoStatus};

use super::{page_query, ApiClient};
use crate::error::ApiResult;

impl ApiClient {
    /// List videos, optionally narrowed to one status.
    pub async fn list_videos(
        &self,
        page: u32,
        limit: u32,
        status: Option<VideoStatus>,
        order: SortOrder,
    ) -> ApiResult<Paged<Video>> {
        let mut query = page_query(page, limit, order);
        if let Some(status) = status {
            query.push(("status", status.as_str().to_string()));
        }
        let env = self.get("/videos", &query, "fetch videos").await?;
        Ok(Paged {
            items: env.optional_field("data")?.unwrap_or_default(),
            meta: env.optional_field("meta")?.unwrap_or_default(),
        })
    }

    /// Search videos by title, optionally within a category and status.
    pub async fn search_videos(
        &self,
        search: &str,
        category_id: Option<i64>,
        status: Option<VideoStatus>,
        page: u32,
        limit: u32,
        order: SortOrder,
    ) -> ApiResult<Paged<Video>> {
        let mut query = page_query(page, limit, order);
        query.push(("search", search.to_string()));
        if let Some(category_id) = category_id {
            query.push(("category", category_id.to_string()));
        }
        if let Some(status) = status {
            query.push(("status", status.as_str().to_string()));
        }
        let env = self.get("/videos/search", &query, "search videos").await?;
        Ok(Paged {
            items: env.optional_field("data")?.unwrap_or_default(),
            meta: env.optional_field("meta")?.unwrap_or_default(),
        })
    }

    /// Fetch one video by slug.
    pub async fn video_by_slug(&self, slug: &str) -> ApiResult<Video> {
        let env = self
            .get(&format!("/videos/view/{slug}"), &[], "fetch video")
            .await?;
        env.field("video")
    }

    /// Register a video.
    pub async fn add_video(&self, request: &VideoRequest) -> ApiResult<Option<String>> {
        debug!("Creating video '{}'", request.title);
        let env = self.post("/videos/add", &[], request, "save video").await?;
        Ok(env.into_message())
    }

    /// Update a video; returns the (possibly regenerated) slug.
    pub async fn update_video(
        &self,
        video_id: i64,
        request: &VideoRequest,
    ) -> ApiResult<Option<String>> {
        debug!("Updating video {}", video_id);
        let env = self
            .put(&format!("/videos/edit/{video_id}"), request, "save video")
            .await?;
        env.optional_field("slug")
    }

    /// Change a video's publication status.
    pub async fn update_video_status(
        &self,
        video_id: i64,
        status: VideoStatus,
    ) -> ApiResult<Option<String>> {
        debug!("Setting video {} status to {}", video_id, status);
        let env = self
            .put(
                &format!("/videos/update-status/{video_id}"),
                &serde_json::json!({ "status": status }),
                "set video status",
            )
            .await?;
        Ok(env.into_message())
    }

    /// Delete a video.
    pub async fn delete_video(&self, video_id: i64) -> ApiResult<Option<String>> {
        debug!("Deleting video {}", video_id);
        let env = self
            .delete(&format!("/videos/delete/{video_id}"), "delete video")
            .await?;
        Ok(env.into_message())
    }
}
