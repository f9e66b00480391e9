//! Comment Backend Seam
//!
//! The thread engine only talks to this trait. [`ApiClient`] implements it
//! against the REST API; tests plug in an in-memory source.
//!
//! [`ApiClient`]: crate::api::ApiClient

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use nw_common::{Comment, ContentType, SortOrder};

use crate::error::ApiResult;

/// Parameters of one comment page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentQuery {
    pub content_type: ContentType,
    pub content_id: i64,
    /// `None` lists top-level comments, `Some(id)` the replies to `id`.
    pub parent_id: Option<i64>,
    pub order: SortOrder,
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
}

impl CommentQuery {
    /// First page of top-level comments.
    pub const fn top_level(
        content_type: ContentType,
        content_id: i64,
        order: SortOrder,
        limit: u32,
    ) -> Self {
        Self {
            content_type,
            content_id,
            parent_id: None,
            order,
            page: 1,
            limit,
        }
    }

    /// First page of replies to `parent_id`. Replies are always oldest first.
    pub const fn replies(
        content_type: ContentType,
        content_id: i64,
        parent_id: i64,
        limit: u32,
    ) -> Self {
        Self {
            content_type,
            content_id,
            parent_id: Some(parent_id),
            order: SortOrder::Asc,
            page: 1,
            limit,
        }
    }

    /// Same query for another page.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

/// One page of comments plus the total the server reports for the node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPage {
    pub items: Vec<Comment>,
    pub total: u64,
}

/// Backend the thread engine reads from and mutates through.
#[async_trait]
pub trait CommentSource: Send + Sync {
    /// Fetch one page of a thread node.
    async fn fetch(&self, query: &CommentQuery) -> ApiResult<CommentPage>;

    /// Post a comment, or a reply when `parent_id` is set.
    async fn add(
        &self,
        content_type: ContentType,
        content_id: i64,
        parent_id: Option<i64>,
        body: &str,
    ) -> ApiResult<Option<String>>;

    /// Replace a comment's body.
    async fn edit(
        &self,
        content_type: ContentType,
        comment_id: i64,
        body: &str,
    ) -> ApiResult<Option<String>>;

    /// Hard-delete a comment.
    async fn remove(&self, content_type: ContentType, comment_id: i64)
        -> ApiResult<Option<String>>;
}
