//! Comment Endpoints

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use nw_common::ContentType;

use super::ApiClient;
use crate::comments::{CommentPage, CommentQuery, CommentSource};
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Serialize)]
struct AddCommentRequest<'a> {
    source_id: i64,
    parent_id: Option<i64>,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct EditCommentRequest<'a> {
    content: &'a str,
}

/// Reject blank bodies before they reach the server.
fn non_blank(body: &str) -> ApiResult<&str> {
    let body = body.trim();
    if body.is_empty() {
        return Err(ApiError::Invalid(nw_common::Error::Validation(
            "Comment cannot be empty".to_string(),
        )));
    }
    Ok(body)
}

impl ApiClient {
    /// Fetch one page of top-level comments or replies.
    pub async fn list_comments(&self, query: &CommentQuery) -> ApiResult<CommentPage> {
        let mut params = super::page_query(query.page, query.limit, query.order);
        if let Some(parent_id) = query.parent_id {
            params.push(("parent_id", parent_id.to_string()));
        }
        let env = self
            .get(
                &format!("/comments/{}/{}", query.content_type, query.content_id),
                &params,
                "fetch comments",
            )
            .await?;
        let page = CommentPage {
            items: env.optional_field("data")?.unwrap_or_default(),
            total: env.optional_field("total")?.unwrap_or_default(),
        };
        debug!(
            "Fetched {} of {} comments for {} {} (parent {:?}, page {})",
            page.items.len(),
            page.total,
            query.content_type,
            query.content_id,
            query.parent_id,
            query.page
        );
        Ok(page)
    }

    /// Post a comment or reply.
    pub async fn add_comment(
        &self,
        content_type: ContentType,
        content_id: i64,
        parent_id: Option<i64>,
        body: &str,
    ) -> ApiResult<Option<String>> {
        let content = non_blank(body)?;
        debug!(
            "Posting comment on {} {} (parent {:?})",
            content_type, content_id, parent_id
        );
        let env = self
            .post(
                &format!("/comments/{content_type}/add"),
                &[],
                &AddCommentRequest {
                    source_id: content_id,
                    parent_id,
                    content,
                },
                "post comment",
            )
            .await?;
        Ok(env.into_message())
    }

    /// Replace a comment's body.
    pub async fn edit_comment(
        &self,
        content_type: ContentType,
        comment_id: i64,
        body: &str,
    ) -> ApiResult<Option<String>> {
        let content = non_blank(body)?;
        debug!("Editing {} comment {}", content_type, comment_id);
        let env = self
            .put(
                &format!("/comments/{content_type}/edit/{comment_id}"),
                &EditCommentRequest { content },
                "edit comment",
            )
            .await?;
        Ok(env.into_message())
    }

    /// Delete a comment.
    pub async fn delete_comment(
        &self,
        content_type: ContentType,
        comment_id: i64,
    ) -> ApiResult<Option<String>> {
        debug!("Deleting {} comment {}", content_type, comment_id);
        let env = self
            .delete(
                &format!("/comments/{content_type}/delete/{comment_id}"),
                "delete comment",
            )
            .await?;
        Ok(env.into_message())
    }
}

#[async_trait]
impl CommentSource for ApiClient {
    async fn fetch(&self, query: &CommentQuery) -> ApiResult<CommentPage> {
        self.list_comments(query).await
    }

    async fn add(
        &self,
        content_type: ContentType,
        content_id: i64,
        parent_id: Option<i64>,
        body: &str,
    ) -> ApiResult<Option<String>> {
        self.add_comment(content_type, content_id, parent_id, body)
            .await
    }

    async fn edit(
        &self,
        content_type: ContentType,
        comment_id: i64,
        body: &str,
    ) -> ApiResult<Option<String>> {
        self.edit_comment(content_type, comment_id, body).await
    }

    async fn remove(
        &self,
        content_type: ContentType,
        comment_id: i64,
    ) -> ApiResult<Option<String>> {
        self.delete_comment(content_type, comment_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_body_is_rejected() {
        assert!(matches!(non_blank("   \n"), Err(ApiError::Invalid(_))));
        assert_eq!(non_blank("  halo  ").unwrap(), "halo");
    }
}
