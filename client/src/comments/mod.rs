//! Comment Thread Engine
//!
//! Two-level discussion threads (comments and their replies) attached to a
//! news article or video. Each [`ThreadNode`] pages independently. Pages
//! are appended on "load more"; any mutation reloads the affected nodes
//! from their first page instead of patching local state.

mod node;
mod source;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use nw_common::{sort_comments, Comment, ContentType, SortOrder};

pub use node::{NodePhase, NodeState, ThreadNode, ThreadPage};
pub use source::{CommentPage, CommentQuery, CommentSource};

use crate::access::capability::{can_create_comment, can_delete_comment, can_edit_comment};
use crate::access::{AccessReader, AccessSnapshot};
use crate::error::{ApiError, ApiResult};

/// Default number of comments per page.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// First page of top-level comments, ordered by `(created_at, id)`.
pub async fn list_top_level(
    source: &dyn CommentSource,
    content_type: ContentType,
    content_id: i64,
    order: SortOrder,
    page_size: u32,
) -> ApiResult<CommentPage> {
    let query = CommentQuery::top_level(content_type, content_id, order, page_size);
    fetch_sorted(source, &query).await
}

/// First page of replies to `parent_id`, oldest first.
pub async fn list_replies(
    source: &dyn CommentSource,
    content_type: ContentType,
    content_id: i64,
    parent_id: i64,
    page_size: u32,
) -> ApiResult<CommentPage> {
    let query = CommentQuery::replies(content_type, content_id, parent_id, page_size);
    fetch_sorted(source, &query).await
}

async fn fetch_sorted(source: &dyn CommentSource, query: &CommentQuery) -> ApiResult<CommentPage> {
    let mut page = source.fetch(query).await?;
    sort_comments(&mut page.items, query.order);
    Ok(page)
}

/// One content item's comment thread.
pub struct CommentThread {
    source: Arc<dyn CommentSource>,
    access: Option<AccessReader>,
    content_type: ContentType,
    content_id: i64,
    page_size: u32,
    order: SortOrder,
    nodes: HashMap<ThreadNode, NodeState>,
    drafts: HashMap<ThreadNode, String>,
    edits: HashMap<i64, String>,
}

impl std::fmt::Debug for CommentThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentThread")
            .field("content_type", &self.content_type)
            .field("content_id", &self.content_id)
            .field("order", &self.order)
            .field("nodes", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

impl CommentThread {
    pub fn new(source: Arc<dyn CommentSource>, content_type: ContentType, content_id: i64) -> Self {
        Self {
            source,
            access: None,
            content_type,
            content_id,
            page_size: DEFAULT_PAGE_SIZE,
            order: SortOrder::Desc,
            nodes: HashMap::new(),
            drafts: HashMap::new(),
            edits: HashMap::new(),
        }
    }

    /// Gate mutations on the session's comment permissions.
    #[must_use]
    pub fn with_access(mut self, access: AccessReader) -> Self {
        self.access = Some(access);
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    #[must_use]
    pub const fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub const fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub const fn content_id(&self) -> i64 {
        self.content_id
    }

    pub const fn sort_order(&self) -> SortOrder {
        self.order
    }

    pub fn node(&self, node: ThreadNode) -> Option<&NodeState> {
        self.nodes.get(&node)
    }

    pub fn phase(&self, node: ThreadNode) -> NodePhase {
        self.nodes.get(&node).map_or(NodePhase::Collapsed, |n| n.phase)
    }

    pub fn items(&self, node: ThreadNode) -> &[Comment] {
        self.nodes.get(&node).map_or(&[], |n| n.items.as_slice())
    }

    pub fn total(&self, node: ThreadNode) -> u64 {
        self.nodes.get(&node).map_or(0, |n| n.cursor.total_count)
    }

    pub fn has_more(&self, node: ThreadNode) -> bool {
        self.nodes.get(&node).is_some_and(|n| n.cursor.has_more())
    }

    /// Look a loaded comment or reply up by id.
    pub fn find(&self, comment_id: i64) -> Option<&Comment> {
        self.nodes
            .values()
            .flat_map(|n| n.items.iter())
            .find(|c| c.id == comment_id)
    }

    fn node_order(&self, node: ThreadNode) -> SortOrder {
        match node {
            ThreadNode::TopLevel => self.order,
            ThreadNode::Replies(_) => SortOrder::Asc,
        }
    }

    fn query(&self, node: ThreadNode, page: u32) -> CommentQuery {
        CommentQuery {
            content_type: self.content_type,
            content_id: self.content_id,
            parent_id: node.parent_id(),
            order: self.node_order(node),
            page,
            limit: self.page_size,
        }
    }

    /// Fetch the first page of `node`, replacing whatever it held.
    pub async fn load(&mut self, node: ThreadNode) -> ApiResult<()> {
        let order = self.node_order(node);
        let page_size = self.page_size;
        let state = self
            .nodes
            .entry(node)
            .or_insert_with(|| NodeState::new(page_size, order));
        let previous = state.phase;
        state.phase = NodePhase::Loading;

        debug!(
            "Loading {:?} of {} {}",
            node, self.content_type, self.content_id
        );
        let result = fetch_sorted(self.source.as_ref(), &self.query(node, 1)).await;

        let Some(state) = self.nodes.get_mut(&node) else {
            return result.map(|_| ());
        };
        match result {
            Ok(page) => {
                state.cursor = ThreadPage {
                    page_size,
                    pages_loaded: 1,
                    total_count: page.total,
                    sort_order: order,
                };
                state.items.clear();
                state.append(page.items);
                state.phase = NodePhase::Loaded;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load {:?}: {}", node, e);
                state.phase = previous;
                if previous == NodePhase::Collapsed {
                    self.nodes.remove(&node);
                }
                Err(e)
            }
        }
    }

    /// Fetch the next page of a loaded node and append it.
    ///
    /// Returns the number of new items; `0` without a request when the node
    /// is not loaded or nothing more exists.
    pub async fn load_more(&mut self, node: ThreadNode) -> ApiResult<usize> {
        let next = match self.nodes.get_mut(&node) {
            Some(state) if state.phase == NodePhase::Loaded && state.cursor.has_more() => {
                state.phase = NodePhase::Loading;
                state.cursor.next_page()
            }
            _ => return Ok(0),
        };

        debug!("Loading page {} of {:?}", next, node);
        let result = fetch_sorted(self.source.as_ref(), &self.query(node, next)).await;

        let Some(state) = self.nodes.get_mut(&node) else {
            return result.map(|_| 0);
        };
        state.phase = NodePhase::Loaded;
        let page = result?;
        state.cursor.pages_loaded = next;
        state.cursor.total_count = page.total;
        Ok(state.append(page.items))
    }

    /// Switch the top-level order and reload from the first page.
    pub async fn set_sort_order(&mut self, order: SortOrder) -> ApiResult<()> {
        if order == self.order && self.phase(ThreadNode::TopLevel) == NodePhase::Loaded {
            return Ok(());
        }
        self.order = order;
        self.load(ThreadNode::TopLevel).await
    }

    /// Open the replies of a top-level comment.
    pub async fn expand(&mut self, comment_id: i64) -> ApiResult<()> {
        self.ensure_top_level(comment_id)?;
        let node = ThreadNode::Replies(comment_id);
        if self.phase(node) == NodePhase::Loaded {
            return Ok(());
        }
        self.load(node).await
    }

    /// Page through the top level until `comment_id` is loaded.
    ///
    /// Returns whether it was found among the top-level comments.
    pub async fn seek_top_level(&mut self, comment_id: i64) -> ApiResult<bool> {
        if self.phase(ThreadNode::TopLevel) != NodePhase::Loaded {
            self.load(ThreadNode::TopLevel).await?;
        }
        loop {
            if self.items(ThreadNode::TopLevel).iter().any(|c| c.id == comment_id) {
                return Ok(true);
            }
            if self.load_more(ThreadNode::TopLevel).await? == 0 {
                return Ok(false);
            }
        }
    }

    /// Close the replies of a top-level comment and forget them.
    pub fn collapse(&mut self, comment_id: i64) {
        self.nodes.remove(&ThreadNode::Replies(comment_id));
    }

    fn gate(
        &self,
        allowed: impl FnOnce(&AccessSnapshot) -> bool,
        action: &str,
    ) -> ApiResult<()> {
        match &self.access {
            Some(reader) if !allowed(&reader.snapshot()) => Err(ApiError::Forbidden {
                message: format!("You are not allowed to {action}"),
            }),
            _ => Ok(()),
        }
    }

    /// Replies nest one level only: a loaded reply cannot be a parent.
    fn ensure_top_level(&self, comment_id: i64) -> ApiResult<()> {
        match self.find(comment_id) {
            Some(comment) if !comment.is_top_level() => {
                Err(ApiError::Invalid(nw_common::Error::Validation(format!(
                    "Comment {comment_id} is a reply and cannot have replies"
                ))))
            }
            _ => Ok(()),
        }
    }

    fn loaded_comment(&self, comment_id: i64) -> ApiResult<Comment> {
        self.find(comment_id).cloned().ok_or_else(|| {
            ApiError::Invalid(nw_common::Error::Validation(format!(
                "Comment {comment_id} is not loaded"
            )))
        })
    }

    /// Reload after a successful mutation. Failures are logged; the
    /// mutation itself already went through.
    async fn reload(&mut self, node: ThreadNode) {
        if let Err(e) = self.load(node).await {
            warn!("Failed to reload {:?} after change: {}", node, e);
        }
    }

    /// Post a comment (`parent_id == None`) or a reply, then reload the
    /// node it lands in.
    pub async fn add(&mut self, parent_id: Option<i64>, body: &str) -> ApiResult<Option<String>> {
        self.gate(can_create_comment, "comment")?;
        if let Some(parent_id) = parent_id {
            self.ensure_top_level(parent_id)?;
        }
        let message = self
            .source
            .add(self.content_type, self.content_id, parent_id, body)
            .await?;
        info!(
            "Posted comment on {} {} (parent {:?})",
            self.content_type, self.content_id, parent_id
        );
        let node = parent_id.map_or(ThreadNode::TopLevel, ThreadNode::Replies);
        self.reload(node).await;
        Ok(message)
    }

    /// Replace a loaded comment's body, then reload its node (and the
    /// top level for replies).
    pub async fn edit(&mut self, comment_id: i64, body: &str) -> ApiResult<Option<String>> {
        let comment = self.loaded_comment(comment_id)?;
        self.gate(|s| can_edit_comment(s, &comment), "edit this comment")?;
        let message = self
            .source
            .edit(self.content_type, comment_id, body)
            .await?;
        info!("Edited comment {}", comment_id);
        if let Some(parent_id) = comment.parent_id {
            self.reload(ThreadNode::Replies(parent_id)).await;
        }
        self.reload(ThreadNode::TopLevel).await;
        Ok(message)
    }

    /// Delete a loaded comment, then reload the owning node.
    pub async fn delete(&mut self, comment_id: i64) -> ApiResult<Option<String>> {
        let comment = self.loaded_comment(comment_id)?;
        self.gate(|s| can_delete_comment(s, &comment), "delete this comment")?;
        let message = self
            .source
            .remove(self.content_type, comment_id)
            .await?;
        info!("Deleted comment {}", comment_id);
        self.edits.remove(&comment_id);
        match comment.parent_id {
            Some(parent_id) => self.reload(ThreadNode::Replies(parent_id)).await,
            None => {
                self.nodes.remove(&ThreadNode::Replies(comment_id));
                self.drafts.remove(&ThreadNode::Replies(comment_id));
            }
        }
        self.reload(ThreadNode::TopLevel).await;
        Ok(message)
    }

    // Drafts

    pub fn set_draft(&mut self, node: ThreadNode, text: impl Into<String>) {
        self.drafts.insert(node, text.into());
    }

    pub fn draft(&self, node: ThreadNode) -> &str {
        self.drafts.get(&node).map_or("", String::as_str)
    }

    /// Post the draft for `node`. The draft is kept if posting fails.
    pub async fn post_draft(&mut self, node: ThreadNode) -> ApiResult<Option<String>> {
        let body = self.draft(node).to_string();
        let message = self.add(node.parent_id(), &body).await?;
        self.drafts.remove(&node);
        Ok(message)
    }

    /// Start editing a loaded comment, seeding the buffer with its body.
    pub fn begin_edit(&mut self, comment_id: i64) -> ApiResult<()> {
        let comment = self.loaded_comment(comment_id)?;
        self.gate(|s| can_edit_comment(s, &comment), "edit this comment")?;
        self.edits.insert(comment_id, comment.body);
        Ok(())
    }

    pub fn set_edit(&mut self, comment_id: i64, text: impl Into<String>) {
        self.edits.insert(comment_id, text.into());
    }

    pub fn edit_buffer(&self, comment_id: i64) -> Option<&str> {
        self.edits.get(&comment_id).map(String::as_str)
    }

    pub fn cancel_edit(&mut self, comment_id: i64) {
        self.edits.remove(&comment_id);
    }

    /// Submit the edit buffer. The buffer is kept if saving fails.
    pub async fn save_edit(&mut self, comment_id: i64) -> ApiResult<Option<String>> {
        let body = self.edits.get(&comment_id).cloned().unwrap_or_default();
        let message = self.edit(comment_id, &body).await?;
        self.edits.remove(&comment_id);
        Ok(message)
    }
}
