//! Thread Nodes and Cursors

use nw_common::{Comment, SortOrder};

/// Address of a paginated list inside one thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ThreadNode {
    /// The top-level comments of the content item.
    TopLevel,
    /// Replies to the given top-level comment.
    Replies(i64),
}

impl ThreadNode {
    /// Parent id sent when listing or posting under this node.
    pub const fn parent_id(self) -> Option<i64> {
        match self {
            Self::TopLevel => None,
            Self::Replies(id) => Some(id),
        }
    }
}

/// Lifecycle of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodePhase {
    #[default]
    Collapsed,
    Loading,
    Loaded,
}

/// Page cursor of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadPage {
    pub page_size: u32,
    pub pages_loaded: u32,
    pub total_count: u64,
    pub sort_order: SortOrder,
}

impl ThreadPage {
    pub const fn new(page_size: u32, sort_order: SortOrder) -> Self {
        Self {
            page_size,
            pages_loaded: 0,
            total_count: 0,
            sort_order,
        }
    }

    /// Number of items the loaded pages cover.
    pub fn materialized(&self) -> u64 {
        (u64::from(self.pages_loaded) * u64::from(self.page_size)).min(self.total_count)
    }

    pub fn has_more(&self) -> bool {
        self.total_count > u64::from(self.pages_loaded) * u64::from(self.page_size)
    }

    /// 1-based number of the page after the loaded ones.
    pub const fn next_page(&self) -> u32 {
        self.pages_loaded + 1
    }
}

/// Loaded state of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeState {
    pub phase: NodePhase,
    pub cursor: ThreadPage,
    pub items: Vec<Comment>,
}

impl NodeState {
    pub const fn new(page_size: u32, sort_order: SortOrder) -> Self {
        Self {
            phase: NodePhase::Collapsed,
            cursor: ThreadPage::new(page_size, sort_order),
            items: Vec::new(),
        }
    }

    /// Append `page`, skipping ids already present. Returns how many were
    /// added.
    pub fn append(&mut self, page: Vec<Comment>) -> usize {
        let before = self.items.len();
        for comment in page {
            if !self.items.iter().any(|c| c.id == comment.id) {
                self.items.push(comment);
            }
        }
        self.items.len() - before
    }
}
