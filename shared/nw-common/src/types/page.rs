//! Pagination Types

use serde::{Deserialize, Serialize};

/// Paging metadata attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub current_page: u32,
    pub items_per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl Meta {
    /// Whether a page after the current one exists.
    pub const fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Whether a page before the current one exists.
    pub const fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub meta: Meta,
}

impl<T> Default for Paged<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            meta: Meta::default(),
        }
    }
}
