//! List View State
//!
//! Page, page size, status filter, search term and order of a content
//! list page. Changing the filter, search or order sends the view back to
//! page one.

use nw_common::{Meta, SortOrder};

/// Default rows per list page.
pub const DEFAULT_LIMIT: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery<S> {
    pub page: u32,
    pub limit: u32,
    /// `None` means "All".
    pub status: Option<S>,
    pub search: String,
    pub order: SortOrder,
}

impl<S> Default for ListQuery<S> {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
            status: None,
            search: String::new(),
            order: SortOrder::Desc,
        }
    }
}

impl<S: Copy + PartialEq> ListQuery<S> {
    pub fn new(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            ..Self::default()
        }
    }

    /// Whether the search endpoint should be used instead of the listing.
    pub fn is_search(&self) -> bool {
        !self.search.trim().is_empty()
    }

    pub fn set_status(&mut self, status: Option<S>) {
        if self.status != status {
            self.status = status;
            self.page = 1;
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if self.search != search {
            self.search = search;
            self.page = 1;
        }
    }

    pub fn set_order(&mut self, order: SortOrder) {
        if self.order != order {
            self.order = order;
            self.page = 1;
        }
    }

    pub fn set_limit(&mut self, limit: u32) {
        let limit = limit.max(1);
        if self.limit != limit {
            self.limit = limit;
            self.page = 1;
        }
    }

    /// Jump to `page`, clamped to the pages `meta` reports.
    pub fn set_page(&mut self, page: u32, meta: &Meta) {
        self.page = page.clamp(1, meta.total_pages.max(1));
    }

    pub fn next_page(&mut self, meta: &Meta) -> bool {
        if meta.has_next() {
            self.page = meta.current_page + 1;
            true
        } else {
            false
        }
    }

    pub fn previous_page(&mut self, meta: &Meta) -> bool {
        if meta.has_previous() {
            self.page = meta.current_page - 1;
            true
        } else {
            false
        }
    }
}

/// 1-based inclusive range of rows shown on the current page, for
/// "Showing x to y of z". `None` when the list is empty.
pub fn shown_range(meta: &Meta) -> Option<(u64, u64)> {
    if meta.total_items == 0 || meta.current_page == 0 {
        return None;
    }
    let per_page = u64::from(meta.items_per_page);
    let first = u64::from(meta.current_page - 1) * per_page + 1;
    let last = (u64::from(meta.current_page) * per_page).min(meta.total_items);
    (first <= last).then_some((first, last))
}
