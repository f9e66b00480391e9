//! Permission names granted to roles by the Neswara API.
//!
//! The server owns the catalogue; these constants are the names the
//! dashboard checks before rendering an action.

/// Required for any dashboard page at all.
pub const DASHBOARD_ACCESS: &str = "dashboard-access";

pub const NEWS_LIST: &str = "news-list";
pub const NEWS_EDIT: &str = "news-edit";
pub const NEWS_EDIT_ALL: &str = "news-edit-all";
pub const NEWS_DELETE: &str = "news-delete";
pub const NEWS_EDIT_STATUS: &str = "news-edit-status";
pub const NEWS_DRAFTED: &str = "news-drafted";
pub const NEWS_REJECTED: &str = "news-rejected";
pub const NEWS_APPROVE: &str = "news-approve";
pub const NEWS_PUBLISHED: &str = "news-published";
pub const NEWS_ARCHIVED: &str = "news-archived";

pub const VIDEO_LIST: &str = "video-list";
pub const VIDEO_CREATE: &str = "video-create";
pub const VIDEO_EDIT: &str = "video-edit";
pub const VIDEO_EDIT_ALL: &str = "video-edit-all";
pub const VIDEO_DELETE: &str = "video-delete";
pub const VIDEO_EDIT_STATUS: &str = "video-edit-status";
pub const VIDEO_DRAFTED: &str = "video-drafted";
pub const VIDEO_PUBLISH: &str = "video-publish";
pub const VIDEO_LIVE: &str = "video-live";
pub const VIDEO_ARCHIVED: &str = "video-archived";

pub const CATEGORY_LIST: &str = "category-list";
pub const CATEGORY_EDIT: &str = "category-edit";
pub const CATEGORY_DELETE: &str = "category-delete";

pub const TAG_LIST: &str = "tag-list";
pub const TAG_EDIT: &str = "tag-edit";
pub const TAG_DELETE: &str = "tag-delete";

pub const COMMENT_LIST: &str = "comment-list";
pub const COMMENT_CREATE: &str = "comment-create";
pub const COMMENT_EDIT: &str = "comment-edit";
pub const COMMENT_EDIT_ALL: &str = "comment-edit-all";
pub const COMMENT_DELETE: &str = "comment-delete";
pub const COMMENT_DELETE_ALL: &str = "comment-delete-all";

pub const ROLE_LIST: &str = "role-list";
pub const ROLE_CREATE: &str = "role-create";
pub const ROLE_EDIT: &str = "role-edit";
pub const ROLE_DELETE: &str = "role-delete";

pub const USER_LIST: &str = "user-list";
pub const USER_ROLE_EDIT: &str = "user-role-edit";
pub const USER_BAN: &str = "user-ban";

pub const LOG_LIST: &str = "log-list";
