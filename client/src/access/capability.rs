//! Capability Gates
//!
//! Declarative "render this only if" checks. Every conditional action in
//! the dashboard is decided here rather than inline at the call site.

use nw_common::permissions::{
    COMMENT_CREATE, COMMENT_DELETE, COMMENT_DELETE_ALL, COMMENT_EDIT, COMMENT_EDIT_ALL,
    NEWS_APPROVE, NEWS_ARCHIVED, NEWS_DELETE, NEWS_DRAFTED, NEWS_EDIT, NEWS_EDIT_ALL,
    NEWS_EDIT_STATUS, NEWS_PUBLISHED, NEWS_REJECTED, USER_BAN, USER_ROLE_EDIT, VIDEO_ARCHIVED,
    VIDEO_DELETE, VIDEO_DRAFTED, VIDEO_EDIT, VIDEO_EDIT_ALL, VIDEO_EDIT_STATUS, VIDEO_LIVE,
    VIDEO_PUBLISH,
};
use nw_common::{
    Comment, News, NewsStatus, Role, UserSummary, Video, VideoStatus, SUPER_ADMIN_ROLE_ID,
};

use super::{AccessReader, AccessSnapshot};

/// Permission requirement of a gated element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement<'a> {
    /// At least one of the names. An empty list is never met.
    Any(&'a [&'a str]),
    /// Every one of the names.
    All(&'a [&'a str]),
}

impl Requirement<'_> {
    pub fn is_met(&self, snapshot: &AccessSnapshot) -> bool {
        match self {
            Self::Any(names) => snapshot.has_any(names),
            Self::All(names) => snapshot.has_all(names),
        }
    }
}

/// Produce `render()` only when `requirement` holds for the current session.
pub fn gate<T>(
    reader: &AccessReader,
    requirement: Requirement<'_>,
    render: impl FnOnce() -> T,
) -> Option<T> {
    requirement.is_met(&reader.snapshot()).then(render)
}

// Comments

pub fn can_create_comment(snapshot: &AccessSnapshot) -> bool {
    snapshot.has_permission(COMMENT_CREATE)
}

/// Author holding `comment-edit` or `comment-edit-all`.
pub fn can_edit_comment(snapshot: &AccessSnapshot, comment: &Comment) -> bool {
    snapshot.owns(comment.author_id) && snapshot.has_any(&[COMMENT_EDIT, COMMENT_EDIT_ALL])
}

/// Author holding `comment-delete` or `comment-delete-all`.
pub fn can_delete_comment(snapshot: &AccessSnapshot, comment: &Comment) -> bool {
    snapshot.owns(comment.author_id) && snapshot.has_any(&[COMMENT_DELETE, COMMENT_DELETE_ALL])
}

/// Whether the per-comment edit/delete menu is shown at all.
pub fn comment_menu_visible(snapshot: &AccessSnapshot, comment: &Comment) -> bool {
    snapshot.owns(comment.author_id)
        && snapshot.has_any(&[
            COMMENT_EDIT,
            COMMENT_EDIT_ALL,
            COMMENT_DELETE,
            COMMENT_DELETE_ALL,
        ])
}

// News and videos

pub fn can_edit_news(snapshot: &AccessSnapshot, news: &News) -> bool {
    let own = news.user_id.is_some_and(|id| snapshot.owns(id));
    (own && snapshot.has_permission(NEWS_EDIT)) || snapshot.has_permission(NEWS_EDIT_ALL)
}

pub fn can_delete_news(snapshot: &AccessSnapshot) -> bool {
    snapshot.has_permission(NEWS_DELETE)
}

const fn news_status_permission(status: NewsStatus) -> &'static str {
    match status {
        NewsStatus::Draft => NEWS_DRAFTED,
        NewsStatus::Rejected => NEWS_REJECTED,
        NewsStatus::Approved => NEWS_APPROVE,
        NewsStatus::Published => NEWS_PUBLISHED,
        NewsStatus::Archived => NEWS_ARCHIVED,
    }
}

/// Statuses the session may move an article to. Empty without
/// `news-edit-status`.
pub fn allowed_news_statuses(snapshot: &AccessSnapshot) -> Vec<NewsStatus> {
    if !snapshot.has_permission(NEWS_EDIT_STATUS) {
        return Vec::new();
    }
    NewsStatus::ALL
        .into_iter()
        .filter(|status| snapshot.has_permission(news_status_permission(*status)))
        .collect()
}

/// Rejections carry a reason for the author.
pub const fn status_requires_reason(status: NewsStatus) -> bool {
    matches!(status, NewsStatus::Rejected)
}

pub fn can_edit_video(snapshot: &AccessSnapshot, video: &Video) -> bool {
    let own = video.created_by.is_some_and(|id| snapshot.owns(id));
    (own && snapshot.has_permission(VIDEO_EDIT)) || snapshot.has_permission(VIDEO_EDIT_ALL)
}

pub fn can_delete_video(snapshot: &AccessSnapshot) -> bool {
    snapshot.has_permission(VIDEO_DELETE)
}

const fn video_status_permission(status: VideoStatus) -> &'static str {
    match status {
        VideoStatus::Draft => VIDEO_DRAFTED,
        VideoStatus::Published => VIDEO_PUBLISH,
        VideoStatus::Live => VIDEO_LIVE,
        VideoStatus::Archived => VIDEO_ARCHIVED,
    }
}

pub fn allowed_video_statuses(snapshot: &AccessSnapshot) -> Vec<VideoStatus> {
    if !snapshot.has_permission(VIDEO_EDIT_STATUS) {
        return Vec::new();
    }
    VideoStatus::ALL
        .into_iter()
        .filter(|status| snapshot.has_permission(video_status_permission(*status)))
        .collect()
}

// Users

/// Only a super admin may change another super admin's role.
pub fn can_edit_user_role(snapshot: &AccessSnapshot, target: &UserSummary) -> bool {
    if target.role_id == SUPER_ADMIN_ROLE_ID {
        snapshot.role_id == SUPER_ADMIN_ROLE_ID
    } else {
        snapshot.has_permission(USER_ROLE_EDIT)
    }
}

/// Assigning the banned role additionally needs `user-ban`.
pub fn can_assign_role(snapshot: &AccessSnapshot, role: &Role) -> bool {
    snapshot.has_permission(USER_ROLE_EDIT)
        && (!role.is_banned_role() || snapshot.has_permission(USER_BAN))
}
