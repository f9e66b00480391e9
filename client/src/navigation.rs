//! Navigation
//!
//! Sidebar entries and the permission guard of every dashboard route.

use nw_common::permissions::{
    CATEGORY_LIST, LOG_LIST, NEWS_EDIT, NEWS_EDIT_ALL, NEWS_LIST, ROLE_LIST, TAG_LIST, USER_LIST,
    VIDEO_EDIT, VIDEO_EDIT_ALL, VIDEO_LIST,
};

use crate::access::guard::PageGuard;
use crate::access::AccessSnapshot;

/// One sidebar link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
    pub permission: &'static str,
}

pub const SIDEBAR: [NavItem; 7] = [
    NavItem {
        label: "News",
        href: "/news",
        permission: NEWS_LIST,
    },
    NavItem {
        label: "Videos",
        href: "/videos",
        permission: VIDEO_LIST,
    },
    NavItem {
        label: "Categories",
        href: "/categories",
        permission: CATEGORY_LIST,
    },
    NavItem {
        label: "Tags",
        href: "/tags",
        permission: TAG_LIST,
    },
    NavItem {
        label: "Users",
        href: "/user",
        permission: USER_LIST,
    },
    NavItem {
        label: "Roles",
        href: "/roles",
        permission: ROLE_LIST,
    },
    NavItem {
        label: "Activity Log",
        href: "/activity-log",
        permission: LOG_LIST,
    },
];

/// Sidebar entries the session may see.
pub fn visible_items(snapshot: &AccessSnapshot) -> Vec<NavItem> {
    SIDEBAR
        .into_iter()
        .filter(|item| snapshot.has_permission(item.permission))
        .collect()
}

/// Routes reachable without a session.
pub fn is_public(route: &str) -> bool {
    matches!(
        normalize(route).as_str(),
        "/login" | "/404" | "/nonAdmin/verify"
    )
}

fn normalize(route: &str) -> String {
    let path = route.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Permissions accepted by the guard of `route` (any one suffices).
///
/// `None` for unknown and public routes. An empty list means any valid
/// session.
pub fn required_permissions(route: &str) -> Option<&'static [&'static str]> {
    let path = normalize(route);
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let required: &'static [&'static str] = match segments.as_slice() {
        [] => &[],
        ["news"] | ["news", "view", _] => &[NEWS_LIST],
        ["news", "new"] => &[],
        ["news", "view", _, "edit"] => &[NEWS_EDIT, NEWS_EDIT_ALL],
        ["videos"] | ["videos", "view", _] => &[VIDEO_LIST],
        ["videos", "view", _, "edit"] => &[VIDEO_EDIT, VIDEO_EDIT_ALL],
        ["categories"] => &[CATEGORY_LIST],
        ["categories", "new"] | ["categories", _, "edit"] => &[],
        ["tags"] => &[TAG_LIST],
        ["tags", "new"] | ["tags", _, "edit"] => &[],
        ["user"] => &[USER_LIST],
        ["roles"] => &[ROLE_LIST],
        ["activity-log"] => &[LOG_LIST],
        _ => return None,
    };
    Some(required)
}

/// Guard of `route`, if it is a known dashboard route.
pub fn guard_for(route: &str) -> Option<PageGuard> {
    required_permissions(route).map(|required| PageGuard::new(required.iter().copied()))
}
