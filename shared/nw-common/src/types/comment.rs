//! Comment Types

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Kind of content item a comment thread is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// News article.
    News,
    /// Video.
    Video,
}

impl ContentType {
    /// Path discriminator used by the comment endpoints.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::News => "news",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "news" => Ok(Self::News),
            "video" | "videos" => Ok(Self::Video),
            _ => Err(Error::UnknownContentType(s.to_string())),
        }
    }
}

/// Creation-time ordering for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    /// Oldest first.
    Asc,
    /// Newest first.
    #[default]
    Desc,
}

impl SortOrder {
    /// Query-string form (`ASC` / `DESC`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// The opposite order, as toggled by the "Oldest/Recent" switch.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            _ => Err(Error::UnknownSortOrder(s.to_string())),
        }
    }
}

/// A comment or reply attached to a news article or video.
///
/// `parent_id == None` marks a top-level comment. Replies never nest
/// further than one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    /// Id of the news article or video the thread belongs to.
    #[serde(rename = "source_id")]
    pub content_id: i64,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(rename = "user_id")]
    pub author_id: i64,
    #[serde(rename = "email")]
    pub author_email: String,
    #[serde(rename = "photo", default)]
    pub author_photo: Option<String>,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(rename = "content")]
    pub body: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Whether this is a top-level comment rather than a reply.
    pub const fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether the comment was edited after creation.
    pub const fn is_edited(&self) -> bool {
        self.updated_at.is_some()
    }

    /// Ordering by creation time with the id as a stable tie-break.
    pub fn cmp_created(&self, other: &Self) -> Ordering {
        self.created_at
            .cmp(&other.created_at)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Sort comments by `(created_at, id)` in the given direction.
pub fn sort_comments(items: &mut [Comment], order: SortOrder) {
    match order {
        SortOrder::Asc => items.sort_by(Comment::cmp_created),
        SortOrder::Desc => items.sort_by(|a, b| b.cmp_created(a)),
    }
}
