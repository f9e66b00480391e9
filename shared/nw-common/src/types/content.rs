//! Content Types
//!
//! News articles, videos and the taxonomy (categories and tags) they are
//! filed under.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Editorial status of a news article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsStatus {
    Draft,
    Rejected,
    Approved,
    Published,
    Archived,
}

impl NewsStatus {
    pub const ALL: [Self; 5] = [
        Self::Draft,
        Self::Rejected,
        Self::Approved,
        Self::Published,
        Self::Archived,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Rejected => "rejected",
            Self::Approved => "approved",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for NewsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NewsStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownStatus(s.to_string()))
    }
}

/// Publication status of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    Draft,
    Published,
    Archived,
    Live,
}

impl VideoStatus {
    pub const ALL: [Self; 4] = [Self::Draft, Self::Published, Self::Live, Self::Archived];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
            Self::Live => "live",
        }
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownStatus(s.to_string()))
    }
}

/// News article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct News {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub sub_title: Option<String>,
    pub slug: String,
    #[serde(default)]
    pub content: String,
    /// Author, used for the "edit own article" check.
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    pub status: NewsStatus,
    #[serde(default)]
    pub total_hit: i64,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of news create/update requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsRequest {
    pub title: String,
    pub sub_title: String,
    pub content: String,
    pub category_id: i64,
    pub tags_id: Vec<i64>,
}

/// Video entry. `content_id` references the hosted media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub slug: String,
    pub content_id: String,
    #[serde(default)]
    pub total_hit: i64,
    pub status: VideoStatus,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub category_icon: Option<String>,
    /// Uploader, used for the "edit own video" check.
    #[serde(default)]
    pub created_by: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub user_photo: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of video create/update requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRequest {
    pub title: String,
    pub description: String,
    pub content_id: String,
    pub category_id: i64,
    pub tags: Vec<Tag>,
}

/// News/video category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of category create/update requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    pub description: String,
    pub icon: String,
}

/// Free-form tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of tag create/update requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRequest {
    pub name: String,
    pub description: String,
    pub color: String,
}

/// A reader's like on a news article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub user_id: i64,
    pub username: String,
    pub user_email: String,
    #[serde(default)]
    pub user_photo: Option<String>,
    pub news_id: i64,
}
