//! Featured content: the curated home-page highlight list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::content::{ContentId, ContentKind};

/// One entry in the featured list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturedItem {
    /// Id of the underlying document or tutorial
    pub id: ContentId,

    /// Kind of the underlying content
    pub kind: ContentKind,

    /// Display title
    pub title: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Preview image URL
    #[serde(default)]
    pub thumbnail_url: String,

    /// Location of the underlying content
    pub url: String,

    /// Category of the underlying content
    pub category: String,

    /// When the item was featured
    pub created_at: DateTime<Utc>,
}

impl FeaturedItem {
    /// Feature a piece of content
    pub fn new(
        id: ContentId,
        kind: ContentKind,
        title: impl Into<String>,
        url: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind,
            title: title.into(),
            description: String::new(),
            thumbnail_url: String::new(),
            url: url.into(),
            category: category.into(),
            created_at: Utc::now(),
        }
    }
}
