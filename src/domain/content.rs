//! Content records managed by the hub.
//!
//! Two kinds of content exist: documents (contract templates, business
//! forms) and tutorials (YouTube-backed lessons). Both carry a stable
//! string id and belong to a category.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Stable content identifier.
///
/// Generated randomly for uploaded content, or derived from the source
/// URL (SHA256(url)[0:16]) for link-backed content so that re-adding
/// the same URL targets the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentId(String);

impl ContentId {
    /// Create a random content ID (UUID v4)
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Derive a content ID from a source URL
    pub fn from_url(url: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let result = hasher.finalize();

        // First 8 bytes (16 hex chars)
        Self(hex::encode(&result[..8]))
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ContentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ContentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of content an arrangement or listing refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    /// Document (template, contract, business form)
    #[serde(rename = "doc")]
    Document,

    /// Video tutorial
    #[serde(rename = "tutorial")]
    Tutorial,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Document => write!(f, "doc"),
            ContentKind::Tutorial => write!(f, "tutorial"),
        }
    }
}

impl std::str::FromStr for ContentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "doc" | "document" => Ok(ContentKind::Document),
            "tutorial" => Ok(ContentKind::Tutorial),
            _ => anyhow::bail!("Unknown content kind: {}", s),
        }
    }
}

/// How a document is backed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    /// Uploaded file (stored by the external object store)
    File,

    /// External link
    Link,
}

/// Anything with a stable id and a category.
///
/// Arrangement application is generic over this, so documents and
/// tutorials share one ordering implementation.
pub trait ContentItem {
    fn id(&self) -> &ContentId;
    fn category(&self) -> &str;
}

/// A document record (contract template, business form, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier
    pub id: ContentId,

    /// Human-readable title
    pub title: String,

    /// Short description shown in listings
    pub description: String,

    /// Category the document belongs to (e.g. "photography-contracts")
    pub category: String,

    /// Finer-grained grouping within the category
    pub subcategory: String,

    /// Whether the document is file- or link-backed
    pub source: DocumentSource,

    /// Location of the document content
    pub url: String,

    /// Preview image URL
    #[serde(default)]
    pub thumbnail_url: String,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last modified
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Create a new document record.
    ///
    /// Link-backed documents get a URL-derived id; file-backed ones a
    /// random id.
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        source: DocumentSource,
        url: impl Into<String>,
    ) -> Self {
        let url = url.into();
        let id = match source {
            DocumentSource::Link => ContentId::from_url(&url),
            DocumentSource::File => ContentId::random(),
        };
        let now = Utc::now();

        Self {
            id,
            title: title.into(),
            description: String::new(),
            category: category.into(),
            subcategory: String::new(),
            source,
            url,
            thumbnail_url: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the subcategory
    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = subcategory.into();
        self
    }

    /// Set the thumbnail URL
    pub fn with_thumbnail(mut self, thumbnail_url: impl Into<String>) -> Self {
        self.thumbnail_url = thumbnail_url.into();
        self
    }
}

impl ContentItem for Document {
    fn id(&self) -> &ContentId {
        &self.id
    }

    fn category(&self) -> &str {
        &self.category
    }
}

/// A tutorial record (YouTube-backed lesson)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tutorial {
    /// Stable identifier (derived from the YouTube URL)
    pub id: ContentId,

    /// Human-readable title
    pub title: String,

    /// Short description shown in listings
    pub description: String,

    /// Category the tutorial belongs to (e.g. "lighting-techniques")
    pub category: String,

    /// Source video URL
    pub youtube_url: String,

    /// Preview image URL
    #[serde(default)]
    pub thumbnail_url: String,

    /// Video duration as "MM:SS" (oEmbed does not provide it; defaults to "00:00")
    #[serde(default)]
    pub duration: String,

    /// View counter
    #[serde(default)]
    pub views: u64,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last modified
    pub updated_at: DateTime<Utc>,
}

impl Tutorial {
    /// Create a new tutorial record for a YouTube URL
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        youtube_url: impl Into<String>,
    ) -> Self {
        let youtube_url = youtube_url.into();
        let now = Utc::now();

        Self {
            id: ContentId::from_url(&youtube_url),
            title: title.into(),
            description: String::new(),
            category: category.into(),
            youtube_url,
            thumbnail_url: String::new(),
            duration: "00:00".to_string(),
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the thumbnail URL
    pub fn with_thumbnail(mut self, thumbnail_url: impl Into<String>) -> Self {
        self.thumbnail_url = thumbnail_url.into();
        self
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }
}

impl ContentItem for Tutorial {
    fn id(&self) -> &ContentId {
        &self.id
    }

    fn category(&self) -> &str {
        &self.category
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_id_from_url() {
        let id1 = ContentId::from_url("https://youtube.com/watch?v=abc123");
        let id2 = ContentId::from_url("https://youtube.com/watch?v=abc123");
        let id3 = ContentId::from_url("https://youtube.com/watch?v=xyz789");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1.as_str().len(), 16); // 8 bytes = 16 hex chars
    }

    #[test]
    fn test_content_kind_from_str() {
        assert_eq!("doc".parse::<ContentKind>().unwrap(), ContentKind::Document);
        assert_eq!(
            "document".parse::<ContentKind>().unwrap(),
            ContentKind::Document
        );
        assert_eq!(
            "tutorial".parse::<ContentKind>().unwrap(),
            ContentKind::Tutorial
        );
        assert!("playlist".parse::<ContentKind>().is_err());
    }

    #[test]
    fn test_content_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&ContentKind::Document).unwrap(),
            "\"doc\""
        );
        assert_eq!(
            serde_json::to_string(&ContentKind::Tutorial).unwrap(),
            "\"tutorial\""
        );
    }

    #[test]
    fn test_link_document_id_stability() {
        let a = Document::new(
            "Wedding contract",
            "photography-contracts",
            DocumentSource::Link,
            "https://example.com/wedding.pdf",
        );
        let b = Document::new(
            "Wedding contract v2",
            "photography-contracts",
            DocumentSource::Link,
            "https://example.com/wedding.pdf",
        );

        // Same source URL, same id
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_tutorial_creation() {
        let tutorial = Tutorial::new(
            "Three-point lighting",
            "lighting-techniques",
            "https://youtube.com/watch?v=abc",
        );

        assert_eq!(tutorial.title, "Three-point lighting");
        assert_eq!(tutorial.category, "lighting-techniques");
        assert_eq!(tutorial.duration, "00:00");
        assert_eq!(tutorial.views, 0);
    }
}
