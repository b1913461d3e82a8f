//! Store interfaces for the persistence backend.
//!
//! The hub treats persistence as a pluggable collaborator: a local
//! JSON-file backend for offline/self-hosted use, or a PostgREST-style
//! HTTP backend for the hosted database.

pub mod local;
pub mod rest;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    ArrangementKey, ArrangementRecord, ContentId, Document, FeaturedItem, Tutorial,
};

// Re-export the backends
pub use local::LocalBackend;
pub use rest::RestBackend;

/// Errors produced at the store boundary.
///
/// A missing record is not an error; lookups return `Option`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Caller contract violation, rejected before any I/O
    #[error("Invalid arrangement key: {0}")]
    InvalidKey(String),

    /// Record addressed by id does not exist
    #[error("No such record: {0}")]
    NoSuchRecord(String),

    /// The backend rejected the request
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Keyed lookup and single-logical-write upsert of arrangement records.
///
/// Upserts are last-write-wins; no version check is performed, so
/// concurrent editors of the same key can overwrite each other.
#[async_trait]
pub trait ArrangementStore: Send + Sync {
    /// Look up the arrangement record for a key
    async fn find(&self, key: &ArrangementKey) -> Result<Option<ArrangementRecord>, StoreError>;

    /// Insert or fully replace the order for a key as one logical write
    async fn upsert(&self, key: &ArrangementKey, order: Vec<ContentId>) -> Result<(), StoreError>;
}

/// Partial update for a document; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl DocumentPatch {
    /// Apply the patch in place, bumping `updated_at`
    pub fn apply_to(&self, document: &mut Document) {
        if let Some(ref title) = self.title {
            document.title = title.clone();
        }
        if let Some(ref description) = self.description {
            document.description = description.clone();
        }
        if let Some(ref category) = self.category {
            document.category = category.clone();
        }
        if let Some(ref subcategory) = self.subcategory {
            document.subcategory = subcategory.clone();
        }
        if let Some(ref url) = self.url {
            document.url = url.clone();
        }
        if let Some(ref thumbnail_url) = self.thumbnail_url {
            document.thumbnail_url = thumbnail_url.clone();
        }
        document.updated_at = Utc::now();
    }

    /// True if no field is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.subcategory.is_none()
            && self.url.is_none()
            && self.thumbnail_url.is_none()
    }
}

/// Partial update for a tutorial; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TutorialPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
}

impl TutorialPatch {
    /// Apply the patch in place, bumping `updated_at`
    pub fn apply_to(&self, tutorial: &mut Tutorial) {
        if let Some(ref title) = self.title {
            tutorial.title = title.clone();
        }
        if let Some(ref description) = self.description {
            tutorial.description = description.clone();
        }
        if let Some(ref category) = self.category {
            tutorial.category = category.clone();
        }
        if let Some(ref thumbnail_url) = self.thumbnail_url {
            tutorial.thumbnail_url = thumbnail_url.clone();
        }
        if let Some(ref duration) = self.duration {
            tutorial.duration = duration.clone();
        }
        if let Some(views) = self.views {
            tutorial.views = views;
        }
        tutorial.updated_at = Utc::now();
    }

    /// True if no field is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.thumbnail_url.is_none()
            && self.duration.is_none()
            && self.views.is_none()
    }
}

/// CRUD access to content records.
///
/// Category listings come back in natural order: `created_at`
/// descending, newest first.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn insert_document(&self, document: Document) -> Result<Document, StoreError>;
    async fn update_document(
        &self,
        id: &ContentId,
        patch: DocumentPatch,
    ) -> Result<Document, StoreError>;
    async fn delete_document(&self, id: &ContentId) -> Result<(), StoreError>;
    async fn find_document(&self, id: &ContentId) -> Result<Option<Document>, StoreError>;
    async fn list_documents(&self, category: &str) -> Result<Vec<Document>, StoreError>;

    async fn insert_tutorial(&self, tutorial: Tutorial) -> Result<Tutorial, StoreError>;
    async fn update_tutorial(
        &self,
        id: &ContentId,
        patch: TutorialPatch,
    ) -> Result<Tutorial, StoreError>;
    async fn delete_tutorial(&self, id: &ContentId) -> Result<(), StoreError>;
    async fn find_tutorial(&self, id: &ContentId) -> Result<Option<Tutorial>, StoreError>;
    async fn list_tutorials(&self, category: &str) -> Result<Vec<Tutorial>, StoreError>;

    async fn add_featured(&self, item: FeaturedItem) -> Result<FeaturedItem, StoreError>;
    async fn remove_featured(&self, id: &ContentId) -> Result<(), StoreError>;
    async fn list_featured(&self) -> Result<Vec<FeaturedItem>, StoreError>;
}

/// Sort content into natural order: newest first, by creation time
pub(crate) fn natural_order<T, F>(items: &mut [T], created_at: F)
where
    F: Fn(&T) -> DateTime<Utc>,
{
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
}
