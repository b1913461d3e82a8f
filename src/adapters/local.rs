//! Local JSON-file backend.
//!
//! The whole hub lives in one JSON data file under the configured home
//! directory. Mutations take an exclusive lock on a sidecar lock file
//! around the read-modify-write, so each upsert is a single logical
//! write even with several CLI invocations running at once.
//!
//! # Storage Layout
//!
//! ```text
//! ~/.shutterdesk/
//! ├── hub.json    # documents, tutorials, featured, arrangements
//! └── hub.lock    # lock file guarding mutations
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::domain::{
    ArrangementKey, ArrangementRecord, ContentId, Document, FeaturedItem, Tutorial,
};

use super::{
    natural_order, ArrangementStore, ContentStore, DocumentPatch, StoreError, TutorialPatch,
};

/// On-disk shape of the hub data file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HubData {
    /// Data format version
    #[serde(default = "default_version")]
    version: u32,

    #[serde(default)]
    documents: Vec<Document>,

    #[serde(default)]
    tutorials: Vec<Tutorial>,

    #[serde(default)]
    featured: Vec<FeaturedItem>,

    #[serde(default)]
    arrangements: Vec<ArrangementRecord>,
}

fn default_version() -> u32 {
    1
}

/// JSON-file backend storing the whole hub in one data file
pub struct LocalBackend {
    data_path: PathBuf,
    lock_path: PathBuf,
}

impl LocalBackend {
    /// Open a backend rooted at the given home directory
    pub fn open(home: &Path) -> Self {
        Self {
            data_path: home.join("hub.json"),
            lock_path: home.join("hub.lock"),
        }
    }

    /// Path to the data file
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Read the data file; a missing file is an empty hub
    async fn load(&self) -> Result<HubData, StoreError> {
        if !self.data_path.exists() {
            return Ok(HubData::default());
        }

        let content = fs::read_to_string(&self.data_path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Run a mutation under the exclusive file lock.
    ///
    /// Load, mutate, and save happen synchronously while the lock is
    /// held; the lock is released when the guard file is dropped.
    fn with_data_mut<R>(
        &self,
        mutate: impl FnOnce(&mut HubData) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        if let Some(parent) = self.lock_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&self.lock_path)?;
        lock_file.lock_exclusive()?;

        let mut data = if self.data_path.exists() {
            let content = std::fs::read_to_string(&self.data_path)?;
            serde_json::from_str(&content)?
        } else {
            HubData::default()
        };

        let result = mutate(&mut data)?;

        let content = serde_json::to_string_pretty(&data)?;
        std::fs::write(&self.data_path, content)?;

        Ok(result)
    }
}

#[async_trait]
impl ArrangementStore for LocalBackend {
    async fn find(&self, key: &ArrangementKey) -> Result<Option<ArrangementRecord>, StoreError> {
        let data = self.load().await?;
        Ok(data.arrangements.into_iter().find(|r| &r.key == key))
    }

    async fn upsert(&self, key: &ArrangementKey, order: Vec<ContentId>) -> Result<(), StoreError> {
        self.with_data_mut(|data| {
            if let Some(existing) = data.arrangements.iter_mut().find(|r| &r.key == key) {
                existing.replace_order(order);
            } else {
                data.arrangements
                    .push(ArrangementRecord::new(key.clone(), order));
            }
            Ok(())
        })
    }
}

#[async_trait]
impl ContentStore for LocalBackend {
    async fn insert_document(&self, document: Document) -> Result<Document, StoreError> {
        self.with_data_mut(|data| {
            // Re-adding the same id replaces the record
            data.documents.retain(|d| d.id != document.id);
            data.documents.push(document.clone());
            Ok(document)
        })
    }

    async fn update_document(
        &self,
        id: &ContentId,
        patch: DocumentPatch,
    ) -> Result<Document, StoreError> {
        self.with_data_mut(|data| {
            let document = data
                .documents
                .iter_mut()
                .find(|d| &d.id == id)
                .ok_or_else(|| StoreError::NoSuchRecord(id.to_string()))?;
            patch.apply_to(document);
            Ok(document.clone())
        })
    }

    async fn delete_document(&self, id: &ContentId) -> Result<(), StoreError> {
        self.with_data_mut(|data| {
            let before = data.documents.len();
            data.documents.retain(|d| &d.id != id);
            if data.documents.len() == before {
                return Err(StoreError::NoSuchRecord(id.to_string()));
            }
            Ok(())
        })
    }

    async fn find_document(&self, id: &ContentId) -> Result<Option<Document>, StoreError> {
        let data = self.load().await?;
        Ok(data.documents.into_iter().find(|d| &d.id == id))
    }

    async fn list_documents(&self, category: &str) -> Result<Vec<Document>, StoreError> {
        let data = self.load().await?;
        let mut documents: Vec<Document> = data
            .documents
            .into_iter()
            .filter(|d| d.category == category)
            .collect();
        natural_order(&mut documents, |d| d.created_at);
        Ok(documents)
    }

    async fn insert_tutorial(&self, tutorial: Tutorial) -> Result<Tutorial, StoreError> {
        self.with_data_mut(|data| {
            data.tutorials.retain(|t| t.id != tutorial.id);
            data.tutorials.push(tutorial.clone());
            Ok(tutorial)
        })
    }

    async fn update_tutorial(
        &self,
        id: &ContentId,
        patch: TutorialPatch,
    ) -> Result<Tutorial, StoreError> {
        self.with_data_mut(|data| {
            let tutorial = data
                .tutorials
                .iter_mut()
                .find(|t| &t.id == id)
                .ok_or_else(|| StoreError::NoSuchRecord(id.to_string()))?;
            patch.apply_to(tutorial);
            Ok(tutorial.clone())
        })
    }

    async fn delete_tutorial(&self, id: &ContentId) -> Result<(), StoreError> {
        self.with_data_mut(|data| {
            let before = data.tutorials.len();
            data.tutorials.retain(|t| &t.id != id);
            if data.tutorials.len() == before {
                return Err(StoreError::NoSuchRecord(id.to_string()));
            }
            Ok(())
        })
    }

    async fn find_tutorial(&self, id: &ContentId) -> Result<Option<Tutorial>, StoreError> {
        let data = self.load().await?;
        Ok(data.tutorials.into_iter().find(|t| &t.id == id))
    }

    async fn list_tutorials(&self, category: &str) -> Result<Vec<Tutorial>, StoreError> {
        let data = self.load().await?;
        let mut tutorials: Vec<Tutorial> = data
            .tutorials
            .into_iter()
            .filter(|t| t.category == category)
            .collect();
        natural_order(&mut tutorials, |t| t.created_at);
        Ok(tutorials)
    }

    async fn add_featured(&self, item: FeaturedItem) -> Result<FeaturedItem, StoreError> {
        self.with_data_mut(|data| {
            data.featured.retain(|f| f.id != item.id);
            data.featured.push(item.clone());
            Ok(item)
        })
    }

    async fn remove_featured(&self, id: &ContentId) -> Result<(), StoreError> {
        self.with_data_mut(|data| {
            let before = data.featured.len();
            data.featured.retain(|f| &f.id != id);
            if data.featured.len() == before {
                return Err(StoreError::NoSuchRecord(id.to_string()));
            }
            Ok(())
        })
    }

    async fn list_featured(&self) -> Result<Vec<FeaturedItem>, StoreError> {
        let data = self.load().await?;
        let mut featured = data.featured;
        natural_order(&mut featured, |f| f.created_at);
        Ok(featured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContentKind;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_empty_hub() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::open(temp.path());

        let key = ArrangementKey::new("weddings", ContentKind::Document);
        assert!(backend.find(&key).await.unwrap().is_none());
        assert!(backend.list_documents("weddings").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_creates_then_replaces() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::open(temp.path());
        let key = ArrangementKey::new("weddings", ContentKind::Document);

        backend
            .upsert(&key, vec!["b".into(), "a".into()])
            .await
            .unwrap();
        let first = backend.find(&key).await.unwrap().unwrap();
        assert_eq!(first.order, vec!["b".into(), "a".into()]);

        backend
            .upsert(&key, vec!["a".into(), "b".into()])
            .await
            .unwrap();
        let second = backend.find(&key).await.unwrap().unwrap();
        assert_eq!(second.order, vec!["a".into(), "b".into()]);

        // Still exactly one record for the key
        let content = std::fs::read_to_string(backend.data_path()).unwrap();
        let data: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(data["arrangements"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_keys_are_isolated_by_kind() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::open(temp.path());

        let docs = ArrangementKey::new("weddings", ContentKind::Document);
        let tutorials = ArrangementKey::new("weddings", ContentKind::Tutorial);

        backend.upsert(&docs, vec!["a".into()]).await.unwrap();

        assert!(backend.find(&tutorials).await.unwrap().is_none());
        assert!(backend.find(&docs).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_document_crud_roundtrip() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::open(temp.path());

        let document = Document::new(
            "Wedding contract",
            "photography-contracts",
            crate::domain::DocumentSource::Link,
            "https://example.com/wedding.pdf",
        );
        let id = document.id.clone();

        backend.insert_document(document).await.unwrap();

        let patch = DocumentPatch {
            description: Some("Standard package".to_string()),
            ..Default::default()
        };
        let updated = backend.update_document(&id, patch).await.unwrap();
        assert_eq!(updated.description, "Standard package");
        assert_eq!(updated.title, "Wedding contract");

        backend.delete_document(&id).await.unwrap();
        assert!(matches!(
            backend.delete_document(&id).await,
            Err(StoreError::NoSuchRecord(_))
        ));
    }

    #[tokio::test]
    async fn test_list_documents_natural_order() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::open(temp.path());

        let mut older = Document::new(
            "Older",
            "weddings",
            crate::domain::DocumentSource::Link,
            "https://example.com/older.pdf",
        );
        older.created_at = older.created_at - chrono::Duration::hours(1);
        let newer = Document::new(
            "Newer",
            "weddings",
            crate::domain::DocumentSource::Link,
            "https://example.com/newer.pdf",
        );

        backend.insert_document(older).await.unwrap();
        backend.insert_document(newer).await.unwrap();

        let listed = backend.list_documents("weddings").await.unwrap();
        assert_eq!(listed[0].title, "Newer");
        assert_eq!(listed[1].title, "Older");
    }
}
