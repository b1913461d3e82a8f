//! The content hub service: validated CRUD over the backend plus
//! arranged listings.
//!
//! This is the layer callers talk to. It owns the arrangement manager,
//! validates input before any I/O, and is the place where a failed
//! arrangement read degrades gracefully to natural order instead of
//! failing the whole listing.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adapters::{ArrangementStore, ContentStore, DocumentPatch, TutorialPatch};
use crate::core::arrangement::{apply_order, ArrangementManager};
use crate::core::reorder::ReorderSession;
use crate::domain::{
    ArrangementKey, ContentId, ContentItem, ContentKind, Document, FeaturedItem, Tutorial,
};

/// High-level access to hub content
pub struct ContentHub<S> {
    manager: ArrangementManager<S>,
}

impl<S: ContentStore + ArrangementStore> ContentHub<S> {
    /// Create a hub over a backend
    pub fn new(backend: S) -> Self {
        Self {
            manager: ArrangementManager::new(backend),
        }
    }

    /// The arrangement manager for this hub
    pub fn arrangements(&self) -> &ArrangementManager<S> {
        &self.manager
    }

    fn store(&self) -> &S {
        self.manager.store()
    }

    // ------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------

    /// Add a document record
    pub async fn add_document(&self, document: Document) -> Result<Document> {
        validate_non_empty("title", &document.title)?;
        validate_non_empty("category", &document.category)?;
        validate_non_empty("url", &document.url)?;

        let document = self.store().insert_document(document).await?;
        info!(id = %document.id, category = %document.category, "Document added");
        Ok(document)
    }

    /// Partially update a document
    pub async fn update_document(&self, id: &ContentId, patch: DocumentPatch) -> Result<Document> {
        if patch.is_empty() {
            anyhow::bail!("Nothing to update");
        }

        let document = self.store().update_document(id, patch).await?;
        info!(id = %document.id, "Document updated");
        Ok(document)
    }

    /// Delete a document record
    pub async fn remove_document(&self, id: &ContentId) -> Result<()> {
        self.store().delete_document(id).await?;
        info!(%id, "Document removed");
        Ok(())
    }

    /// Look up one document by id
    pub async fn document(&self, id: &ContentId) -> Result<Option<Document>> {
        Ok(self.store().find_document(id).await?)
    }

    /// Documents in a category, natural order (newest first)
    pub async fn documents(&self, category: &str) -> Result<Vec<Document>> {
        validate_non_empty("category", category)?;
        Ok(self.store().list_documents(category).await?)
    }

    /// Documents in a category, in display order.
    ///
    /// Natural order with the saved manual arrangement applied on top.
    /// If the arrangement record cannot be read, the listing degrades
    /// to natural order rather than failing.
    pub async fn arranged_documents(&self, category: &str) -> Result<Vec<Document>> {
        let items = self.documents(category).await?;
        let key = ArrangementKey::new(category, ContentKind::Document);
        Ok(self.arrange(items, &key).await)
    }

    // ------------------------------------------------------------------
    // Tutorials
    // ------------------------------------------------------------------

    /// Add a tutorial record
    pub async fn add_tutorial(&self, tutorial: Tutorial) -> Result<Tutorial> {
        validate_non_empty("title", &tutorial.title)?;
        validate_non_empty("category", &tutorial.category)?;
        validate_non_empty("youtube_url", &tutorial.youtube_url)?;

        let tutorial = self.store().insert_tutorial(tutorial).await?;
        info!(id = %tutorial.id, category = %tutorial.category, "Tutorial added");
        Ok(tutorial)
    }

    /// Partially update a tutorial
    pub async fn update_tutorial(&self, id: &ContentId, patch: TutorialPatch) -> Result<Tutorial> {
        if patch.is_empty() {
            anyhow::bail!("Nothing to update");
        }

        let tutorial = self.store().update_tutorial(id, patch).await?;
        info!(id = %tutorial.id, "Tutorial updated");
        Ok(tutorial)
    }

    /// Delete a tutorial record
    pub async fn remove_tutorial(&self, id: &ContentId) -> Result<()> {
        self.store().delete_tutorial(id).await?;
        info!(%id, "Tutorial removed");
        Ok(())
    }

    /// Look up one tutorial by id
    pub async fn tutorial(&self, id: &ContentId) -> Result<Option<Tutorial>> {
        Ok(self.store().find_tutorial(id).await?)
    }

    /// Tutorials in a category, natural order (newest first)
    pub async fn tutorials(&self, category: &str) -> Result<Vec<Tutorial>> {
        validate_non_empty("category", category)?;
        Ok(self.store().list_tutorials(category).await?)
    }

    /// Tutorials in a category, in display order
    pub async fn arranged_tutorials(&self, category: &str) -> Result<Vec<Tutorial>> {
        let items = self.tutorials(category).await?;
        let key = ArrangementKey::new(category, ContentKind::Tutorial);
        Ok(self.arrange(items, &key).await)
    }

    // ------------------------------------------------------------------
    // Arrangements
    // ------------------------------------------------------------------

    /// The stored order for a key (empty when none was ever saved)
    pub async fn stored_order(
        &self,
        category: &str,
        kind: ContentKind,
    ) -> Result<Vec<ContentId>> {
        let key = ArrangementKey::new(category, kind);
        Ok(self.manager.get_order(&key).await?)
    }

    /// Replace the stored order for a key outright
    pub async fn set_order(
        &self,
        category: &str,
        kind: ContentKind,
        order: Vec<ContentId>,
    ) -> Result<()> {
        let key = ArrangementKey::new(category, kind);
        self.manager.save_order(&key, order).await?;
        info!(%key, "Arrangement saved");
        Ok(())
    }

    /// Move one document within a category's display order and persist
    /// the result; reverts the in-memory order if the persist fails.
    pub async fn move_document(
        &self,
        category: &str,
        from: usize,
        to: usize,
    ) -> Result<Vec<Document>> {
        let items = self.arranged_documents(category).await?;
        let key = ArrangementKey::new(category, ContentKind::Document);

        let mut session = ReorderSession::new(items);
        session.move_item(from, to)?;
        session
            .commit(&self.manager, &key, || self.store().list_documents(category))
            .await?;

        Ok(session.into_items())
    }

    /// Move one tutorial within a category's display order and persist
    /// the result; reverts the in-memory order if the persist fails.
    pub async fn move_tutorial(
        &self,
        category: &str,
        from: usize,
        to: usize,
    ) -> Result<Vec<Tutorial>> {
        let items = self.arranged_tutorials(category).await?;
        let key = ArrangementKey::new(category, ContentKind::Tutorial);

        let mut session = ReorderSession::new(items);
        session.move_item(from, to)?;
        session
            .commit(&self.manager, &key, || self.store().list_tutorials(category))
            .await?;

        Ok(session.into_items())
    }

    /// Drop ids from a stored order that no longer match live content.
    ///
    /// Arrangement records are never garbage-collected automatically;
    /// this is the explicit admin-invoked compaction. Returns how many
    /// stale ids were dropped.
    pub async fn prune_arrangement(&self, category: &str, kind: ContentKind) -> Result<usize> {
        let key = ArrangementKey::new(category, kind);
        let stored = self.manager.get_order(&key).await?;
        if stored.is_empty() {
            return Ok(0);
        }

        let live: Vec<ContentId> = match kind {
            ContentKind::Document => self
                .documents(category)
                .await?
                .into_iter()
                .map(|d| d.id)
                .collect(),
            ContentKind::Tutorial => self
                .tutorials(category)
                .await?
                .into_iter()
                .map(|t| t.id)
                .collect(),
        };

        let total = stored.len();
        let retained: Vec<ContentId> = stored
            .into_iter()
            .filter(|id| live.contains(id))
            .collect();
        let dropped = total - retained.len();

        if dropped > 0 {
            self.manager.save_order(&key, retained).await?;
            info!(%key, dropped, "Arrangement pruned");
        }

        Ok(dropped)
    }

    // ------------------------------------------------------------------
    // Featured content
    // ------------------------------------------------------------------

    /// Feature a document or tutorial on the home page
    pub async fn feature(&self, kind: ContentKind, id: &ContentId) -> Result<FeaturedItem> {
        let item = match kind {
            ContentKind::Document => {
                let document = self
                    .document(id)
                    .await?
                    .with_context(|| format!("No document with id {}", id))?;
                FeaturedItem::new(
                    document.id.clone(),
                    kind,
                    document.title.clone(),
                    document.url.clone(),
                    document.category.clone(),
                )
            }
            ContentKind::Tutorial => {
                let tutorial = self
                    .tutorial(id)
                    .await?
                    .with_context(|| format!("No tutorial with id {}", id))?;
                FeaturedItem::new(
                    tutorial.id.clone(),
                    kind,
                    tutorial.title.clone(),
                    tutorial.youtube_url.clone(),
                    tutorial.category.clone(),
                )
            }
        };

        let item = self.store().add_featured(item).await?;
        info!(id = %item.id, "Content featured");
        Ok(item)
    }

    /// Remove content from the featured list
    pub async fn unfeature(&self, id: &ContentId) -> Result<()> {
        self.store().remove_featured(id).await?;
        info!(%id, "Content unfeatured");
        Ok(())
    }

    /// The featured list, newest first
    pub async fn featured(&self) -> Result<Vec<FeaturedItem>> {
        Ok(self.store().list_featured().await?)
    }

    // ------------------------------------------------------------------

    /// Apply the stored order to live items, degrading to natural
    /// order when the arrangement record cannot be read.
    async fn arrange<T: ContentItem>(
        &self,
        items: Vec<T>,
        key: &ArrangementKey,
    ) -> Vec<T> {
        match self.manager.get_order(key).await {
            Ok(order) => apply_order(items, &order),
            Err(e) => {
                warn!(%key, error = %e, "Arrangement read failed; using natural order");
                items
            }
        }
    }
}

fn validate_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("Field '{}' must not be empty", field);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalBackend;
    use crate::domain::DocumentSource;
    use tempfile::TempDir;

    fn hub(temp: &TempDir) -> ContentHub<LocalBackend> {
        ContentHub::new(LocalBackend::open(temp.path()))
    }

    fn document(title: &str, url: &str) -> Document {
        Document::new(title, "weddings", DocumentSource::Link, url)
    }

    #[tokio::test]
    async fn test_add_document_rejects_empty_title() {
        let temp = TempDir::new().unwrap();
        let hub = hub(&temp);

        let result = hub
            .add_document(document("  ", "https://example.com/a.pdf"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_arranged_documents_identity_without_record() {
        let temp = TempDir::new().unwrap();
        let hub = hub(&temp);

        hub.add_document(document("A", "https://example.com/a.pdf"))
            .await
            .unwrap();
        hub.add_document(document("B", "https://example.com/b.pdf"))
            .await
            .unwrap();

        let natural = hub.documents("weddings").await.unwrap();
        let arranged = hub.arranged_documents("weddings").await.unwrap();

        let natural_ids: Vec<_> = natural.iter().map(|d| d.id.clone()).collect();
        let arranged_ids: Vec<_> = arranged.iter().map(|d| d.id.clone()).collect();
        assert_eq!(natural_ids, arranged_ids);
    }

    #[tokio::test]
    async fn test_move_document_persists_order() {
        let temp = TempDir::new().unwrap();
        let hub = hub(&temp);

        let mut a = document("A", "https://example.com/a.pdf");
        a.created_at = a.created_at - chrono::Duration::hours(2);
        let mut b = document("B", "https://example.com/b.pdf");
        b.created_at = b.created_at - chrono::Duration::hours(1);
        let c = document("C", "https://example.com/c.pdf");

        // Natural order is [C, B, A]
        hub.add_document(a).await.unwrap();
        hub.add_document(b).await.unwrap();
        hub.add_document(c).await.unwrap();

        let moved = hub.move_document("weddings", 2, 0).await.unwrap();
        let titles: Vec<_> = moved.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C", "B"]);

        // The persisted order matches the returned sequence
        let listed = hub.arranged_documents("weddings").await.unwrap();
        let listed_titles: Vec<_> = listed.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(listed_titles, vec!["A", "C", "B"]);
    }

    #[tokio::test]
    async fn test_prune_drops_stale_ids_only() {
        let temp = TempDir::new().unwrap();
        let hub = hub(&temp);

        let a = document("A", "https://example.com/a.pdf");
        let b = document("B", "https://example.com/b.pdf");
        let a_id = a.id.clone();
        let b_id = b.id.clone();
        hub.add_document(a).await.unwrap();
        hub.add_document(b).await.unwrap();

        hub.set_order(
            "weddings",
            ContentKind::Document,
            vec![b_id.clone(), "gone".into(), a_id.clone()],
        )
        .await
        .unwrap();

        let dropped = hub
            .prune_arrangement("weddings", ContentKind::Document)
            .await
            .unwrap();
        assert_eq!(dropped, 1);

        // Surviving ids keep their stored order
        assert_eq!(
            hub.stored_order("weddings", ContentKind::Document)
                .await
                .unwrap(),
            vec![b_id, a_id]
        );
    }

    #[tokio::test]
    async fn test_feature_unknown_id_fails() {
        let temp = TempDir::new().unwrap();
        let hub = hub(&temp);

        let result = hub.feature(ContentKind::Document, &"missing".into()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_feature_and_unfeature_document() {
        let temp = TempDir::new().unwrap();
        let hub = hub(&temp);

        let added = hub
            .add_document(document("A", "https://example.com/a.pdf"))
            .await
            .unwrap();

        let featured = hub
            .feature(ContentKind::Document, &added.id)
            .await
            .unwrap();
        assert_eq!(featured.title, "A");
        assert_eq!(hub.featured().await.unwrap().len(), 1);

        hub.unfeature(&added.id).await.unwrap();
        assert!(hub.featured().await.unwrap().is_empty());
    }
}
