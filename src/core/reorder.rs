//! Optimistic reordering with revert on failed persist.
//!
//! A reorder is two phases at the application boundary: apply the move
//! locally, then attempt to persist the full new order. If the persist
//! fails, the local phase is discarded and the display sequence is
//! re-derived from the last successfully persisted record.

use std::future::Future;

use anyhow::{Context, Result};

use crate::adapters::{ArrangementStore, StoreError};
use crate::domain::{ArrangementKey, ContentId, ContentItem};

use super::arrangement::{apply_order, ArrangementManager};

/// An in-progress reorder of one listing.
///
/// Holds the sequence currently shown to the admin. Moves mutate it
/// immediately (the optimistic phase); `commit` persists it or rolls
/// it back.
pub struct ReorderSession<T> {
    items: Vec<T>,
}

impl<T: ContentItem> ReorderSession<T> {
    /// Start a session from the currently displayed sequence
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// The sequence as currently displayed
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the session, yielding the displayed sequence
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// The full id sequence of the current display order
    pub fn current_order(&self) -> Vec<ContentId> {
        self.items.iter().map(|item| item.id().clone()).collect()
    }

    /// Move the item at `from` so it lands at `to` (drag-and-drop
    /// splice). Out-of-bounds indices are rejected without mutating.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        if from >= self.items.len() || to >= self.items.len() {
            anyhow::bail!(
                "Move {} -> {} out of bounds for {} items",
                from,
                to,
                self.items.len()
            );
        }

        let item = self.items.remove(from);
        self.items.insert(to, item);
        Ok(())
    }

    /// Persist the current order for `key`.
    ///
    /// On success the optimistic sequence and the stored record agree.
    /// On failure the session discards the optimistic sequence: live
    /// items are re-fetched via `reload` and re-arranged under the last
    /// persisted record, and the save error is returned. Should that
    /// re-read of the arrangement itself fail, the session degrades to
    /// the natural order of the reloaded items.
    pub async fn commit<S, F, Fut>(
        &mut self,
        manager: &ArrangementManager<S>,
        key: &ArrangementKey,
        reload: F,
    ) -> Result<()>
    where
        S: ArrangementStore,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, StoreError>>,
    {
        match manager.save_order(key, self.current_order()).await {
            Ok(()) => Ok(()),
            Err(save_error) => {
                let live = reload()
                    .await
                    .context("Failed to reload items while reverting a failed reorder")?;

                self.items = match manager.get_order(key).await {
                    Ok(order) => apply_order(live, &order),
                    // Read failure degrades to natural order
                    Err(_) => live,
                };

                Err(save_error).context(format!("Failed to save arrangement for {}", key))
            }
        }
    }
}
