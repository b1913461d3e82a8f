//! Manual display ordering over the natural retrieval order.
//!
//! The arrangement manager is a thin, fail-fast layer over the
//! arrangement store: it computes the display sequence for a
//! (category, kind) pair and persists new orders produced by an admin
//! reorder. It performs no retries and no logging; read failures and
//! write failures surface to the caller unmodified.

use std::collections::HashMap;

use crate::adapters::{ArrangementStore, StoreError};
use crate::domain::{ArrangementKey, ContentId, ContentItem};

/// Computes and persists the manual display order for content listings.
///
/// Sole writer of arrangement records; any view rendering a
/// (category, kind) pair is a reader.
pub struct ArrangementManager<S> {
    store: S,
}

impl<S: ArrangementStore> ArrangementManager<S> {
    /// Create a manager over an arrangement store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch the stored order for a key.
    ///
    /// An absent record yields an empty sequence, meaning "no manual
    /// arrangement; preserve natural order". No side effects.
    pub async fn get_order(&self, key: &ArrangementKey) -> Result<Vec<ContentId>, StoreError> {
        validate_key(key)?;

        match self.store.find(key).await? {
            Some(record) => Ok(record.order),
            None => Ok(Vec::new()),
        }
    }

    /// Rearrange live items according to the stored order for a key.
    ///
    /// The result is always a permutation of `items`: ids in the stored
    /// order with no matching live item are skipped, and live items the
    /// stored order does not mention are appended in their original
    /// relative order.
    pub async fn apply_order<T: ContentItem>(
        &self,
        items: Vec<T>,
        key: &ArrangementKey,
    ) -> Result<Vec<T>, StoreError> {
        let order = self.get_order(key).await?;
        Ok(apply_order(items, &order))
    }

    /// Persist a full replacement order for a key.
    ///
    /// Upserts the arrangement record: insert on first save, full
    /// replace of the order afterwards. Store failures propagate; the
    /// caller is expected to revert its optimistic state and reload.
    pub async fn save_order(
        &self,
        key: &ArrangementKey,
        order: Vec<ContentId>,
    ) -> Result<(), StoreError> {
        validate_key(key)?;
        self.store.upsert(key, order).await
    }
}

fn validate_key(key: &ArrangementKey) -> Result<(), StoreError> {
    if !key.is_valid() {
        return Err(StoreError::InvalidKey(format!(
            "empty category for kind '{}'",
            key.kind
        )));
    }
    Ok(())
}

/// Interleave live items with a stored order.
///
/// Walks `order` left to right appending matching items in that
/// sequence, then appends the rest of `items` in their original
/// relative order. Linear in `|items| + |order|`.
pub fn apply_order<T: ContentItem>(items: Vec<T>, order: &[ContentId]) -> Vec<T> {
    if order.is_empty() {
        return items;
    }

    let index: HashMap<ContentId, usize> = items
        .iter()
        .enumerate()
        .map(|(position, item)| (item.id().clone(), position))
        .collect();

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut arranged = Vec::with_capacity(slots.len());

    // Matched ids first, in stored order; ids with no live item (and
    // duplicate ids, whose slot is already taken) are skipped
    for id in order {
        if let Some(&position) = index.get(id) {
            if let Some(item) = slots[position].take() {
                arranged.push(item);
            }
        }
    }

    // Then everything the stored order did not mention
    arranged.extend(slots.into_iter().flatten());

    arranged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArrangementRecord, ContentKind};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Item with just enough shape to be arranged
    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: ContentId,
    }

    impl Item {
        fn new(id: &str) -> Self {
            Self { id: id.into() }
        }
    }

    impl ContentItem for Item {
        fn id(&self) -> &ContentId {
            &self.id
        }

        fn category(&self) -> &str {
            "test"
        }
    }

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    /// In-memory arrangement store
    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<Vec<ArrangementRecord>>,
    }

    #[async_trait]
    impl ArrangementStore for MemoryStore {
        async fn find(
            &self,
            key: &ArrangementKey,
        ) -> Result<Option<ArrangementRecord>, StoreError> {
            let records = self.records.lock().unwrap();
            Ok(records.iter().find(|r| &r.key == key).cloned())
        }

        async fn upsert(
            &self,
            key: &ArrangementKey,
            order: Vec<ContentId>,
        ) -> Result<(), StoreError> {
            let mut records = self.records.lock().unwrap();
            if let Some(existing) = records.iter_mut().find(|r| &r.key == key) {
                existing.replace_order(order);
            } else {
                records.push(ArrangementRecord::new(key.clone(), order));
            }
            Ok(())
        }
    }

    #[test]
    fn test_identity_when_unarranged() {
        let items = vec![Item::new("a"), Item::new("b"), Item::new("c")];

        let result = apply_order(items.clone(), &[]);

        assert_eq!(result, items);
    }

    #[test]
    fn test_deterministic_interleave() {
        // items [A, B, C, D], stored order [c, a] -> [C, A, B, D]
        let items = vec![
            Item::new("a"),
            Item::new("b"),
            Item::new("c"),
            Item::new("d"),
        ];
        let order: Vec<ContentId> = vec!["c".into(), "a".into()];

        let result = apply_order(items, &order);

        assert_eq!(ids(&result), vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_deleted_id_tolerance() {
        // ids x, y no longer exist; result drops them without error
        let items = vec![Item::new("a"), Item::new("b")];
        let order: Vec<ContentId> = vec!["x".into(), "a".into(), "y".into(), "b".into()];

        let result = apply_order(items, &order);

        assert_eq!(ids(&result), vec!["a", "b"]);
    }

    #[test]
    fn test_permutation_invariant() {
        let items = vec![
            Item::new("a"),
            Item::new("b"),
            Item::new("c"),
            Item::new("d"),
            Item::new("e"),
        ];
        let order: Vec<ContentId> = vec!["d".into(), "missing".into(), "b".into()];

        let result = apply_order(items.clone(), &order);

        assert_eq!(result.len(), items.len());
        let mut sorted_in: Vec<&str> = ids(&items);
        let mut sorted_out: Vec<&str> = ids(&result);
        sorted_in.sort();
        sorted_out.sort();
        assert_eq!(sorted_in, sorted_out);
    }

    #[test]
    fn test_duplicate_ids_in_order_emit_once() {
        let items = vec![Item::new("a"), Item::new("b")];
        let order: Vec<ContentId> = vec!["b".into(), "b".into(), "a".into()];

        let result = apply_order(items, &order);

        assert_eq!(ids(&result), vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_get_order_absent_record_is_empty() {
        let manager = ArrangementManager::new(MemoryStore::default());
        let key = ArrangementKey::new("weddings", ContentKind::Document);

        assert!(manager.get_order(&key).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_get_roundtrip() {
        let manager = ArrangementManager::new(MemoryStore::default());
        let key = ArrangementKey::new("weddings", ContentKind::Document);

        manager
            .save_order(&key, vec!["b".into(), "a".into()])
            .await
            .unwrap();
        assert_eq!(
            manager.get_order(&key).await.unwrap(),
            vec!["b".into(), "a".into()]
        );

        // Second save replaces, does not duplicate
        manager
            .save_order(&key, vec!["a".into(), "b".into()])
            .await
            .unwrap();
        assert_eq!(
            manager.get_order(&key).await.unwrap(),
            vec!["a".into(), "b".into()]
        );
    }

    #[tokio::test]
    async fn test_invalid_key_rejected_before_io() {
        let manager = ArrangementManager::new(MemoryStore::default());
        let key = ArrangementKey::new("", ContentKind::Document);

        assert!(matches!(
            manager.get_order(&key).await,
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(
            manager.save_order(&key, vec!["a".into()]).await,
            Err(StoreError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_apply_order_via_manager() {
        let manager = ArrangementManager::new(MemoryStore::default());
        let key = ArrangementKey::new("weddings", ContentKind::Document);

        manager
            .save_order(&key, vec!["c".into(), "a".into()])
            .await
            .unwrap();

        let items = vec![
            Item::new("a"),
            Item::new("b"),
            Item::new("c"),
            Item::new("d"),
        ];
        let result = manager.apply_order(items, &key).await.unwrap();

        assert_eq!(ids(&result), vec!["c", "a", "b", "d"]);
    }
}
