//! Arrangement records: the persisted manual display order for one
//! (category, kind) pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::content::{ContentId, ContentKind};

/// Identifies one arrangement: a content category paired with a kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrangementKey {
    /// Content category (e.g. "photography-contracts")
    pub category: String,

    /// Content kind the order applies to
    pub kind: ContentKind,
}

impl ArrangementKey {
    /// Create a new arrangement key
    pub fn new(category: impl Into<String>, kind: ContentKind) -> Self {
        Self {
            category: category.into(),
            kind,
        }
    }

    /// Check that the key is usable: the category must be non-empty.
    ///
    /// An empty category is a caller contract violation and is rejected
    /// before any store I/O happens.
    pub fn is_valid(&self) -> bool {
        !self.category.trim().is_empty()
    }
}

impl std::fmt::Display for ArrangementKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.category, self.kind)
    }
}

/// Persisted manual ordering for one arrangement key.
///
/// `order` may reference ids that no longer exist in the live item set
/// (deleted content) and may omit ids that do (newly added content);
/// both are tolerated when the order is applied. At most one record
/// exists per key, enforced by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrangementRecord {
    /// Record identifier
    pub id: Uuid,

    /// The (category, kind) pair this order applies to
    #[serde(flatten)]
    pub key: ArrangementKey,

    /// Item ids in display order
    pub order: Vec<ContentId>,

    /// When the order was last saved
    pub updated_at: DateTime<Utc>,
}

impl ArrangementRecord {
    /// Create a new record with the current timestamp
    pub fn new(key: ArrangementKey, order: Vec<ContentId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            key,
            order,
            updated_at: Utc::now(),
        }
    }

    /// Replace the stored order, bumping `updated_at`
    pub fn replace_order(&mut self, order: Vec<ContentId>) {
        self.order = order;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_validation() {
        assert!(ArrangementKey::new("weddings", ContentKind::Document).is_valid());
        assert!(!ArrangementKey::new("", ContentKind::Document).is_valid());
        assert!(!ArrangementKey::new("   ", ContentKind::Tutorial).is_valid());
    }

    #[test]
    fn test_record_replace_order() {
        let key = ArrangementKey::new("weddings", ContentKind::Document);
        let mut record = ArrangementRecord::new(key, vec!["a".into(), "b".into()]);
        let first_saved = record.updated_at;

        record.replace_order(vec!["b".into(), "a".into()]);

        assert_eq!(record.order, vec!["b".into(), "a".into()]);
        assert!(record.updated_at >= first_saved);
    }

    #[test]
    fn test_record_serialization_flattens_key() {
        let key = ArrangementKey::new("weddings", ContentKind::Tutorial);
        let record = ArrangementRecord::new(key, vec!["x".into()]);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["category"], "weddings");
        assert_eq!(json["kind"], "tutorial");

        let parsed: ArrangementRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.key.category, "weddings");
        assert_eq!(parsed.key.kind, ContentKind::Tutorial);
    }
}
