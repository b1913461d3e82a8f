//! Domain types for the content hub.
//!
//! This module contains the core data structures:
//! - Content: documents, tutorials, and their shared identity
//! - Arrangement: the persisted manual display order per (category, kind)
//! - Featured: the curated home-page highlight list

pub mod arrangement;
pub mod content;
pub mod featured;

// Re-export commonly used types
pub use arrangement::{ArrangementKey, ArrangementRecord};
pub use content::{ContentId, ContentItem, ContentKind, Document, DocumentSource, Tutorial};
pub use featured::FeaturedItem;
