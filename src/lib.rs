//! shutterdesk - content hub for photography and videography businesses
//!
//! Manages two kinds of content: documents (contract templates,
//! business forms) and tutorials (YouTube-backed lessons), grouped
//! into categories. Admins can overlay the backend's natural retrieval
//! order with a manually curated display order per category.
//!
//! # Architecture
//!
//! - All content access goes through `ContentHub`, which validates
//!   input and applies the saved arrangement to listings
//! - Persistence is a pluggable backend: a local JSON data file, or a
//!   PostgREST-style hosted database
//! - Reorders are optimistic: the new order is shown immediately and
//!   rolled back if the persist fails
//!
//! # Modules
//!
//! - `adapters`: Persistence backends (local JSON file, hosted REST)
//! - `core`: Arrangement logic (ArrangementManager, ReorderSession)
//! - `domain`: Data structures (Document, Tutorial, ArrangementRecord)
//! - `library`: The hub service and content metadata lookup
//! - `view`: Per-session view state (admin/visitor, device preview)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Add a document to a category
//! shutterdesk doc add --category photography-contracts \
//!     --link https://example.com/wedding-contract.pdf
//!
//! # List the category in display order
//! shutterdesk doc list photography-contracts
//!
//! # Move the third document to the top
//! shutterdesk arrange move photography-contracts --from 2 --to 0
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod library;
pub mod view;

// Re-export main types at crate root for convenience
pub use adapters::{ArrangementStore, ContentStore, LocalBackend, RestBackend, StoreError};
pub use crate::core::{ArrangementManager, ReorderSession};
pub use domain::{
    ArrangementKey, ArrangementRecord, ContentId, ContentItem, ContentKind, Document,
    DocumentSource, FeaturedItem, Tutorial,
};
pub use library::ContentHub;
pub use view::{DeviceKind, DevicePreview, Orientation, ViewContext, ViewMode};
