//! Content library: the hub service and content metadata lookup.
//!
//! `ContentHub` is the layer callers talk to: validated CRUD for
//! documents, tutorials and featured content, plus arranged listings
//! with the manual display order applied.

pub mod hub;
pub mod metadata;

pub use hub::ContentHub;
pub use metadata::{fetch_youtube_metadata, link_title, youtube_video_id, VideoMetadata};
