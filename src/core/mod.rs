//! Arrangement logic: computing, applying, and persisting the manual
//! display order, and the optimistic reorder flow built on top of it.

pub mod arrangement;
pub mod reorder;

pub use arrangement::{apply_order, ArrangementManager};
pub use reorder::ReorderSession;
