//! Session aggregation module
//!
//! Collects saved per-image results for one session and exports them as a zip archive
//! of JSON records.

mod archive;
mod store;
pub mod types;

pub use archive::{
    ArchiveExport, ArchiveNameCollision, entry_names, export_archive, export_archive_with_suffix,
};
pub use store::SessionStore;
pub use types::{ImageResult, LampCondition};
