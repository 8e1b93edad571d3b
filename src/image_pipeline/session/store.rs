use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::image_pipeline::common::config::DEFAULT_ARCHIVE_SUFFIX;
use crate::image_pipeline::common::error::{AnalysisError, Result};
use crate::image_pipeline::session::archive::{ArchiveExport, export_archive_with_suffix};
use crate::image_pipeline::session::types::{ImageResult, LampCondition};

/// Ordered, append-only list of saved results for one session.
///
/// Each session owns its store; appends are serialized by an internal lock so the
/// store can be shared with worker threads that finish images out of order.
#[derive(Debug)]
pub struct SessionStore {
    results: Mutex<Vec<ImageResult>>,
    archive_suffix: String,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_archive_suffix(DEFAULT_ARCHIVE_SUFFIX)
    }

    pub fn with_archive_suffix(suffix: impl Into<String>) -> Self {
        Self {
            results: Mutex::new(Vec::new()),
            archive_suffix: suffix.into(),
        }
    }

    // A panic while holding the lock cannot leave a half-pushed Vec behind.
    fn lock(&self) -> MutexGuard<'_, Vec<ImageResult>> {
        self.results.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `result` and returns the new number of stored results.
    pub fn add_result(&self, result: ImageResult) -> usize {
        let mut results = self.lock();
        debug!(image = %result.image_name, lamp = %result.lamp_condition, "Saving result");
        results.push(result);
        results.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of every result in insertion order.
    pub fn results(&self) -> Vec<ImageResult> {
        self.lock().clone()
    }

    /// Results captured under `lamp`, in insertion order.
    pub fn results_for(&self, lamp: LampCondition) -> Vec<ImageResult> {
        self.lock()
            .iter()
            .filter(|result| result.lamp_condition == lamp)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        let mut results = self.lock();
        info!("Clearing {} session result(s)", results.len());
        results.clear();
    }

    /// Serializes the current results into a zip archive.
    pub fn export_archive(&self) -> Result<ArchiveExport> {
        let results = self.results();
        export_archive_with_suffix(&results, &self.archive_suffix)
    }

    /// Exports the archive and writes it to `output_path`.
    pub fn write_archive<P: AsRef<Path>>(&self, output_path: P) -> Result<ArchiveExport> {
        let output_path = output_path.as_ref();
        let export = self.export_archive()?;
        std::fs::write(output_path, &export.bytes).map_err(|e| {
            AnalysisError::OutputWriteError(format!("{}: {}", output_path.display(), e))
        })?;
        info!(
            "Wrote {} record(s) to {}",
            export.entries.len(),
            output_path.display()
        );
        Ok(export)
    }
}
