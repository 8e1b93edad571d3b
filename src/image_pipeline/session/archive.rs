use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::Path;

use tracing::{info, instrument, warn};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::image_pipeline::common::config::DEFAULT_ARCHIVE_SUFFIX;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::session::types::ImageResult;

/// Stem used when an image name has none (e.g. an empty string).
const FALLBACK_STEM: &str = "image";

/// An entry that had to be renamed because its derived name was already taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveNameCollision {
    pub image_name: String,
    pub requested: String,
    pub assigned: String,
}

/// A finished zip archive and what went into it.
#[derive(Debug, Clone)]
pub struct ArchiveExport {
    pub bytes: Vec<u8>,
    /// Entry names, in result order
    pub entries: Vec<String>,
    pub collisions: Vec<ArchiveNameCollision>,
}

fn image_stem(image_name: &str) -> &str {
    Path::new(image_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or(FALLBACK_STEM)
}

/// Assigns unique entry names in result order.
///
/// The first result to want `<stem><suffix>` gets it; later ones get
/// `<stem>_2<suffix>`, `<stem>_3<suffix>`, ... skipping any name already assigned.
pub fn entry_names(
    results: &[ImageResult],
    suffix: &str,
) -> (Vec<String>, Vec<ArchiveNameCollision>) {
    let mut used = HashSet::new();
    let mut names = Vec::with_capacity(results.len());
    let mut collisions = Vec::new();

    for result in results {
        let stem = image_stem(&result.image_name);
        let requested = format!("{}{}", stem, suffix);

        let assigned = if used.contains(&requested) {
            let name = (2..)
                .map(|n| format!("{}_{}{}", stem, n, suffix))
                .find(|candidate| !used.contains(candidate))
                .unwrap_or_else(|| requested.clone());
            warn!(
                image = %result.image_name,
                requested = %requested,
                assigned = %name,
                "Archive entry name collision resolved"
            );
            collisions.push(ArchiveNameCollision {
                image_name: result.image_name.clone(),
                requested,
                assigned: name.clone(),
            });
            name
        } else {
            requested
        };

        used.insert(assigned.clone());
        names.push(assigned);
    }

    (names, collisions)
}

/// Writes one pretty-printed JSON document per result into a zip archive.
#[instrument(skip(results), fields(count = results.len()))]
pub fn export_archive_with_suffix(results: &[ImageResult], suffix: &str) -> Result<ArchiveExport> {
    let (entries, collisions) = entry_names(results, suffix);

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (result, name) in results.iter().zip(&entries) {
        let json = serde_json::to_vec_pretty(result)?;
        writer.start_file(name.as_str(), options)?;
        writer.write_all(&json)?;
    }

    let bytes = writer.finish()?.into_inner();
    info!(
        entries = entries.len(),
        collisions = collisions.len(),
        size = bytes.len(),
        "Archive export complete"
    );

    Ok(ArchiveExport {
        bytes,
        entries,
        collisions,
    })
}

/// Exports `results` with the default `_stats.json` entry suffix.
pub fn export_archive(results: &[ImageResult]) -> Result<ArchiveExport> {
    export_archive_with_suffix(results, DEFAULT_ARCHIVE_SUFFIX)
}
