//! The import pipeline.
//!
//! Enumerate accepted media files, probe each one, then partition against the
//! store in a single pass: probe failures and unsanitizable names are
//! rejected, known normalized names are duplicates, the rest is inserted in
//! one transaction.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use vidvault_core::{CatalogRecord, DurationRule, ImportReport};
use vidvault_probe::{extract_record, VideoProber};

use crate::error::CatalogError;
use crate::store::CatalogStore;

/// File extensions accepted for import, matched case-insensitively.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["mp4", "mkv", "avi", "mov"];

pub struct Importer<'a> {
    store: &'a CatalogStore,
    prober: &'a dyn VideoProber,
    duration_rule: DurationRule,
}

impl<'a> Importer<'a> {
    pub fn new(
        store: &'a CatalogStore,
        prober: &'a dyn VideoProber,
        duration_rule: DurationRule,
    ) -> Self {
        Self {
            store,
            prober,
            duration_rule,
        }
    }

    /// Imports `path` (one media file, or the immediate files of a directory)
    /// at the given privacy level.
    ///
    /// A nonexistent path is a no-op, not an error. Per-file probe failures
    /// become rejections; a probe tool that cannot be spawned at all aborts
    /// the call instead, since every remaining file would fail the same way.
    #[tracing::instrument(skip(self), fields(path = %path.display()))]
    pub async fn import(
        &self,
        path: &Path,
        privacy_level: i32,
    ) -> Result<ImportReport, CatalogError> {
        if !path.exists() {
            warn!("import path does not exist");
            return Ok(ImportReport::default());
        }

        let files = accepted_files(path);
        if files.is_empty() {
            info!("no importable video files");
            return Ok(ImportReport::default());
        }

        // Probe every file first; rejection reasons are per-file and must not
        // stop the batch.
        let mut candidates: Vec<Result<CatalogRecord, String>> = Vec::with_capacity(files.len());
        for file in &files {
            let raw_name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            match self.probe_one(file, privacy_level).await {
                Ok(record) => candidates.push(Ok(record)),
                Err(err) if err.is_environment() => {
                    return Err(CatalogError::Environment(err));
                }
                Err(err) => {
                    warn!(file = %file.display(), error = %err, "probe failed, rejecting file");
                    candidates.push(Err(raw_name));
                }
            }
        }

        let names: Vec<&str> = candidates
            .iter()
            .filter_map(|candidate| candidate.as_ref().ok())
            .map(|record| record.normalized_name.as_str())
            .collect();
        let existing = self.store.existing_names(&names).await?;

        let mut report = ImportReport::default();
        let mut to_insert = Vec::new();
        // Names claimed earlier in this same batch count as duplicates too;
        // the store's UNIQUE constraint would otherwise fail the whole insert.
        let mut claimed: HashSet<String> = HashSet::new();
        for candidate in candidates {
            match candidate {
                Err(raw_name) => report.rejected.push(raw_name),
                Ok(record) if record.normalized_name.is_empty() => {
                    report.rejected.push(record.raw_name);
                }
                Ok(record)
                    if existing.contains(&record.normalized_name)
                        || !claimed.insert(record.normalized_name.clone()) =>
                {
                    report.duplicates.push(record);
                }
                Ok(record) => to_insert.push(record),
            }
        }

        report.created = self.store.insert_batch(to_insert).await?;
        info!(
            created = report.created.len(),
            duplicates = report.duplicates.len(),
            rejected = report.rejected.len(),
            "import finished"
        );
        Ok(report)
    }

    async fn probe_one(
        &self,
        file: &Path,
        privacy_level: i32,
    ) -> Result<CatalogRecord, vidvault_probe::ProbeError> {
        let report = self.prober.probe(file).await?;
        // Size 0 if the file vanished between enumeration and stat.
        let size_bytes = tokio::fs::metadata(file)
            .await
            .map(|meta| meta.len())
            .unwrap_or(0);
        extract_record(&report, file, size_bytes, privacy_level, self.duration_rule)
    }
}

/// The files `path` offers for import: itself when it is an accepted media
/// file, its immediate accepted files when it is a directory (non-recursive),
/// nothing otherwise.
fn accepted_files(path: &Path) -> Vec<PathBuf> {
    if path.is_dir() {
        let Ok(entries) = std::fs::read_dir(path) else {
            return Vec::new();
        };
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|candidate| candidate.is_file() && has_accepted_extension(candidate))
            .collect()
    } else if path.is_file() && has_accepted_extension(path) {
        vec![path.to_path_buf()]
    } else {
        Vec::new()
    }
}

fn has_accepted_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            ACCEPTED_EXTENSIONS.iter().any(|accepted| *accepted == ext)
        })
        .unwrap_or(false)
}
