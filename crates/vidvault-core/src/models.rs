//! Domain models shared across the VidVault crates.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// A cataloged media file.
///
/// `normalized_name` is the deduplication key and the only externally visible
/// identifier; `storage_key` is the collision-free name the bytes are (or would
/// be) stored under, decoupled from the display name so files can be renamed
/// safely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CatalogRecord {
    /// Row id; `None` until the record has been inserted.
    #[sqlx(default)]
    pub id: Option<i64>,
    pub raw_name: String,
    pub normalized_name: String,
    pub storage_key: String,
    pub uploaded: bool,
    pub size_bytes: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    #[sqlx(rename = "duration")]
    pub duration_seconds: Option<f64>,
    pub privacy_level: i32,
    pub description: Option<String>,
}

/// How a sexagesimal probe duration is converted to the stored float.
///
/// `Legacy` is the historical conversion (`hours*60 + minutes + seconds/100`)
/// kept as the default so new imports stay comparable with existing rows;
/// `TotalSeconds` is the conventional conversion, enabled with
/// `"legacy_duration": false` in the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationRule {
    #[default]
    Legacy,
    TotalSeconds,
}

/// Outcome of one import call, partitioned in file-enumeration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Records inserted by this call.
    pub created: Vec<CatalogRecord>,
    /// Candidates whose normalized name already existed; never persisted.
    pub duplicates: Vec<CatalogRecord>,
    /// Raw names of files that failed probing or name sanitization.
    pub rejected: Vec<String>,
}

impl ImportReport {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.duplicates.is_empty() && self.rejected.is_empty()
    }
}

impl Display for ImportReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let rejected = if self.rejected.is_empty() {
            "none".to_string()
        } else {
            self.rejected.join("\n")
        };
        write!(
            f,
            "ImportReport(created={}, duplicates={})\nRejected files: {}",
            self.created.len(),
            self.duplicates.len(),
            rejected
        )
    }
}

/// Catalog-wide aggregates for the stats command.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CatalogStats {
    pub total: i64,
    pub uploaded: i64,
    pub total_size_bytes: i64,
    pub total_duration: f64,
}
