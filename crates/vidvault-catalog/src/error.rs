//! Catalog error types.

use vidvault_probe::ProbeError;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Store-level failure. Fatal for the whole call; the batch insert runs
    /// in one transaction, so nothing was committed.
    #[error("catalog store error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// The probe tool could not be run at all. Raised instead of rejecting
    /// file after file when the environment is broken.
    #[error("probe environment error: {0}")]
    Environment(ProbeError),
}
