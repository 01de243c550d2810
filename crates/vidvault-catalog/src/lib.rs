//! VidVault Catalog Library
//!
//! SQLite-backed catalog store plus the import pipeline that feeds it:
//! enumerate files, probe them, and insert deduplicated records in one
//! transaction.

pub mod error;
pub mod import;
pub mod store;

pub use error::CatalogError;
pub use import::{Importer, ACCEPTED_EXTENSIONS};
pub use store::CatalogStore;
