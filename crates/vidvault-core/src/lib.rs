//! VidVault Core Library
//!
//! This crate provides the domain models, filename normalization, and settings
//! loading shared by the VidVault acquisition and catalog crates.

pub mod error;
pub mod models;
pub mod normalize;
pub mod settings;

// Re-export commonly used types
pub use error::ConfigError;
pub use models::{CatalogRecord, CatalogStats, DurationRule, ImportReport};
pub use normalize::normalize_name;
pub use settings::{CookieSource, ExtraCategory, Settings};
