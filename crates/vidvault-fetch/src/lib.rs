//! VidVault Fetch Library
//!
//! Classifies requested URLs into fetch-strategy categories and drives the
//! external fetch engine (yt-dlp) once per category group. The engine sits
//! behind the [`FetchEngine`] trait so the dispatcher can be exercised without
//! network access.

pub mod category;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod options;

pub use category::{category_rules, classify, CategoryKind, CategoryRule, UrlGroup};
pub use dispatch::{Destination, Dispatcher, GroupOutcome, PlanEntry};
pub use engine::{FetchEngine, YtDlpEngine};
pub use error::FetchError;
pub use options::FetchOptions;
