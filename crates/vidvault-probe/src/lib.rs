//! VidVault Probe Library
//!
//! Wraps the external ffprobe tool behind the [`VideoProber`] trait and turns
//! its JSON output into catalog records. Probing is an explicit result type:
//! a bad file is an `Err`, never a panic, and callers decide what a rejection
//! means.

pub mod error;
pub mod extract;
pub mod prober;
pub mod report;

pub use error::ProbeError;
pub use extract::{extract_record, parse_duration};
pub use prober::{FfprobeProber, VideoProber};
pub use report::{ProbeFormat, ProbeReport, ProbeStream};
