use std::io;
use std::process::ExitStatus;

use thiserror::Error;

use vidvault_core::ConfigError;

/// Errors from the acquisition pipeline.
///
/// `Spawn` and `Engine` are group-level: the dispatcher logs them and keeps
/// going with the remaining groups, except when they come from the one-time
/// availability preflight. `Config` aborts the run outright.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to run `{tool}`: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("fetch engine exited with {status}: {stderr}")]
    Engine { status: ExitStatus, stderr: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
