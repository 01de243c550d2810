//! Probe error types.

use std::io;
use std::process::ExitStatus;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("probe tool exited with {status}: {stderr}")]
    Tool { status: ExitStatus, stderr: String },

    #[error("probe output is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no video stream in probe output")]
    NoVideoStream,

    #[error("unparsable duration {0:?}")]
    Duration(String),
}

impl ProbeError {
    /// Spawn failures mean the probe tool itself is missing or not runnable,
    /// not that the input file is bad. Importers abort on these instead of
    /// rejecting the file.
    pub fn is_environment(&self) -> bool {
        matches!(self, ProbeError::Spawn { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_spawn_is_an_environment_error() {
        let spawn = ProbeError::Spawn {
            tool: "ffprobe".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(spawn.is_environment());
        assert!(!ProbeError::NoVideoStream.is_environment());
        assert!(!ProbeError::Duration("garbage".to_string()).is_environment());
    }
}
