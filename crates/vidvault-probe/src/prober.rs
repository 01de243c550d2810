//! External probe tool invocation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::ProbeError;
use crate::report::ProbeReport;

/// Fixed ffprobe argument set; `-sexagesimal` makes durations come back as
/// `H:MM:SS.ffffff` text.
const FFPROBE_ARGS: [&str; 7] = [
    "-v",
    "quiet",
    "-print_format",
    "json",
    "-show_format",
    "-show_streams",
    "-sexagesimal",
];

/// Container/stream inspection for a single file.
#[async_trait]
pub trait VideoProber: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<ProbeReport, ProbeError>;
}

/// Production prober backed by the ffprobe executable.
pub struct FfprobeProber {
    ffprobe_path: PathBuf,
}

impl FfprobeProber {
    pub fn new(ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }
}

impl Default for FfprobeProber {
    /// Bare `ffprobe`, resolved through PATH.
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

#[async_trait]
impl VideoProber for FfprobeProber {
    #[tracing::instrument(skip(self), fields(tool = %self.ffprobe_path.display()))]
    async fn probe(&self, path: &Path) -> Result<ProbeReport, ProbeError> {
        // ffprobe is handed an absolute path; fall back to the original if
        // canonicalization fails (the tool will then report its own error).
        let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let output = Command::new(&self.ffprobe_path)
            .args(FFPROBE_ARGS)
            .arg(&absolute)
            .output()
            .await
            .map_err(|source| ProbeError::Spawn {
                tool: self.ffprobe_path.display().to_string(),
                source,
            })?;

        if !output.status.success() || output.stdout.is_empty() {
            return Err(ProbeError::Tool {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}
