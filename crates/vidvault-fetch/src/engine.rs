//! External fetch engine invocation.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::FetchError;
use crate::options::FetchOptions;

/// Lines of engine stderr kept in an [`FetchError::Engine`]; yt-dlp repeats
/// its diagnostics per URL and the last few lines carry the actual cause.
const STDERR_TAIL_LINES: usize = 20;

/// One batch call per category group; the engine applies its own per-URL
/// error tolerance inside the call.
#[async_trait]
pub trait FetchEngine: Send + Sync {
    /// Cheap availability check, run once before the first group.
    async fn ensure_available(&self) -> Result<(), FetchError>;

    async fn fetch(&self, urls: &[String], options: &FetchOptions) -> Result<(), FetchError>;
}

/// Production engine spawning the configured yt-dlp executable.
pub struct YtDlpEngine {
    tool: PathBuf,
}

impl YtDlpEngine {
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }

    fn spawn_error(&self, source: std::io::Error) -> FetchError {
        FetchError::Spawn {
            tool: self.tool.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl FetchEngine for YtDlpEngine {
    /// `<tool> --version`; fails when the executable is absent or broken.
    async fn ensure_available(&self) -> Result<(), FetchError> {
        let output = Command::new(&self.tool)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| self.spawn_error(source))?;

        if !output.status.success() {
            return Err(FetchError::Engine {
                status: output.status,
                stderr: stderr_tail(&output.stderr),
            });
        }
        let version = String::from_utf8_lossy(&output.stdout);
        debug!(tool = %self.tool.display(), version = %version.trim(), "fetch tool available");
        Ok(())
    }

    #[tracing::instrument(skip(self, urls, options), fields(tool = %self.tool.display(), urls = urls.len()))]
    async fn fetch(&self, urls: &[String], options: &FetchOptions) -> Result<(), FetchError> {
        // Progress stays on the console; stderr is captured for diagnostics.
        let output = Command::new(&self.tool)
            .args(options.to_args())
            .args(urls)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .output()
            .await
            .map_err(|source| self.spawn_error(source))?;

        if !output.status.success() {
            return Err(FetchError::Engine {
                status: output.status,
                stderr: stderr_tail(&output.stderr),
            });
        }
        Ok(())
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
