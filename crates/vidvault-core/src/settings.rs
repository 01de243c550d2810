//! Settings file loading
//!
//! Configuration lives in a single JSON file (by default
//! `./secrets/appsettings.json`). It is loaded once per command invocation and
//! the resulting [`Settings`] value is passed explicitly to every component;
//! nothing re-reads the file at call sites.
//!
//! Parsing is lenient: every key is optional and unknown keys are ignored.
//! Fields that a pipeline cannot run without are checked by dedicated
//! accessors (`require_ffmpeg_dir`, `cookie_template`) which fail with a
//! [`ConfigError`] at the point of first use.

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::DurationRule;

/// Settings file used when neither the CLI flag nor the environment variable
/// names one.
pub const DEFAULT_SETTINGS_PATH: &str = "./secrets/appsettings.json";

/// Environment variable overriding the settings file location.
pub const SETTINGS_PATH_ENV: &str = "VIDVAULT_SETTINGS";

/// Connection descriptor used when the settings file names none. The catalog
/// then lives in process memory and is discarded on exit.
pub const MEMORY_CONNECTION_STRING: &str = "sqlite::memory:";

const DEFAULT_STORAGE_ROOT: &str = "./vids";
const DEFAULT_FFPROBE_PATH: &str = "ffprobe";
const DEFAULT_FETCH_TOOL: &str = "yt-dlp";
const DEFAULT_IMPERSONATE_TARGET: &str = "edge:windows";

/// Executables the configured ffmpeg directory must contain, exactly.
const FFMPEG_TOOLS: [&str; 3] = ["ffmpeg", "ffplay", "ffprobe"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Catalog store descriptor, e.g. `sqlite://catalog.db`.
    pub connection_string: Option<String>,
    /// Directory downloads land in and imports are checked against.
    pub storage_root: PathBuf,
    /// File fetch-group failures are appended to; disabled when unset.
    pub error_log: Option<PathBuf>,
    /// Directory containing the ffmpeg executables handed to the fetch engine.
    pub ffmpeg_dir: Option<PathBuf>,
    /// Probe executable; bare name means PATH lookup.
    pub ffprobe_path: PathBuf,
    /// Fetch engine executable; bare name means PATH lookup.
    pub fetch_tool: PathBuf,
    pub forced_generic_sites: Vec<String>,
    pub impersonate_sites: Vec<String>,
    pub impersonate_target: String,
    pub cookie_sites: Vec<String>,
    pub cookie_templates: BTreeMap<String, CookieSource>,
    pub extra_categories: Vec<ExtraCategory>,
    /// Keeps the historical duration conversion; set to `false` to store
    /// conventional total seconds instead.
    pub legacy_duration: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            connection_string: None,
            storage_root: PathBuf::from(DEFAULT_STORAGE_ROOT),
            error_log: None,
            ffmpeg_dir: None,
            ffprobe_path: PathBuf::from(DEFAULT_FFPROBE_PATH),
            fetch_tool: PathBuf::from(DEFAULT_FETCH_TOOL),
            forced_generic_sites: Vec::new(),
            impersonate_sites: Vec::new(),
            impersonate_target: DEFAULT_IMPERSONATE_TARGET.to_string(),
            cookie_sites: Vec::new(),
            cookie_templates: BTreeMap::new(),
            extra_categories: Vec::new(),
            legacy_duration: true,
        }
    }
}

/// Browser cookie source for sites that only serve logged-in sessions.
///
/// Empty strings mean "unset"; only `browser` is mandatory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CookieSource {
    pub browser: String,
    pub profile: String,
    pub keyring: String,
    pub container: String,
}

/// A configuration-defined URL category beyond the built-in ones. Matching
/// URLs are fetched with `extra_args` appended to the engine invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtraCategory {
    pub name: String,
    pub hosts: Vec<String>,
    pub extra_args: Vec<String>,
}

impl Settings {
    /// Reads and parses the settings file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Settings file location: explicit override, then `VIDVAULT_SETTINGS`,
    /// then the default path.
    pub fn resolve_path(cli_override: Option<&Path>) -> PathBuf {
        if let Some(path) = cli_override {
            return path.to_path_buf();
        }
        if let Ok(path) = env::var(SETTINGS_PATH_ENV) {
            return PathBuf::from(path);
        }
        PathBuf::from(DEFAULT_SETTINGS_PATH)
    }

    /// Connection descriptor for the catalog store, falling back to the
    /// in-memory database. Callers should warn when [`persists_catalog`]
    /// is false.
    ///
    /// [`persists_catalog`]: Settings::persists_catalog
    pub fn connection_descriptor(&self) -> &str {
        self.connection_string
            .as_deref()
            .unwrap_or(MEMORY_CONNECTION_STRING)
    }

    /// Whether the catalog outlives the process.
    pub fn persists_catalog(&self) -> bool {
        self.connection_string.is_some()
    }

    pub fn duration_rule(&self) -> DurationRule {
        if self.legacy_duration {
            DurationRule::Legacy
        } else {
            DurationRule::TotalSeconds
        }
    }

    /// The ffmpeg directory, validated to contain exactly the expected tool
    /// executables. Required for acquisition; the check runs at dispatcher
    /// construction, before any URL is touched.
    pub fn require_ffmpeg_dir(&self) -> Result<&Path, ConfigError> {
        let dir = self
            .ffmpeg_dir
            .as_deref()
            .ok_or(ConfigError::MissingField("ffmpeg_dir"))?;
        validate_ffmpeg_dir(dir)?;
        Ok(dir)
    }

    /// Looks up a named cookie template and checks it names a browser.
    pub fn cookie_template(&self, name: &str) -> Result<&CookieSource, ConfigError> {
        let template = self
            .cookie_templates
            .get(name)
            .ok_or_else(|| ConfigError::UnknownCookieTemplate(name.to_string()))?;
        if template.browser.is_empty() {
            return Err(ConfigError::CookieTemplate {
                name: name.to_string(),
                reason: "browser must be set".to_string(),
            });
        }
        Ok(template)
    }
}

fn validate_ffmpeg_dir(dir: &Path) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::FfmpegDir {
        path: dir.to_path_buf(),
        reason,
    };

    let expected: BTreeSet<String> = FFMPEG_TOOLS
        .iter()
        .map(|tool| format!("{tool}{}", env::consts::EXE_SUFFIX))
        .collect();

    let mut found = BTreeSet::new();
    for entry in fs::read_dir(dir).map_err(|e| invalid(e.to_string()))? {
        let entry = entry.map_err(|e| invalid(e.to_string()))?;
        let file_type = entry.file_type().map_err(|e| invalid(e.to_string()))?;
        if file_type.is_file() {
            found.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }

    if found != expected {
        return Err(invalid(format!(
            "expected exactly {expected:?}, found {found:?}"
        )));
    }
    Ok(())
}
