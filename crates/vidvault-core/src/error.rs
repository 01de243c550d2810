//! Configuration error types
//!
//! Settings are loaded leniently: every field is optional at parse time, and
//! requiredness is enforced by the accessor that first needs the field. These
//! errors are therefore raised at the point of first use and abort the current
//! top-level operation.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("required setting `{0}` is missing")]
    MissingField(&'static str),

    #[error("ffmpeg directory {} is unusable: {reason}", path.display())]
    FfmpegDir { path: PathBuf, reason: String },

    #[error("cookie template {0:?} not found in settings")]
    UnknownCookieTemplate(String),

    #[error("cookie template {name:?} is invalid: {reason}")]
    CookieTemplate { name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err = ConfigError::MissingField("ffmpeg_dir");
        assert_eq!(err.to_string(), "required setting `ffmpeg_dir` is missing");
    }

    #[test]
    fn test_ffmpeg_dir_message_includes_path_and_reason() {
        let err = ConfigError::FfmpegDir {
            path: PathBuf::from("/opt/ffmpeg/bin"),
            reason: "missing ffprobe".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/opt/ffmpeg/bin"));
        assert!(msg.contains("missing ffprobe"));
    }

    #[test]
    fn test_unknown_cookie_template_message() {
        let err = ConfigError::UnknownCookieTemplate("generic".to_string());
        assert!(err.to_string().contains("\"generic\""));
    }
}
