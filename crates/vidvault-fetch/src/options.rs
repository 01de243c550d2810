//! Fetch engine options.
//!
//! A fresh [`FetchOptions`] is built for every category group: the shared base
//! (error tolerance, storage root, ffmpeg location) plus at most one category
//! override. [`FetchOptions::to_args`] renders the yt-dlp command line; the
//! group's URLs are appended separately by the engine.

use std::path::PathBuf;

use vidvault_core::{ConfigError, CookieSource, Settings};

use crate::category::CategoryKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    storage_root: PathBuf,
    ffmpeg_dir: PathBuf,
    forced_generic: bool,
    impersonate: Option<String>,
    cookies: Option<CookieSource>,
    extra_args: Vec<String>,
}

impl FetchOptions {
    /// The base option set shared by every group.
    pub fn new(storage_root: impl Into<PathBuf>, ffmpeg_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
            ffmpeg_dir: ffmpeg_dir.into(),
            forced_generic: false,
            impersonate: None,
            cookies: None,
            extra_args: Vec::new(),
        }
    }

    /// Applies one category's override. Cookie templates are resolved here,
    /// when the group is about to run, so a broken template only fails
    /// invocations that need it.
    pub fn with_category(
        mut self,
        settings: &Settings,
        kind: &CategoryKind,
    ) -> Result<Self, ConfigError> {
        match kind {
            CategoryKind::Standard => {}
            CategoryKind::ForcedGeneric => self.forced_generic = true,
            CategoryKind::Impersonate { target } => self.impersonate = Some(target.clone()),
            CategoryKind::Cookie { template } => {
                self.cookies = Some(settings.cookie_template(template)?.clone());
            }
            CategoryKind::Extra { args } => self.extra_args = args.clone(),
        }
        Ok(self)
    }

    /// Renders the engine command line, URLs excluded.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "--no-abort-on-error".to_string(),
            "--paths".to_string(),
            format!("home:{}", self.storage_root.display()),
            "--ffmpeg-location".to_string(),
            self.ffmpeg_dir.display().to_string(),
        ];
        if self.forced_generic {
            args.push("--use-extractors".to_string());
            args.push("generic,default".to_string());
        }
        if let Some(target) = &self.impersonate {
            args.push("--impersonate".to_string());
            args.push(target.clone());
        }
        if let Some(cookies) = &self.cookies {
            args.push("--cookies-from-browser".to_string());
            args.push(cookie_argument(cookies));
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

/// yt-dlp's `BROWSER[+KEYRING][:PROFILE][::CONTAINER]` syntax; empty template
/// fields are simply left out.
fn cookie_argument(source: &CookieSource) -> String {
    let mut arg = source.browser.clone();
    if !source.keyring.is_empty() {
        arg.push('+');
        arg.push_str(&source.keyring);
    }
    if !source.profile.is_empty() {
        arg.push(':');
        arg.push_str(&source.profile);
    }
    if !source.container.is_empty() {
        arg.push_str("::");
        arg.push_str(&source.container);
    }
    arg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> FetchOptions {
        FetchOptions::new("/srv/vids", "/opt/ffmpeg/bin")
    }

    #[test]
    fn test_base_args() {
        assert_eq!(
            base().to_args(),
            [
                "--no-abort-on-error",
                "--paths",
                "home:/srv/vids",
                "--ffmpeg-location",
                "/opt/ffmpeg/bin",
            ]
        );
    }

    #[test]
    fn test_standard_category_adds_nothing() {
        let options = base()
            .with_category(&Settings::default(), &CategoryKind::Standard)
            .unwrap();
        assert_eq!(options.to_args(), base().to_args());
    }

    #[test]
    fn test_forced_generic_selects_generic_extractor() {
        let options = base()
            .with_category(&Settings::default(), &CategoryKind::ForcedGeneric)
            .unwrap();
        let args = options.to_args();
        let at = args.iter().position(|a| a == "--use-extractors").unwrap();
        assert_eq!(args[at + 1], "generic,default");
    }

    #[test]
    fn test_impersonation_target_is_passed_through() {
        let kind = CategoryKind::Impersonate {
            target: "edge:windows".to_string(),
        };
        let args = base()
            .with_category(&Settings::default(), &kind)
            .unwrap()
            .to_args();
        let at = args.iter().position(|a| a == "--impersonate").unwrap();
        assert_eq!(args[at + 1], "edge:windows");
    }

    #[test]
    fn test_cookie_template_renders_full_source() {
        let mut settings = Settings::default();
        settings.cookie_templates.insert(
            "generic".to_string(),
            CookieSource {
                browser: "firefox".to_string(),
                profile: "work".to_string(),
                keyring: "gnomekeyring".to_string(),
                container: "personal".to_string(),
            },
        );
        let kind = CategoryKind::Cookie {
            template: "generic".to_string(),
        };
        let args = base().with_category(&settings, &kind).unwrap().to_args();
        let at = args
            .iter()
            .position(|a| a == "--cookies-from-browser")
            .unwrap();
        assert_eq!(args[at + 1], "firefox+gnomekeyring:work::personal");
    }

    #[test]
    fn test_cookie_template_browser_only() {
        let mut settings = Settings::default();
        settings.cookie_templates.insert(
            "generic".to_string(),
            CookieSource {
                browser: "firefox".to_string(),
                ..CookieSource::default()
            },
        );
        let kind = CategoryKind::Cookie {
            template: "generic".to_string(),
        };
        let args = base().with_category(&settings, &kind).unwrap().to_args();
        assert_eq!(args.last().unwrap(), "firefox");
    }

    #[test]
    fn test_missing_cookie_template_is_a_config_error() {
        let kind = CategoryKind::Cookie {
            template: "generic".to_string(),
        };
        let err = base().with_category(&Settings::default(), &kind).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownCookieTemplate(_)));
    }

    #[test]
    fn test_extra_args_append_verbatim_at_the_end() {
        let kind = CategoryKind::Extra {
            args: vec!["--limit-rate".to_string(), "500K".to_string()],
        };
        let args = base()
            .with_category(&Settings::default(), &kind)
            .unwrap()
            .to_args();
        assert_eq!(args[args.len() - 2..], ["--limit-rate", "500K"]);
    }
}
