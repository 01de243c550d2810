//! The acquisition dispatcher.
//!
//! Loads nothing itself: it borrows the already-loaded [`Settings`], validates
//! the ffmpeg directory up front, classifies the requested URLs and drives the
//! fetch engine once per non-empty group. One group failing is logged (and
//! appended to the error-log file when one is configured) without stopping the
//! groups after it.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use tracing::{error, info, warn};

use vidvault_core::{ConfigError, Settings};

use crate::category::{category_rules, classify, CategoryRule};
use crate::engine::FetchEngine;
use crate::error::FetchError;
use crate::options::FetchOptions;

/// Where fetched files end up after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Leave files under the storage root.
    Local,
    Onedrive,
    ThreeB,
}

impl Destination {
    /// Post-run step. Only `Local` does anything today, by doing nothing;
    /// the remote targets are declared but unbuilt.
    pub fn finalize(self) {
        match self {
            Destination::Local => {}
            Destination::Onedrive => warn!("onedrive transfer not implemented yet"),
            Destination::ThreeB => warn!("3b transfer not implemented yet"),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Destination::Local => "local",
            Destination::Onedrive => "onedrive",
            Destination::ThreeB => "3b",
        };
        f.write_str(tag)
    }
}

/// One line of a dry run: what would be fetched, and to where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub url: String,
    pub output_path: PathBuf,
    pub destination: Destination,
}

/// Result of one category group's engine invocation.
#[derive(Debug)]
pub struct GroupOutcome {
    pub category: String,
    pub urls: Vec<String>,
    pub outcome: Result<(), FetchError>,
}

#[derive(Debug)]
pub struct Dispatcher<'a> {
    settings: &'a Settings,
    rules: Vec<CategoryRule>,
    ffmpeg_dir: PathBuf,
}

impl<'a> Dispatcher<'a> {
    /// Fails when `ffmpeg_dir` is unset or does not hold exactly the expected
    /// tools. Dry runs go through here too, so a broken environment surfaces
    /// before anyone trusts a plan.
    pub fn new(settings: &'a Settings) -> Result<Self, ConfigError> {
        let ffmpeg_dir = settings.require_ffmpeg_dir()?.to_path_buf();
        Ok(Self {
            settings,
            rules: category_rules(settings),
            ffmpeg_dir,
        })
    }

    /// The dry-run view: every URL with its would-be output location. No
    /// classification, no engine, no side effects.
    pub fn plan(&self, urls: &[String], destination: Destination) -> Vec<PlanEntry> {
        urls.iter()
            .map(|url| PlanEntry {
                url: url.clone(),
                output_path: self.settings.storage_root.clone(),
                destination,
            })
            .collect()
    }

    /// Fetches every group in category order, standard last. Group failures
    /// are recorded in the returned outcomes; only a broken engine (preflight)
    /// or unresolvable configuration aborts the run.
    #[tracing::instrument(skip_all, fields(urls = urls.len(), destination = %destination))]
    pub async fn run(
        &self,
        engine: &dyn FetchEngine,
        urls: &[String],
        destination: Destination,
    ) -> Result<Vec<GroupOutcome>, FetchError> {
        let groups = classify(urls, &self.rules);
        if groups.is_empty() {
            info!("no urls to fetch");
            return Ok(Vec::new());
        }

        engine.ensure_available().await?;

        let mut outcomes = Vec::with_capacity(groups.len());
        for group in groups {
            let options = FetchOptions::new(&self.settings.storage_root, &self.ffmpeg_dir)
                .with_category(self.settings, &group.kind)?;

            info!(category = %group.name, urls = group.urls.len(), "fetching group");
            let outcome = engine.fetch(&group.urls, &options).await;
            if let Err(err) = &outcome {
                error!(category = %group.name, error = %err, "fetch group failed");
                self.append_error_log(&format!("{} group failed: {err}", group.name));
            }

            outcomes.push(GroupOutcome {
                category: group.name,
                urls: group.urls,
                outcome,
            });
        }

        destination.finalize();
        Ok(outcomes)
    }

    /// One timestamped line per failure. Diagnostics must not break the
    /// pipeline, so append problems are only logged.
    fn append_error_log(&self, message: &str) {
        let Some(path) = &self.settings.error_log else {
            return;
        };
        let line = format!(
            "{} - {message}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f")
        );
        let appended = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(line.as_bytes()));
        if let Err(err) = appended {
            warn!(path = %path.display(), error = %err, "could not append to error log");
        }
    }
}
