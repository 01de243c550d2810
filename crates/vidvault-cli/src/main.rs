//! VidVault CLI.
//!
//! `vidvault dl` classifies URLs and drives yt-dlp; `vidvault data` imports,
//! searches, and summarizes the catalog. Settings load from a JSON file
//! (--settings, VIDVAULT_SETTINGS, or ./secrets/appsettings.json).

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use tracing::warn;

use vidvault_catalog::{CatalogStore, Importer};
use vidvault_cli::{init_tracing, megabytes, truncate_string};
use vidvault_core::{CatalogRecord, CatalogStats, Settings};
use vidvault_fetch::{Destination, Dispatcher, YtDlpEngine};
use vidvault_probe::FfprobeProber;

#[derive(Parser)]
#[command(name = "vidvault", about = "CLI for handling video downloads and storing")]
struct Cli {
    /// Settings file (default: VIDVAULT_SETTINGS or ./secrets/appsettings.json)
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download videos from the given URL(s)
    Dl {
        /// URL of the video to download
        #[arg(short, long, num_args(1..), required = true)]
        urls: Vec<String>,
        /// Where the downloaded files end up
        #[arg(short, long, value_enum, default_value_t = OutputArg::Local)]
        output: OutputArg,
        /// Show what would be fetched without invoking the engine
        #[arg(short, long)]
        test: bool,
    },
    /// Manage video data after download
    Data {
        /// Import video files or directories into the catalog
        #[arg(short, long, num_args(1..), value_name = "PATH")]
        import: Vec<PathBuf>,
        /// Privacy level for imported videos (1-3)
        #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(i32).range(1..=3))]
        privacy: i32,
        /// Search for a video by name, accepts * as wildcard
        #[arg(short, long)]
        search: Option<String>,
        /// Check whether each video is on disk under the storage root
        #[arg(short, long)]
        disk: bool,
        /// Show statistics of tracked videos
        #[arg(long)]
        stats: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputArg {
    Local,
    Onedrive,
    #[value(name = "3b")]
    ThreeB,
}

impl From<OutputArg> for Destination {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Local => Destination::Local,
            OutputArg::Onedrive => Destination::Onedrive,
            OutputArg::ThreeB => Destination::ThreeB,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let settings_path = Settings::resolve_path(cli.settings.as_deref());
    let settings = Settings::load(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;

    match cli.command {
        Commands::Dl { urls, output, test } => run_dl(&settings, &urls, output.into(), test).await,
        Commands::Data {
            import,
            privacy,
            search,
            disk,
            stats,
        } => run_data(&settings, &import, privacy, search.as_deref(), disk, stats).await,
    }
}

async fn run_dl(
    settings: &Settings,
    urls: &[String],
    destination: Destination,
    test: bool,
) -> anyhow::Result<()> {
    let dispatcher = Dispatcher::new(settings).context("Failed to prepare acquisition")?;

    if test {
        for entry in dispatcher.plan(urls, destination) {
            println!(
                "url={} --- output_path={}",
                entry.url,
                entry.output_path.display()
            );
        }
        println!("output_option={destination}");
        return Ok(());
    }

    let engine = YtDlpEngine::new(&settings.fetch_tool);
    let outcomes = dispatcher.run(&engine, urls, destination).await?;

    let failed = outcomes.iter().filter(|o| o.outcome.is_err()).count();
    if failed > 0 {
        println!("Finished: {failed} of {} groups failed.", outcomes.len());
    } else {
        println!("Finished.");
    }
    Ok(())
}

async fn run_data(
    settings: &Settings,
    import: &[PathBuf],
    privacy: i32,
    search: Option<&str>,
    disk: bool,
    stats: bool,
) -> anyhow::Result<()> {
    if !import.is_empty() {
        let store = connect_store(settings).await?;
        let prober = FfprobeProber::new(&settings.ffprobe_path);
        let importer = Importer::new(&store, &prober, settings.duration_rule());
        for path in import {
            let report = importer
                .import(path, privacy)
                .await
                .with_context(|| format!("Failed to import {}", path.display()))?;
            println!("{report}");
        }
        return Ok(());
    }

    if let Some(query) = search {
        let store = connect_store(settings).await?;
        let terms: Vec<String> = query.split_whitespace().map(str::to_string).collect();
        let records = store.search(&terms).await?;
        print_search_results(&records, disk.then(|| settings.storage_root.as_path()));
        return Ok(());
    }

    if stats {
        let store = connect_store(settings).await?;
        let stats = store.stats().await?;
        print_stats(&stats);
        return Ok(());
    }

    if disk {
        // No search terms: disk-presence report over the whole catalog.
        let store = connect_store(settings).await?;
        let records = store.search(&[]).await?;
        print_search_results(&records, Some(settings.storage_root.as_path()));
        return Ok(());
    }

    let mut command = Cli::command();
    if let Some(sub) = command.find_subcommand_mut("data") {
        sub.print_help()?;
    }
    Ok(())
}

async fn connect_store(settings: &Settings) -> anyhow::Result<CatalogStore> {
    if !settings.persists_catalog() {
        warn!("no connection_string configured; catalog is in-memory and discarded on exit");
    }
    CatalogStore::connect(settings.connection_descriptor())
        .await
        .context("Failed to open catalog store")
}

fn print_search_results(records: &[CatalogRecord], disk_root: Option<&Path>) {
    println!("\n=== Catalog Search ===\n");

    if records.is_empty() {
        println!("No videos found.");
        return;
    }

    if disk_root.is_some() {
        println!(
            "{:>6} {:<40} {:>10} {:>10} {:>8} {:>8}",
            "ID", "Name", "Size (MB)", "Duration", "Privacy", "On Disk"
        );
    } else {
        println!(
            "{:>6} {:<40} {:>10} {:>10} {:>8}",
            "ID", "Name", "Size (MB)", "Duration", "Privacy"
        );
    }
    println!("{}", "-".repeat(90));

    for record in records {
        let id = record.id.map_or("-".to_string(), |id| id.to_string());
        let name = truncate_string(&record.normalized_name, 40);
        let duration = record.duration_seconds.unwrap_or(0.0);
        if let Some(root) = disk_root {
            let on_disk = if root.join(&record.storage_key).exists() {
                "yes"
            } else {
                "no"
            };
            println!(
                "{:>6} {:<40} {:>10.2} {:>10.2} {:>8} {:>8}",
                id,
                name,
                megabytes(record.size_bytes),
                duration,
                record.privacy_level,
                on_disk
            );
        } else {
            println!(
                "{:>6} {:<40} {:>10.2} {:>10.2} {:>8}",
                id,
                name,
                megabytes(record.size_bytes),
                duration,
                record.privacy_level
            );
        }
    }

    println!("\nTotal: {} videos", records.len());
}

fn print_stats(stats: &CatalogStats) {
    println!("\n=== Catalog Statistics ===\n");
    println!("Total videos:   {}", stats.total);
    println!("Uploaded:       {}", stats.uploaded);
    println!(
        "Total size:     {:.2} MB ({} bytes)",
        megabytes(stats.total_size_bytes),
        stats.total_size_bytes
    );
    println!("Total duration: {:.2}", stats.total_duration);
    println!();
}
