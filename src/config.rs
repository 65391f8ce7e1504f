use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crate::data::loader::{DirectoryResolver, SnapshotResolver};
use crate::data::model::TimeWindow;
use crate::data::sample;

#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Browse interview problems by lookback window, with search, filter and sorting."
)]
pub struct Cli {
    /// directory holding the 30days / 3months / 6months snapshots (.json, .csv or .parquet)
    #[clap(short = 'd', long, env = "PROBLEM_BROWSER_DATA", default_value = "data")]
    pub data_dir: PathBuf,

    /// time window to open with: 30, 90 or 180 (anything else shows the 6-month snapshot)
    #[clap(short = 'w', long, default_value = "30")]
    pub window: String,

    /// serve the built-in demo snapshots instead of reading --data-dir
    #[clap(long)]
    pub demo: bool,
}

/// Where snapshots come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Directory(PathBuf),
    Demo,
}

/// Startup settings. Nothing here is written back to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    pub source: DataSource,
    pub initial_window: TimeWindow,
}

impl From<Cli> for BrowserConfig {
    fn from(cli: Cli) -> Self {
        let source = if cli.demo {
            DataSource::Demo
        } else {
            DataSource::Directory(cli.data_dir)
        };
        BrowserConfig {
            source,
            initial_window: TimeWindow::parse(&cli.window),
        }
    }
}

impl BrowserConfig {
    pub fn resolver(&self) -> Arc<dyn SnapshotResolver> {
        match &self.source {
            DataSource::Directory(dir) => Arc::new(DirectoryResolver::new(dir.clone())),
            DataSource::Demo => Arc::new(sample::demo_resolver()),
        }
    }

    /// Short description for the status bar.
    pub fn source_label(&self) -> String {
        match &self.source {
            DataSource::Directory(dir) => dir.display().to_string(),
            DataSource::Demo => "built-in demo data".to_string(),
        }
    }
}
