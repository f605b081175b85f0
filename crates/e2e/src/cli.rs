//! Command line of the e2e test binary
//!
//! cargo hands libtest's own arguments (filters, `--nocapture`, ...) to every
//! test target, including this one. They are ignored unless a live run was
//! asked for.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::error::ErrorKind;
use clap::Parser;

use crate::playwright::{Browser, PlaywrightConfig};
use crate::runner::RunnerConfig;

const LIVE_ENV: &str = "STORECHECK_LIVE";

#[derive(Parser, Debug)]
#[command(name = "storecheck-e2e")]
#[command(about = "Purchase funnel checks for the storefront")]
pub struct RunArgs {
    /// Walk the funnel against the live store
    #[arg(long, env = "STORECHECK_LIVE")]
    pub live: bool,

    /// Path to store definitions directory
    #[arg(short, long, default_value = "tests/stores")]
    pub stores: PathBuf,

    /// Run only stores matching this tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Run only a specific store by name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Date to prorate prices to (YYYY-MM-DD, default: today)
    #[arg(long, env = "STORECHECK_REFERENCE_DATE")]
    pub reference_date: Option<NaiveDate>,

    /// Browser to use (chromium, firefox, webkit)
    #[arg(long, default_value = "chromium")]
    pub browser: String,

    /// Run in headless mode
    #[arg(long, default_value = "true")]
    pub headless: bool,

    /// Viewport width
    #[arg(long, default_value = "1280")]
    pub viewport_width: u32,

    /// Viewport height
    #[arg(long, default_value = "720")]
    pub viewport_height: u32,

    /// Per-action timeout in milliseconds
    #[arg(long, default_value = "5000")]
    pub action_timeout_ms: u64,

    /// Per-scenario timeout in milliseconds
    #[arg(long, default_value = "30000")]
    pub timeout_ms: u64,

    /// node_modules directory containing playwright
    #[arg(long, env = "STORECHECK_NODE_MODULES")]
    pub node_modules: Option<PathBuf>,

    /// Output directory for results
    #[arg(short, long, default_value = "test-results")]
    pub output: PathBuf,
}

impl RunArgs {
    /// Parse the test binary's arguments.
    ///
    /// `Ok(None)` means no live run was requested and the binary should exit
    /// quietly, whatever else is on the command line.
    pub fn from_harness_args<I, T>(args: I) -> Result<Option<Self>, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

        match Self::try_parse_from(args.iter().cloned()) {
            Ok(parsed) if parsed.live => Ok(Some(parsed)),
            Ok(_) => Ok(None),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => Err(e),
            Err(e) if live_requested(&args) => Err(e),
            Err(_) => Ok(None),
        }
    }

    pub fn browser(&self) -> Browser {
        match self.browser.as_str() {
            "firefox" => Browser::Firefox,
            "webkit" => Browser::Webkit,
            _ => Browser::Chromium,
        }
    }

    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            playwright: PlaywrightConfig {
                browser: self.browser(),
                headless: self.headless,
                viewport_width: self.viewport_width,
                viewport_height: self.viewport_height,
                action_timeout: Duration::from_millis(self.action_timeout_ms),
                node_modules: self.node_modules.clone(),
                ..Default::default()
            },
            stores_dir: self.stores.clone(),
            output_dir: self.output.clone(),
            scenario_timeout: Duration::from_millis(self.timeout_ms),
            reference_date: self.reference_date,
        }
    }
}

fn live_requested(args: &[OsString]) -> bool {
    let flag = args.iter().any(|arg| arg == "--live" || arg.to_string_lossy().starts_with("--live="));
    let env = std::env::var(LIVE_ENV)
        .map(|value| matches!(value.as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false);
    flag || env
}
