use clap::{Parser, ValueEnum};
use page_report::CleanupPolicy;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page-report")]
#[command(about = "Renders a web page in a browser and writes a descriptive report of it")]
#[command(version)]
pub struct Args {
    /// URL of the page to report on
    pub url: String,

    /// Report file name, relative to the current directory
    /// (derived from the URL when omitted)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Run the browser without a visible window; `--headless=false` turns off
    /// a headless setting from the config file
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub headless: Option<bool>,

    /// Seconds to wait for the page body to appear [default: 15]
    #[arg(short, long)]
    pub wait: Option<u64>,

    /// Timeout in seconds for the plain HTTP probe [default: 10]
    #[arg(long)]
    pub probe_timeout: Option<u64>,

    /// WebDriver server URL (defaults to WEBDRIVER_URL or http://localhost:4444)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// When to close the browser session [default: on-success-only]
    #[arg(long, value_enum)]
    pub cleanup: Option<CleanupArg>,

    /// JSON configuration file; command-line flags override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CleanupArg {
    /// Leave the browser open when rendering fails
    OnSuccessOnly,
    /// Always close the browser
    Always,
}

impl From<CleanupArg> for CleanupPolicy {
    fn from(arg: CleanupArg) -> Self {
        match arg {
            CleanupArg::OnSuccessOnly => CleanupPolicy::OnSuccessOnly,
            CleanupArg::Always => CleanupPolicy::Always,
        }
    }
}
