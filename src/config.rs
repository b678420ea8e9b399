use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// What to do with the browser session once a run finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CleanupPolicy {
    /// Close the session after a successful render, leave it open after a
    /// failure so the page can be inspected by hand
    #[default]
    OnSuccessOnly,
    /// Close the session whatever the outcome
    Always,
}

impl CleanupPolicy {
    /// Whether the session should be closed given the run outcome
    pub fn should_close(&self, succeeded: bool) -> bool {
        match self {
            CleanupPolicy::OnSuccessOnly => succeeded,
            CleanupPolicy::Always => true,
        }
    }
}

/// Configuration for one report run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Page to report on
    pub url: String,

    /// File name of the report, relative to the current directory
    #[serde(default)]
    pub output_filename: Option<String>,

    /// Run the browser without a window
    #[serde(default)]
    pub headless: bool,

    /// How long to wait for the document body to appear
    #[serde(default = "default_wait_seconds")]
    pub wait_seconds: u64,

    /// Timeout for the plain HTTP probe
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Session cleanup rule
    #[serde(default)]
    pub cleanup: CleanupPolicy,
}

/// Environment variable overriding the WebDriver URL
pub const WEBDRIVER_URL_ENV: &str = "WEBDRIVER_URL";

/// Default value for wait_seconds
fn default_wait_seconds() -> u64 {
    15
}

/// Default value for probe_timeout_secs
fn default_probe_timeout_secs() -> u64 {
    10
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

impl ReportConfig {
    /// Create a new configuration with default values
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            output_filename: None,
            headless: false,
            wait_seconds: default_wait_seconds(),
            probe_timeout_secs: default_probe_timeout_secs(),
            webdriver_url: default_webdriver_url(),
            cleanup: CleanupPolicy::default(),
        }
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)
            .map_err(|e| ReportError::Config(format!("{}: {}", path.display(), e)))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ReportError::Config(format!("{}: {}", path.display(), e)))?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ReportError::Config(e.to_string()))
    }

    /// Report file name, derived from the URL when none was given
    pub fn output_filename(&self) -> String {
        match &self.output_filename {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("{}.txt", crate::utils::sanitize_filename(&self.url)),
        }
    }

    pub fn wait_duration(&self) -> Duration {
        Duration::from_secs(self.wait_seconds)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Replace the WebDriver URL with `webdriver_url` unless it is empty
    pub fn override_webdriver_url(&mut self, webdriver_url: Option<String>) {
        if let Some(webdriver_url) = webdriver_url.filter(|u| !u.is_empty()) {
            self.webdriver_url = webdriver_url;
        }
    }
}
