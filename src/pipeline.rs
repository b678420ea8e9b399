use crate::config::{CleanupPolicy, ReportConfig, WEBDRIVER_URL_ENV};
use crate::error::{ReportError, Result};
use crate::extract;
use crate::probe::{self, TimingSample};
use crate::report::{self, Report};
use crate::session::{self, BrowserSession, WebDriverSession};
use std::path::{Path, PathBuf};

/// Builder for one page report run
pub struct PageReport {
    config: ReportConfig,
    /// Set by `with_webdriver_url`; the environment no longer overrides it
    webdriver_url_pinned: bool,
}

impl PageReport {
    /// Create a new report builder for `url` with default settings
    pub fn new(url: &str) -> Self {
        Self {
            config: ReportConfig::new(url),
            webdriver_url_pinned: false,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self.webdriver_url_pinned = false;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let config = ReportConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Apply configuration from a JSON string
    pub fn with_config_str(self, json: &str) -> Result<Self> {
        let config = ReportConfig::from_json(json)?;
        Ok(self.with_config(config))
    }

    pub fn with_output_filename(mut self, filename: &str) -> Self {
        self.config.output_filename = Some(filename.to_string());
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Set how long to wait for the page body
    pub fn with_wait_seconds(mut self, seconds: u64) -> Self {
        self.config.wait_seconds = seconds;
        self
    }

    /// Set the timeout of the plain HTTP probe
    pub fn with_probe_timeout(mut self, seconds: u64) -> Self {
        self.config.probe_timeout_secs = seconds;
        self
    }

    pub fn with_cleanup_policy(mut self, policy: CleanupPolicy) -> Self {
        self.config.cleanup = policy;
        self
    }

    /// Use this WebDriver URL even when WEBDRIVER_URL is set
    pub fn with_webdriver_url(mut self, url: &str) -> Self {
        self.config.webdriver_url = url.to_string();
        self.webdriver_url_pinned = true;
        self
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Probe, render in a new WebDriver session, extract and write the
    /// report. Returns the path written.
    pub async fn generate(mut self) -> Result<PathBuf> {
        self.validate()?;
        self.apply_env_override(std::env::var(WEBDRIVER_URL_ENV).ok());
        let sample = probe::probe(&self.config.url, self.config.probe_timeout()).await;
        let session =
            WebDriverSession::connect(&self.config.webdriver_url, self.config.headless).await?;
        let report = self.build_report(sample, session).await?;
        self.write(&report)
    }

    /// Same as `generate`, rendering with the given session
    pub async fn generate_with_session<S: BrowserSession>(self, session: S) -> Result<PathBuf> {
        self.validate()?;
        let sample = probe::probe(&self.config.url, self.config.probe_timeout()).await;
        let report = self.build_report(sample, session).await?;
        self.write(&report)
    }

    /// Renders the page, collects cookies, tears the session down per the
    /// cleanup policy and assembles the report. Nothing is written.
    pub async fn build_report<S: BrowserSession>(
        &self,
        sample: TimingSample,
        mut session: S,
    ) -> Result<Report> {
        let url = &self.config.url;
        let page = match session.render(url, self.config.wait_duration()).await {
            Ok(page) => page,
            Err(e) => {
                ::log::error!("Rendering {} failed ({}): {}", url, e.kind(), e);
                session::finish(session, self.config.cleanup, false).await;
                return Err(e);
            }
        };

        let cookies = session::collect_cookies(&mut session).await;
        session::finish(session, self.config.cleanup, true).await;

        let fields = extract::extract(&page.markup);
        Ok(report::build(url, &sample, &page, &fields, &cookies))
    }

    fn write(&self, report: &Report) -> Result<PathBuf> {
        let path = report::output_path(&self.config.output_filename())?;
        report.write(&path)?;
        Ok(path)
    }

    fn apply_env_override(&mut self, webdriver_url: Option<String>) {
        if !self.webdriver_url_pinned {
            self.config.override_webdriver_url(webdriver_url);
        }
    }

    fn validate(&self) -> Result<()> {
        if self.config.url.trim().is_empty() {
            return Err(ReportError::Config("url must not be empty".to_string()));
        }
        Ok(())
    }
}
