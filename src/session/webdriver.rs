use crate::error::{ReportError, Result};
use crate::results::{CookieRecord, RenderedPage};
use crate::session::BrowserSession;
use crate::utils::secs2;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::wd::{Capabilities, TimeoutConfiguration};
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::{Duration, Instant};
use url::Url;

/// Desktop Chrome user agent sent by every session
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Local endpoints tried when the configured WebDriver refuses a session
const FALLBACK_WEBDRIVER_URLS: [&str; 2] = [
    "http://localhost:9515", // ChromeDriver default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// A Chrome session driven over WebDriver
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Opens a new session on `webdriver_url`, falling back to the usual
    /// local endpoints if that one refuses
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self> {
        let caps = chrome_capabilities(headless);
        ::log::info!(
            "Starting browser session via {} (headless: {})",
            webdriver_url,
            headless
        );

        let mut builder = ClientBuilder::native();
        builder.capabilities(caps);

        let first_error = match builder.connect(webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", webdriver_url);
                return Ok(Self { client });
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    webdriver_url,
                    e
                );
                e
            }
        };

        for url in FALLBACK_WEBDRIVER_URLS.iter() {
            if *url == webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = builder.connect(url).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(Self { client });
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(first_error.into())
    }
}

impl BrowserSession for WebDriverSession {
    async fn render(&mut self, url: &str, wait: Duration) -> Result<RenderedPage> {
        Url::parse(url).map_err(|e| ReportError::Unexpected(format!("invalid URL {}: {}", url, e)))?;

        // Bound navigation by the same wait as the body check
        self.client
            .update_timeouts(TimeoutConfiguration::new(None, Some(wait), None))
            .await
            .map_err(|e| classify_cmd_error(e, "setting timeouts for", url, wait))?;

        let start = Instant::now();
        ::log::info!("Navigating to {}", url);
        self.client
            .goto(url)
            .await
            .map_err(|e| classify_cmd_error(e, "navigating to", url, wait))?;

        ::log::info!("Waiting up to {}s for the page body", wait.as_secs());
        self.client
            .wait()
            .at_most(wait)
            .for_element(Locator::Css("body"))
            .await
            .map_err(|e| classify_cmd_error(e, "waiting for", url, wait))?;
        let load_seconds = secs2(start.elapsed());
        ::log::info!("Page ready after {:.2} seconds", load_seconds);

        let markup = self
            .client
            .source()
            .await
            .map_err(|e| classify_cmd_error(e, "getting source for", url, wait))?;

        Ok(RenderedPage::new(markup, load_seconds))
    }

    async fn cookies(&mut self) -> Result<Vec<CookieRecord>> {
        let cookies = self
            .client
            .get_all_cookies()
            .await
            .map_err(|e| ReportError::Driver(e.to_string()))?;
        Ok(cookies.iter().map(CookieRecord::from).collect())
    }

    async fn close(self) -> Result<()> {
        self.client
            .close()
            .await
            .map_err(|e| ReportError::Driver(e.to_string()))
    }

    async fn leave_open(self) -> Result<()> {
        // A persisted session survives the client being dropped
        self.client
            .persist()
            .await
            .map_err(|e| ReportError::Driver(e.to_string()))
    }
}

/// Chrome capabilities: optional headless mode, no sandbox, fixed user agent
fn chrome_capabilities(headless: bool) -> Capabilities {
    let mut args = Vec::new();
    if headless {
        args.push("--headless".to_string());
    }
    args.push("--no-sandbox".to_string());
    args.push("--disable-dev-shm-usage".to_string());
    args.push(format!("--user-agent={}", USER_AGENT));

    let mut caps = Capabilities::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}

/// Maps a WebDriver command failure onto the report error taxonomy
fn classify_cmd_error(error: CmdError, context: &str, url: &str, wait: Duration) -> ReportError {
    match error {
        CmdError::WaitTimeout => render_timeout(context, url, wait),
        CmdError::Standard(ref e) if matches!(e.error, ErrorStatus::Timeout) => {
            render_timeout(context, url, wait)
        }
        other => {
            if other.to_string().contains("Unable to find session") {
                ::log::warn!("Lost session while {} {}", context, url);
            } else {
                ::log::error!("Failed {} {}: {}", context, url, other);
            }
            ReportError::Driver(other.to_string())
        }
    }
}

fn render_timeout(context: &str, url: &str, wait: Duration) -> ReportError {
    ::log::error!(
        "Timed out after {}s {} {}",
        wait.as_secs(),
        context,
        url
    );
    ReportError::RenderTimeout {
        seconds: wait.as_secs(),
    }
}
