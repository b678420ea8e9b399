pub mod webdriver;

use crate::config::CleanupPolicy;
use crate::error::Result;
use crate::results::{CookieRecord, RenderedPage};
use std::time::Duration;

pub use webdriver::WebDriverSession;

/// A browser session that renders one page.
///
/// Implementations own the browser for the duration of a single run and are
/// consumed by either `close` or `leave_open`.
#[allow(async_fn_in_trait)]
pub trait BrowserSession {
    /// Navigate to `url` and block until the document body is present or
    /// `wait` elapses
    async fn render(&mut self, url: &str, wait: Duration) -> Result<RenderedPage>;

    /// Cookies visible to the current browsing context
    async fn cookies(&mut self) -> Result<Vec<CookieRecord>>;

    /// Shut the browser down
    async fn close(self) -> Result<()>;

    /// Release the session without shutting the browser down
    async fn leave_open(self) -> Result<()>;
}

/// What happened to the session at the end of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    Closed,
    LeftOpen,
}

/// Reads the session's cookies; a failure degrades to an empty list
pub async fn collect_cookies<S: BrowserSession>(session: &mut S) -> Vec<CookieRecord> {
    match session.cookies().await {
        Ok(cookies) => {
            ::log::debug!("Collected {} cookies", cookies.len());
            cookies
        }
        Err(e) => {
            ::log::warn!("Failed to read cookies: {}", e);
            Vec::new()
        }
    }
}

/// Closes or keeps the session according to `policy` and the run outcome
pub async fn finish<S: BrowserSession>(
    session: S,
    policy: CleanupPolicy,
    succeeded: bool,
) -> Teardown {
    if policy.should_close(succeeded) {
        ::log::info!("Closing browser session");
        if let Err(e) = session.close().await {
            ::log::warn!("Failed to close browser session: {}", e);
        }
        Teardown::Closed
    } else {
        ::log::warn!("Render failed, leaving the browser open for inspection");
        if let Err(e) = session.leave_open().await {
            ::log::warn!("Failed to keep browser session alive: {}", e);
        }
        Teardown::LeftOpen
    }
}
