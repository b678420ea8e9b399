use serde::{Deserialize, Serialize};

/// Markup of a page after the browser finished rendering it
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    /// Serialized DOM as reported by the browser
    pub markup: String,

    /// Seconds from navigation start until the body appeared, two decimals
    pub load_seconds: f64,
}

impl RenderedPage {
    pub fn new(markup: String, load_seconds: f64) -> Self {
        Self {
            markup,
            load_seconds,
        }
    }
}

/// A cookie visible to the browsing context, in WebDriver's field layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
    /// Expiry as a unix timestamp, None for session cookies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

impl From<&fantoccini::cookies::Cookie<'_>> for CookieRecord {
    fn from(cookie: &fantoccini::cookies::Cookie<'_>) -> Self {
        Self {
            name: cookie.name().to_string(),
            value: cookie.value().to_string(),
            domain: cookie.domain().map(str::to_string),
            path: cookie.path().map(str::to_string),
            secure: cookie.secure().unwrap_or(false),
            http_only: cookie.http_only().unwrap_or(false),
            expiry: cookie
                .expires()
                .and_then(|e| e.datetime())
                .map(|dt| dt.unix_timestamp()),
            same_site: cookie.same_site().map(|s| s.to_string()),
        }
    }
}
