use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a report run
#[derive(Error, Debug)]
pub enum ReportError {
    /// The document body never appeared within the wait bound
    #[error("page did not become ready within {seconds} seconds")]
    RenderTimeout { seconds: u64 },

    /// The WebDriver layer failed (no session, lost session, protocol error)
    #[error("webdriver error: {0}")]
    Driver(String),

    /// Anything else that went wrong while rendering
    #[error("unexpected error: {0}")]
    Unexpected(String),

    /// The report file could not be written
    #[error("failed to write report to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be read or parsed
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;

impl ReportError {
    /// Short machine-friendly tag for the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::RenderTimeout { .. } => "render_timeout",
            ReportError::Driver(_) => "driver_error",
            ReportError::Unexpected(_) => "unexpected_error",
            ReportError::Io { .. } => "io_error",
            ReportError::Config(_) => "config_error",
        }
    }

    /// Whether the failure happened while a browser session was in use
    pub fn is_render_failure(&self) -> bool {
        matches!(
            self,
            ReportError::RenderTimeout { .. } | ReportError::Driver(_) | ReportError::Unexpected(_)
        )
    }
}

impl From<fantoccini::error::NewSessionError> for ReportError {
    fn from(err: fantoccini::error::NewSessionError) -> Self {
        ReportError::Driver(err.to_string())
    }
}
