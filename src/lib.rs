pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod probe;
pub mod report;
pub mod results;
pub mod session;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{CleanupPolicy, ReportConfig};
pub use error::{ReportError, Result};
pub use pipeline::PageReport;
pub use probe::TimingSample;
pub use report::{Report, Section};
pub use results::{CookieRecord, RenderedPage};
pub use session::{BrowserSession, Teardown, WebDriverSession};
