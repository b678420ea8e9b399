use clap::Parser;
use page_report::{CleanupPolicy, PageReport, ReportConfig, ReportError};
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    ::log::info!("Building report for URL: {}", config.url);
    let wait_seconds = config.wait_seconds;
    let cleanup = config.cleanup;
    let start_time = std::time::Instant::now();

    let mut builder = PageReport::new(&config.url).with_config(config);
    if let Some(webdriver_url) = &args.webdriver_url {
        builder = builder.with_webdriver_url(webdriver_url);
    }

    match builder.generate().await {
        Ok(path) => {
            ::log::info!(
                "Report complete in {:.2} seconds",
                start_time.elapsed().as_secs_f64()
            );
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            report_failure(&e, wait_seconds, cleanup);
            ExitCode::FAILURE
        }
    }
}

/// Merges the optional config file and the command line. The WebDriver URL
/// is resolved by the library, after WEBDRIVER_URL.
fn load_config(args: &Args) -> Result<ReportConfig, ReportError> {
    let mut config = match &args.config {
        Some(path) => ReportConfig::from_file(path)?,
        None => ReportConfig::new(&args.url),
    };

    config.url = args.url.clone();
    if let Some(output) = &args.output {
        config.output_filename = Some(output.clone());
    }
    if let Some(headless) = args.headless {
        config.headless = headless;
    }
    if let Some(wait) = args.wait {
        config.wait_seconds = wait;
    }
    if let Some(probe_timeout) = args.probe_timeout {
        config.probe_timeout_secs = probe_timeout;
    }
    if let Some(cleanup) = args.cleanup {
        config.cleanup = cleanup.into();
    }

    Ok(config)
}

fn report_failure(error: &ReportError, wait: u64, cleanup: CleanupPolicy) {
    ::log::error!("Report failed ({}): {}", error.kind(), error);
    if error.is_render_failure() && !cleanup.should_close(false) {
        ::log::warn!("The browser session was left open for inspection");
    }
    match error {
        ReportError::RenderTimeout { .. } => ::log::error!(
            "The page did not load within {} seconds; check the network or raise --wait",
            wait
        ),
        ReportError::Driver(_) => ::log::error!(
            "Check that the WebDriver server is running and matches the installed browser version"
        ),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    fn config_file(name: &str, json: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.json", name, std::process::id()));
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_cli_can_disable_headless_from_config() {
        let path = config_file(
            "page-report-headless-off",
            r#"{"url": "https://ignored.example", "headless": true, "wait_seconds": 30}"#,
        );
        let args = parse(&[
            "page-report",
            "--headless=false",
            "-c",
            path.to_str().unwrap(),
            "https://example.com",
        ]);
        let config = load_config(&args).unwrap();
        assert!(!config.headless);
        assert_eq!(config.wait_seconds, 30);
        assert_eq!(config.url, "https://example.com");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_config_headless_kept_without_flag() {
        let path = config_file(
            "page-report-headless-kept",
            r#"{"url": "https://example.com", "headless": true}"#,
        );
        let args = parse(&["page-report", "-c", path.to_str().unwrap(), "https://example.com"]);
        assert!(load_config(&args).unwrap().headless);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_bare_headless_flag_enables() {
        let args = parse(&["page-report", "--headless", "https://example.com"]);
        assert_eq!(args.headless, Some(true));
        assert!(load_config(&args).unwrap().headless);
    }
}
