use std::time::Duration;

/// Convert a URL to a sanitized filename stem
pub fn sanitize_filename(url: &str) -> String {
    // Remove protocol and replace invalid filename characters
    let mut name = url.replace("http://", "").replace("https://", "");
    name = name.replace(['/', ':', '?', '&', '=', '#', '%', '\\', '*', '"', '<', '>', '|'], "_");
    let name = name.trim_matches('_');

    if name.is_empty() {
        return "page".to_string();
    }

    // Limit filename length
    name.chars().take(100).collect()
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Elapsed time in milliseconds, two decimals
pub fn millis2(elapsed: Duration) -> f64 {
    round2(elapsed.as_secs_f64() * 1000.0)
}

/// Elapsed time in seconds, two decimals
pub fn secs2(elapsed: Duration) -> f64 {
    round2(elapsed.as_secs_f64())
}
