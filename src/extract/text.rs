use scraper::ElementRef;

/// Marker appended to text cut at its length limit
pub const ELLIPSIS: &str = "...";

/// Collapses runs of whitespace into a single space and trims both ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text content of an element, whitespace normalized
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Cuts `text` to `limit` characters, appending an ellipsis only when
/// something was cut off
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], ELLIPSIS),
        None => text.to_string(),
    }
}
