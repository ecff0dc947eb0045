//! Small helpers shared across the runtime.
//!
//! - Log-friendly truncation of headlines and article bodies
//! - CSS number formatting for computed style values
//! - Reading-progress arithmetic for the scroll indicator

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the bytes dropped. Cutting happens on character boundaries, so headlines
/// with accented or non-Latin text are safe.
///
/// # Examples
///
/// ```
/// use eden_newsdesk::utils::truncate_for_log;
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("Yaoundé", 6), "Yaound…(+2 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Format a number the way a browser stringifies it into a style value.
///
/// Negative zero prints as `0`, whole numbers carry no decimal point, and
/// other values use the shortest round-trip representation.
pub fn css_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

/// Scroll position as a percentage of the scrollable range.
///
/// `max_scroll` is document height minus viewport height. A document that
/// fits in the viewport has nothing to scroll and reads as 0%. The result
/// is clamped to `[0, 100]` so overscroll never leaks out.
pub fn reading_progress(scroll_y: f64, max_scroll: f64) -> f64 {
    if max_scroll <= 0.0 || !max_scroll.is_finite() || !scroll_y.is_finite() {
        return 0.0;
    }
    (scroll_y / max_scroll * 100.0).clamp(0.0, 100.0)
}
