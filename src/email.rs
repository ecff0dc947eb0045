//! Newsletter email validation.
//!
//! The check is intentionally shallow: one `@`, no whitespace, and a dot
//! somewhere after the `@` with at least one character on each side. No
//! normalization, no IDN handling, no length limits.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Returns `true` when `s` looks like `localpart@domain.tld`.
///
/// # Examples
///
/// ```
/// use eden_newsdesk::email::is_valid_email;
///
/// assert!(is_valid_email("a@b.c"));
/// assert!(!is_valid_email("a@b"));
/// assert!(!is_valid_email("a b@c.d"));
/// ```
pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}
