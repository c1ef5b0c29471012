//! Built-in constraint predicates
//!
//! Cheap replacements for the most common constraint bodies. Installed in
//! an [`InterceptorRegistry`](crate::InterceptorRegistry) they let the router
//! skip the regex engine entirely.

/// Accepts everything
pub fn match_any(_value: &str) -> bool {
    true
}

/// Non-empty and only ASCII digits
///
/// # Examples
///
/// ```
/// use rhtmx_pattern::constraint::match_digit;
///
/// assert!(match_digit("123"));
/// assert!(!match_digit(""));
/// assert!(!match_digit("1a"));
/// ```
pub fn match_digit(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Non-empty and only ASCII letters or digits
///
/// # Examples
///
/// ```
/// use rhtmx_pattern::constraint::match_word;
///
/// assert!(match_word("abc123"));
/// assert!(!match_word(""));
/// assert!(!match_word("snake_case"));
/// ```
pub fn match_word(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_alphanumeric())
}
