//! Request path normalization
//!
//! Incoming request paths are cleaned before they are split into segments,
//! so `/users//42/` and `\users\42` match the same routes as `/users/42`.

use std::borrow::Cow;

/// Whether `path` is already in canonical form
///
/// Canonical: starts with `/`, no `\`, no empty segment, and no trailing
/// `/` except for the root itself.
///
/// # Examples
///
/// ```
/// use rhtmx_pattern::path::is_canonical;
///
/// assert!(is_canonical("/"));
/// assert!(is_canonical("/users/42"));
/// assert!(!is_canonical("users/42"));
/// assert!(!is_canonical("/users/42/"));
/// assert!(!is_canonical("/users//42"));
/// ```
pub fn is_canonical(path: &str) -> bool {
    match path.strip_prefix('/') {
        None => false,
        Some("") => true,
        Some(rest) => !rest.contains('\\') && rest.split('/').all(|s| !s.is_empty()),
    }
}

/// Normalizes a request path, borrowing when nothing needs to change
///
/// # Examples
///
/// ```
/// use rhtmx_pattern::path::normalize;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize("/users/42"), Cow::Borrowed("/users/42")));
/// assert_eq!(normalize("/users//42/"), "/users/42");
/// assert_eq!(normalize("\\users\\42"), "/users/42");
/// assert_eq!(normalize(""), "/");
/// ```
pub fn normalize(path: &str) -> Cow<'_, str> {
    if is_canonical(path) {
        return Cow::Borrowed(path);
    }

    let mut normalized = String::with_capacity(path.len() + 1);
    for segment in path.split(|c: char| c == '/' || c == '\\').filter(|s| !s.is_empty()) {
        normalized.push('/');
        normalized.push_str(segment);
    }

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(normalized)
    }
}

/// Non-empty `/`-separated segments of a request path
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
