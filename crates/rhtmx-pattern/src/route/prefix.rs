//! Trie-safe common prefix of two patterns

/// Length of the longest prefix `installed` and `incoming` may share as a
/// trie edge (pure function)
///
/// Walks both patterns byte by byte and never cuts through a `{...}`
/// parameter:
///
/// - a `:` in `installed` returns the offset of the `{` that opened it.
///   Constraint bodies are atomic, so even two identical `{x:\d+}` tokens
///   share nothing past their `{`;
/// - a mismatch inside an open brace returns the offset of that `{`;
/// - a mismatch outside braces returns its own offset.
///
/// Returns `None` when `installed` has a `:` outside any brace before the
/// patterns diverge: there is no `{` to fall back to.
///
/// # Argument order
///
/// Only `installed` is inspected for `:`. Pass the pattern already stored
/// in the trie first and the pattern being inserted second.
///
/// # Examples
///
/// ```
/// use rhtmx_pattern::safe_prefix;
///
/// assert_eq!(safe_prefix("/test", "/abc"), Some(1));
/// assert_eq!(safe_prefix("/te{st", "/test"), Some(3));
/// assert_eq!(safe_prefix("/tes{t}", "/tes{t}"), Some(7));
/// assert_eq!(safe_prefix("/tes{t:\\d+}", "/tes{t:\\d+}"), Some(4));
/// ```
pub fn safe_prefix(installed: &str, incoming: &str) -> Option<usize> {
    let a = installed.as_bytes();
    let b = incoming.as_bytes();
    let max = a.len().min(b.len());
    let mut last_open: Option<usize> = None;

    for i in 0..max {
        if a[i] == b':' {
            return last_open;
        }

        // brace state of the shared bytes before `i`, same for both sides
        if a[i] != b[i] {
            return Some(last_open.unwrap_or_else(|| char_floor(installed, i)));
        }

        match a[i] {
            b'{' => last_open = Some(i),
            b'}' => last_open = None,
            _ => {}
        }
    }

    Some(max)
}

/// Largest char boundary of `s` at or below `index`
fn char_floor(s: &str, mut index: usize) -> usize {
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}
