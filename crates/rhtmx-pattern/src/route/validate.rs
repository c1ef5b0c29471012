//! Single-pass pattern validation
//!
//! Scans a pattern once, tracking the byte offset of the open brace (if
//! any), and reports the first syntax error found.

use crate::error::PatternError;

use super::pattern::PatternCategory;

/// Validates a pattern and returns its effective category (pure function)
///
/// # Transitions
///
/// | Byte | Condition              | Result                          |
/// |------|------------------------|---------------------------------|
/// | `{`  | brace already open     | `NestedBrace`                   |
/// | `{`  | otherwise              | open brace, at least `Named`    |
/// | `:`  | no brace open          | `StraySeparator`                |
/// | `:`  | right after `{`        | `EmptyName`                     |
/// | `:`  | otherwise              | `Regex`                         |
/// | `}`  | no brace open          | `UnmatchedClose`                |
/// | `}`  | right after `{`        | `EmptyName`                     |
/// | `}`  | otherwise              | close brace                     |
///
/// A pattern ending in `/*` is `Wildcard` whatever was seen before. A brace
/// left open at the end is accepted here; use [`validate_strict`] to reject
/// it.
///
/// # Examples
///
/// ```
/// use rhtmx_pattern::{validate, PatternCategory};
///
/// assert_eq!(validate("{a:\\d+}").unwrap(), PatternCategory::Regex);
/// assert_eq!(validate("{a}/*").unwrap(), PatternCategory::Wildcard);
/// assert_eq!(validate("{{").unwrap_err().kind(), "nested-brace");
/// ```
pub fn validate(pattern: &str) -> Result<PatternCategory, PatternError> {
    scan(pattern).map(|(category, _)| category)
}

/// Like [`validate`], but also rejects what a route can never match:
///
/// - a brace that is never closed (`UnclosedBrace`)
/// - an empty constraint body, `{a:}` (`EmptyBody`)
/// - a `/` inside a parameter, `{p:a/b}` (`SlashInParam`)
///
/// # Examples
///
/// ```
/// use rhtmx_pattern::{validate, validate_strict};
///
/// assert!(validate("/users/{id").is_ok());
/// assert_eq!(validate_strict("/users/{id").unwrap_err().kind(), "unclosed-brace");
/// assert_eq!(validate_strict("/users/{id:}").unwrap_err().kind(), "empty-body");
/// assert_eq!(validate_strict("/f/{p:a/b}").unwrap_err().kind(), "slash-in-param");
/// ```
pub fn validate_strict(pattern: &str) -> Result<PatternCategory, PatternError> {
    match scan(pattern)? {
        (_, Some(position)) => Err(PatternError::UnclosedBrace {
            pattern: pattern.to_string(),
            position,
        }),
        (category, None) => {
            check_params(pattern)?;
            Ok(category)
        }
    }
}

/// Second pass over a scanned pattern with balanced braces
fn check_params(pattern: &str) -> Result<(), PatternError> {
    let mut in_brace = false;
    let mut body_start: Option<usize> = None;

    for (position, byte) in pattern.bytes().enumerate() {
        match byte {
            b'{' => {
                in_brace = true;
                body_start = None;
            }
            b':' if in_brace && body_start.is_none() => body_start = Some(position + 1),
            b'}' if body_start == Some(position) => {
                return Err(PatternError::EmptyBody {
                    pattern: pattern.to_string(),
                    position,
                })
            }
            b'}' => in_brace = false,
            b'/' if in_brace => {
                return Err(PatternError::SlashInParam {
                    pattern: pattern.to_string(),
                    position,
                })
            }
            _ => {}
        }
    }

    Ok(())
}

/// Returns the category and the offset of a brace still open at the end
fn scan(pattern: &str) -> Result<(PatternCategory, Option<usize>), PatternError> {
    let mut category = PatternCategory::Static;
    let mut open: Option<usize> = None;

    for (position, byte) in pattern.bytes().enumerate() {
        match (byte, open) {
            (b'{', Some(_)) => {
                return Err(PatternError::NestedBrace {
                    pattern: pattern.to_string(),
                    position,
                })
            }
            (b'{', None) => {
                open = Some(position);
                if category != PatternCategory::Regex {
                    category = PatternCategory::Named;
                }
            }
            (b':', None) => {
                return Err(PatternError::StraySeparator {
                    pattern: pattern.to_string(),
                    position,
                })
            }
            (b':' | b'}', Some(start)) if position == start + 1 => {
                return Err(PatternError::EmptyName {
                    pattern: pattern.to_string(),
                    position,
                })
            }
            (b':', Some(_)) => category = PatternCategory::Regex,
            (b'}', None) => {
                return Err(PatternError::UnmatchedClose {
                    pattern: pattern.to_string(),
                    position,
                })
            }
            (b'}', Some(_)) => open = None,
            _ => {}
        }
    }

    if pattern.ends_with("/*") {
        category = PatternCategory::Wildcard;
    }

    Ok((category, open))
}
