//! Pattern fragment classification
//!
//! Pure functional classification of `/`-delimited route fragments into
//! structural categories. All functions are **pure**: same input → same
//! output, no side effects.

use std::fmt;

use super::validate::validate;

/// Structural category of a route pattern or fragment
///
/// Variants are declared in **matching priority order**: the derived `Ord`
/// sorts the most specific category first, so sibling routes can be ordered
/// with a plain `sort()`.
///
/// | Category   | Syntax           | Priority |
/// |------------|------------------|----------|
/// | `Static`   | `about`          | highest  |
/// | `Regex`    | `{id:\d+}`       |          |
/// | `Named`    | `{id}`           |          |
/// | `Wildcard` | trailing `/*`    | lowest   |
/// | `Unknown`  | invalid pattern  | never matched |
///
/// # Examples
///
/// ```
/// use rhtmx_pattern::PatternCategory;
///
/// let mut categories = vec![
///     PatternCategory::Wildcard,
///     PatternCategory::Named,
///     PatternCategory::Static,
///     PatternCategory::Regex,
/// ];
/// categories.sort();
///
/// assert_eq!(
///     categories,
///     vec![
///         PatternCategory::Static,
///         PatternCategory::Regex,
///         PatternCategory::Named,
///         PatternCategory::Wildcard,
///     ]
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatternCategory {
    /// Plain text, compared literally
    Static,
    /// `{name:body}` - captures text accepted by `body`
    Regex,
    /// `{name}` - captures any non-`/` text
    Named,
    /// Trailing `/*` - captures the remainder of the path
    Wildcard,
    /// Returned alongside validation errors
    Unknown,
}

impl PatternCategory {
    /// Category of a whole pattern, `Unknown` if it fails validation
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_pattern::PatternCategory;
    ///
    /// assert_eq!(PatternCategory::of("/users/{id}"), PatternCategory::Named);
    /// assert_eq!(PatternCategory::of("/users/{"), PatternCategory::Named);
    /// assert_eq!(PatternCategory::of("/users/{{"), PatternCategory::Unknown);
    /// ```
    pub fn of(pattern: &str) -> Self {
        validate(pattern).unwrap_or(PatternCategory::Unknown)
    }

    /// Whether this category captures a parameter
    pub fn is_dynamic(self) -> bool {
        matches!(
            self,
            PatternCategory::Regex | PatternCategory::Named | PatternCategory::Wildcard
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PatternCategory::Static => "static",
            PatternCategory::Regex => "regex",
            PatternCategory::Named => "named",
            PatternCategory::Wildcard => "wildcard",
            PatternCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `/`-delimited fragment of a route pattern
///
/// Immutable once built. `endpoint` is true iff the fragment's last byte is
/// `}`; a trie uses it to tell `{id}` apart from `{id}x` when deciding
/// whether an edge may be extended past the parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    value: String,
    category: PatternCategory,
    endpoint: bool,
}

impl Segment {
    /// Raw fragment text
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn category(&self) -> PatternCategory {
        self.category
    }

    pub fn is_endpoint(&self) -> bool {
        self.endpoint
    }

    /// Copy of this segment re-tagged as `Named`
    ///
    /// Used when every constraint body of a `Regex` fragment has an
    /// interceptor: the fragment keeps its text and parameter names but drops
    /// to `Named` priority.
    pub fn demoted(&self) -> Self {
        Segment {
            value: self.value.clone(),
            category: PatternCategory::Named,
            endpoint: self.endpoint,
        }
    }

    pub(crate) fn wildcard() -> Self {
        Segment {
            value: "*".to_string(),
            category: PatternCategory::Wildcard,
            endpoint: false,
        }
    }
}

/// Classifies a validated fragment (pure function)
///
/// Single left-to-right scan. The category starts as `Static` and is only
/// ever promoted:
///
/// 1. `{` → at least `Named`
/// 2. `:` inside a brace → `Regex` (dominates `Named`)
/// 3. `}` closes the brace, the category is kept
///
/// There is no error path: the fragment must already have passed
/// [`validate`](crate::validate).
///
/// # Examples
///
/// ```
/// use rhtmx_pattern::{classify, PatternCategory};
///
/// let seg = classify("{id}");
/// assert_eq!(seg.category(), PatternCategory::Named);
/// assert!(seg.is_endpoint());
///
/// let seg = classify("{id}x");
/// assert_eq!(seg.category(), PatternCategory::Named);
/// assert!(!seg.is_endpoint());
///
/// let seg = classify("v{major:\\d+}");
/// assert_eq!(seg.category(), PatternCategory::Regex);
/// ```
pub fn classify(fragment: &str) -> Segment {
    let mut category = PatternCategory::Static;
    let mut in_brace = false;

    for byte in fragment.bytes() {
        match byte {
            b'{' => {
                in_brace = true;
                if category == PatternCategory::Static {
                    category = PatternCategory::Named;
                }
            }
            b':' if in_brace => category = PatternCategory::Regex,
            b'}' => in_brace = false,
            _ => {}
        }
    }

    Segment {
        value: fragment.to_string(),
        category,
        endpoint: fragment.ends_with('}'),
    }
}
