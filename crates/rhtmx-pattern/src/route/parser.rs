//! Route compilation
//!
//! Turns a textual route pattern into a list of [`RouteSegment`]s ready for
//! matching. This is where the syntax engine meets the interceptor registry:
//! every `{name:body}` whose body has a registered predicate is matched by
//! that predicate, and a fragment left with no regex body is demoted from
//! `Regex` to `Named`.
//!
//! Compilation is a fallible fold over the fragments; the first invalid
//! fragment aborts the whole route.

use std::fmt;

use regex::Regex;

use crate::error::PatternError;
use crate::intercept::{InterceptorRegistry, Predicate};
use crate::params::Params;

use super::pattern::{classify, PatternCategory, Segment};
use super::validate::validate_strict;

/// Parameter name under which a trailing `/*` stores the rest of the path
pub const WILDCARD_PARAM: &str = "*";

/// Piece of a fragment: literal text or a `{...}` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    Literal(&'a str),
    Param { name: &'a str, body: Option<&'a str> },
}

/// Splits a validated fragment into literal text and parameters
///
/// # Examples
///
/// ```
/// use rhtmx_pattern::route::parser::{pieces, Piece};
///
/// assert_eq!(
///     pieces("v{major:\\d+}.x"),
///     vec![
///         Piece::Literal("v"),
///         Piece::Param { name: "major", body: Some("\\d+") },
///         Piece::Literal(".x"),
///     ]
/// );
/// ```
pub fn pieces(fragment: &str) -> Vec<Piece<'_>> {
    let mut out = Vec::new();
    let mut rest = fragment;

    while let Some(open) = rest.find('{') {
        if open > 0 {
            out.push(Piece::Literal(&rest[..open]));
        }

        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            // unclosed brace: only reachable on unvalidated input
            out.push(Piece::Literal(&rest[open..]));
            return out;
        };

        let inner = &after[..close];
        out.push(match inner.split_once(':') {
            Some((name, body)) => Piece::Param {
                name,
                body: Some(body),
            },
            None => Piece::Param {
                name: inner,
                body: None,
            },
        });
        rest = &after[close + 1..];
    }

    if !rest.is_empty() {
        out.push(Piece::Literal(rest));
    }
    out
}

/// Splits a pattern on `/` outside braces, dropping empty fragments
///
/// # Examples
///
/// ```
/// use rhtmx_pattern::route::parser::split_fragments;
///
/// assert_eq!(split_fragments("/users/{id}"), vec!["users", "{id}"]);
/// assert_eq!(split_fragments("/files/{p:[^/]+}"), vec!["files", "{p:[^/]+}"]);
/// ```
pub fn split_fragments(pattern: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, byte) in pattern.bytes().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'/' if depth == 0 => {
                fragments.push(&pattern[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    fragments.push(&pattern[start..]);

    fragments.retain(|fragment| !fragment.is_empty());
    fragments
}

// ============================================================================
// Compiled segments
// ============================================================================

/// How one parameter of a split fragment accepts its text
#[derive(Clone)]
pub enum Accept {
    /// Any non-empty text
    Any,
    /// Non-empty text the interceptor accepts
    Check(Predicate),
    /// Non-empty text matching an anchored constraint body
    Regex(Regex),
}

impl Accept {
    fn accepts(&self, text: &str) -> bool {
        match self {
            Accept::Any => true,
            Accept::Check(check) => check(text),
            Accept::Regex(regex) => regex.is_match(text),
        }
    }
}

/// Literal text or parameter of a fragment matched by split search
#[derive(Clone)]
pub enum Part {
    Literal(String),
    Param { name: String, accept: Accept },
}

/// How a compiled segment accepts one path segment
#[derive(Clone)]
pub enum Matcher {
    /// Exact text
    Static(String),
    /// Whole segment captured under `name`, optionally checked by an
    /// interceptor
    Param {
        name: String,
        check: Option<Predicate>,
    },
    /// Anchored regex with one named group per parameter
    Pattern { regex: Regex, names: Vec<String> },
    /// Mixed fragment with intercepted parameters: every split of the
    /// segment is tried until each part accepts its text
    Split(Vec<Part>),
    /// Rest of the path
    Wildcard,
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Matcher::Param { name, check } => f
                .debug_struct("Param")
                .field("name", name)
                .field("intercepted", &check.is_some())
                .finish(),
            Matcher::Pattern { regex, names } => f
                .debug_struct("Pattern")
                .field("regex", &regex.as_str())
                .field("params", names)
                .finish(),
            Matcher::Split(parts) => f
                .debug_list()
                .entries(parts.iter().map(|part| match part {
                    Part::Literal(text) => text.as_str(),
                    Part::Param { name, .. } => name.as_str(),
                }))
                .finish(),
            Matcher::Wildcard => f.write_str("Wildcard"),
        }
    }
}

/// A classified fragment together with its matcher
#[derive(Debug, Clone)]
pub struct RouteSegment {
    segment: Segment,
    matcher: Matcher,
}

impl RouteSegment {
    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    /// Category after interceptor demotion
    pub fn category(&self) -> PatternCategory {
        self.segment.category()
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self.matcher, Matcher::Wildcard)
    }

    /// Tests one path segment, recording captures into `params`
    ///
    /// Static text honours `case_insensitive` (ASCII only); literal text
    /// around parameters in mixed fragments is always case-sensitive.
    pub fn accept(&self, value: &str, case_insensitive: bool, params: &mut Params) -> bool {
        match &self.matcher {
            Matcher::Static(text) => {
                if case_insensitive {
                    text.eq_ignore_ascii_case(value)
                } else {
                    text == value
                }
            }
            Matcher::Param { name, check } => {
                if check.as_ref().map_or(true, |check| check(value)) {
                    params.set(name.as_str(), value);
                    true
                } else {
                    false
                }
            }
            Matcher::Pattern { regex, names } => {
                let Some(caps) = regex.captures(value) else {
                    return false;
                };

                for (index, name) in names.iter().enumerate() {
                    let text = caps
                        .name(&group_name(index))
                        .map_or("", |m| m.as_str());
                    params.set(name.as_str(), text);
                }
                true
            }
            Matcher::Split(parts) => {
                let mut captured = Vec::with_capacity(parts.len());
                if !search_split(parts, value, &mut captured) {
                    return false;
                }

                for (name, text) in captured {
                    params.set(name, text);
                }
                true
            }
            Matcher::Wildcard => {
                params.set(WILDCARD_PARAM, value);
                true
            }
        }
    }
}

/// Depth-first search for a split of `value` accepted by every part
///
/// Parameter ends are tried shortest first, so earlier parameters take as
/// little text as they can, like a lazy group.
fn search_split<'p, 'v>(
    parts: &'p [Part],
    value: &'v str,
    captured: &mut Vec<(&'p str, &'v str)>,
) -> bool {
    let Some((first, rest)) = parts.split_first() else {
        return value.is_empty();
    };

    match first {
        Part::Literal(text) => value
            .strip_prefix(text.as_str())
            .is_some_and(|tail| search_split(rest, tail, captured)),
        Part::Param { name, accept } => {
            let ends = value
                .char_indices()
                .map(|(index, _)| index)
                .skip(1)
                .chain(std::iter::once(value.len()))
                .filter(|&end| end > 0);

            for end in ends {
                let (head, tail) = value.split_at(end);
                if !accept.accepts(head) {
                    continue;
                }

                captured.push((name.as_str(), head));
                if search_split(rest, tail, captured) {
                    return true;
                }
                captured.pop();
            }
            false
        }
    }
}

fn group_name(index: usize) -> String {
    format!("__rhtmx_p{index}")
}

fn compile_regex(pattern: &str, fragment: &str, source: &str) -> Result<Regex, PatternError> {
    Regex::new(source).map_err(|source| PatternError::InvalidRegex {
        pattern: pattern.to_string(),
        fragment: fragment.to_string(),
        source,
    })
}

// ============================================================================
// Compilation
// ============================================================================

/// Fold accumulator for route compilation
#[derive(Default)]
struct ParseState {
    segments: Vec<RouteSegment>,
    params: Vec<String>,
}

impl ParseState {
    fn with_param_name(mut self, pattern: &str, name: &str) -> Result<Self, PatternError> {
        if self.params.iter().any(|existing| existing == name) {
            return Err(PatternError::DuplicateParam {
                pattern: pattern.to_string(),
                name: name.to_string(),
            });
        }
        self.params.push(name.to_string());
        Ok(self)
    }

    fn with_segment(mut self, segment: Segment, matcher: Matcher) -> Self {
        self.segments.push(RouteSegment { segment, matcher });
        self
    }

    fn with_wildcard(self, pattern: &str) -> Result<Self, PatternError> {
        Ok(self
            .with_param_name(pattern, WILDCARD_PARAM)?
            .with_segment(Segment::wildcard(), Matcher::Wildcard))
    }

    fn into_parts(self) -> (Vec<RouteSegment>, Vec<String>) {
        (self.segments, self.params)
    }
}

/// Compiles one validated fragment and adds it to the state
fn process_fragment(
    state: ParseState,
    pattern: &str,
    fragment: &str,
    registry: &InterceptorRegistry,
) -> Result<ParseState, PatternError> {
    let segment = classify(fragment);

    if segment.category() == PatternCategory::Static {
        return Ok(state.with_segment(segment, Matcher::Static(fragment.to_string())));
    }

    let pieces = pieces(fragment);
    let checks: Vec<Option<Predicate>> = pieces
        .iter()
        .map(|piece| match piece {
            Piece::Param {
                body: Some(body), ..
            } => registry.lookup(body),
            _ => None,
        })
        .collect();
    let intercepted = checks.iter().any(Option::is_some);
    let has_regex_body = pieces.iter().zip(&checks).any(|(piece, check)| {
        matches!(piece, Piece::Param { body: Some(_), .. }) && check.is_none()
    });

    let segment = if segment.category() == PatternCategory::Regex && !has_regex_body {
        segment.demoted()
    } else {
        segment
    };

    // Lone parameter without a regex body: no regex needed
    if let ([Piece::Param { name, .. }], false) = (pieces.as_slice(), has_regex_body) {
        let matcher = Matcher::Param {
            name: name.to_string(),
            check: checks.into_iter().next().flatten(),
        };
        return Ok(state
            .with_param_name(pattern, name)?
            .with_segment(segment, matcher));
    }

    let mut state = state;

    if intercepted {
        let mut parts = Vec::with_capacity(pieces.len());
        for (piece, check) in pieces.iter().zip(checks) {
            parts.push(match *piece {
                Piece::Literal(text) => Part::Literal(text.to_string()),
                Piece::Param { name, body } => {
                    state = state.with_param_name(pattern, name)?;
                    let accept = match (check, body) {
                        (Some(check), _) => Accept::Check(check),
                        (None, Some(body)) => {
                            let source = format!("^(?:{body})$");
                            Accept::Regex(compile_regex(pattern, fragment, &source)?)
                        }
                        (None, None) => Accept::Any,
                    };
                    Part::Param {
                        name: name.to_string(),
                        accept,
                    }
                }
            });
        }
        return Ok(state.with_segment(segment, Matcher::Split(parts)));
    }

    let mut source = String::from("^");
    let mut names = Vec::new();

    for piece in &pieces {
        match *piece {
            Piece::Literal(text) => source.push_str(&regex::escape(text)),
            Piece::Param { name, body } => {
                let group = group_name(names.len());
                match body {
                    Some(body) => source.push_str(&format!("(?P<{group}>{body})")),
                    None => source.push_str(&format!("(?P<{group}>.+?)")),
                }

                state = state.with_param_name(pattern, name)?;
                names.push(name.to_string());
            }
        }
    }
    source.push('$');

    let regex = compile_regex(pattern, fragment, &source)?;
    Ok(state.with_segment(segment, Matcher::Pattern { regex, names }))
}

/// Compiles a route pattern (pure with respect to its inputs)
///
/// The whole pattern is checked with [`validate_strict`] first, so error
/// positions are byte offsets into `pattern`. Returns the compiled segments
/// and the parameter names in declaration order. A trailing `/*` becomes a final wildcard segment whose capture is
/// stored under [`WILDCARD_PARAM`].
///
/// # Examples
///
/// ```
/// use rhtmx_pattern::route::parser::compile;
/// use rhtmx_pattern::{InterceptorRegistry, PatternCategory};
///
/// let registry = InterceptorRegistry::with_builtins();
/// let (segments, params) = compile("/users/{id:digit}/*", &registry).unwrap();
///
/// let categories: Vec<_> = segments.iter().map(|s| s.category()).collect();
/// assert_eq!(
///     categories,
///     vec![
///         PatternCategory::Static,
///         PatternCategory::Named, // demoted: "digit" is intercepted
///         PatternCategory::Wildcard,
///     ]
/// );
/// assert_eq!(params, vec!["id", "*"]);
/// ```
pub fn compile(
    pattern: &str,
    registry: &InterceptorRegistry,
) -> Result<(Vec<RouteSegment>, Vec<String>), PatternError> {
    let (body, wildcard) = match pattern.strip_suffix("/*") {
        Some(body) => (body, true),
        None => (pattern, false),
    };

    validate_strict(pattern)?;

    let state = split_fragments(body)
        .into_iter()
        .try_fold(ParseState::default(), |state, fragment| {
            process_fragment(state, pattern, fragment, registry)
        })?;

    let state = if wildcard {
        state.with_wildcard(pattern)?
    } else {
        state
    };

    Ok(state.into_parts())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::match_digit;
    use pretty_assertions::assert_eq;

    fn categories(pattern: &str, registry: &InterceptorRegistry) -> Vec<PatternCategory> {
        compile(pattern, registry)
            .unwrap()
            .0
            .iter()
            .map(RouteSegment::category)
            .collect()
    }

    #[test]
    fn test_pieces_plain() {
        assert_eq!(pieces("about"), vec![Piece::Literal("about")]);
        assert_eq!(
            pieces("{id}"),
            vec![Piece::Param {
                name: "id",
                body: None
            }]
        );
    }

    #[test]
    fn test_pieces_body_keeps_colons() {
        assert_eq!(
            pieces("{t:a:b}"),
            vec![Piece::Param {
                name: "t",
                body: Some("a:b")
            }]
        );
    }

    #[test]
    fn test_pieces_mixed() {
        assert_eq!(
            pieces("{name}.{ext}"),
            vec![
                Piece::Param {
                    name: "name",
                    body: None
                },
                Piece::Literal("."),
                Piece::Param {
                    name: "ext",
                    body: None
                },
            ]
        );
    }

    #[test]
    fn test_split_fragments() {
        assert_eq!(split_fragments(""), Vec::<&str>::new());
        assert_eq!(split_fragments("/"), Vec::<&str>::new());
        assert_eq!(split_fragments("a//b/"), vec!["a", "b"]);
        assert_eq!(split_fragments("/x/{p:a/b}/y"), vec!["x", "{p:a/b}", "y"]);
    }

    #[test]
    fn test_compile_categories() {
        let registry = InterceptorRegistry::new();
        assert_eq!(
            categories("/users/{id}/posts/{slug:[a-z-]+}", &registry),
            vec![
                PatternCategory::Static,
                PatternCategory::Named,
                PatternCategory::Static,
                PatternCategory::Regex,
            ]
        );
    }

    #[test]
    fn test_compile_demotes_intercepted_regex() {
        let registry = InterceptorRegistry::new();
        registry.register(match_digit, &[r"\d+"]).unwrap();

        assert_eq!(
            categories(r"/a/{id:\d+}", &registry),
            vec![PatternCategory::Static, PatternCategory::Named]
        );
        assert_eq!(
            categories("/a/{id:[0-9]+}", &registry),
            vec![PatternCategory::Static, PatternCategory::Regex]
        );
    }

    #[test]
    fn test_compile_mixed_fragment_demotion() {
        let registry = InterceptorRegistry::with_builtins();
        assert_eq!(
            categories("/v{major:digit}.{minor:digit}", &registry),
            vec![PatternCategory::Named]
        );
        assert_eq!(
            categories("/v{major:digit}.{minor:[0-9]+}", &registry),
            vec![PatternCategory::Regex]
        );
    }

    #[test]
    fn test_compile_wildcard() {
        let registry = InterceptorRegistry::new();
        let (segments, params) = compile("/static/*", &registry).unwrap();
        assert_eq!(segments.len(), 2);
        assert!(segments[1].is_wildcard());
        assert_eq!(params, vec![WILDCARD_PARAM]);

        let (segments, _) = compile("/*", &registry).unwrap();
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_compile_errors() {
        let registry = InterceptorRegistry::new();
        let kind = |p: &str| compile(p, &registry).unwrap_err().kind();

        assert_eq!(kind("/a/{{b}}"), "nested-brace");
        assert_eq!(kind("/a:b"), "stray-separator");
        assert_eq!(kind("/{}"), "empty-name");
        assert_eq!(kind("/a}"), "unmatched-close");
        assert_eq!(kind("/{a"), "unclosed-brace");
        assert_eq!(kind("/{a:(}"), "invalid-regex");
        assert_eq!(kind("/{id}/{id}"), "duplicate-param");
        assert_eq!(kind("/u/{a:}"), "empty-body");
        assert_eq!(kind("/f/{p:a/b}"), "slash-in-param");
    }

    #[test]
    fn test_compile_error_position_is_in_whole_pattern() {
        let registry = InterceptorRegistry::new();
        match compile("/users/{id:}", &registry).unwrap_err() {
            PatternError::EmptyBody { pattern, position } => {
                assert_eq!(pattern, "/users/{id:}");
                assert_eq!(position, 11);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_split_backtracks_past_failed_check() {
        let registry = InterceptorRegistry::with_builtins();
        let (segments, _) = compile("/{a}-{b:digit}", &registry).unwrap();
        assert!(matches!(segments[0].matcher(), Matcher::Split(_)));

        let mut params = Params::new();
        assert!(segments[0].accept("x-1-2", false, &mut params));
        assert_eq!(params.get("a"), Some("x-1"));
        assert_eq!(params.get("b"), Some("2"));

        assert!(!segments[0].accept("x-y", false, &mut Params::new()));
    }

    #[test]
    fn test_split_with_regex_body_and_check() {
        let registry = InterceptorRegistry::with_builtins();
        let (segments, _) = compile("/{id:digit}.{ext:json|xml}", &registry).unwrap();
        let mut params = Params::new();

        assert!(segments[0].accept("12.json", false, &mut params));
        assert_eq!(params.get("id"), Some("12"));
        assert_eq!(params.get("ext"), Some("json"));

        assert!(!segments[0].accept("12.csv", false, &mut Params::new()));
        assert!(!segments[0].accept("ab.xml", false, &mut Params::new()));
    }

    #[test]
    fn test_failed_split_records_nothing() {
        let registry = InterceptorRegistry::with_builtins();
        let (segments, _) = compile("/{a}-{b:digit}", &registry).unwrap();
        let mut params = Params::new();

        assert!(!segments[0].accept("x-y", false, &mut params));
        assert!(params.is_empty());
    }

    #[test]
    fn test_user_named_group_does_not_collide() {
        let registry = InterceptorRegistry::new();
        let (segments, _) = compile("/{a}-{b:(?P<p0>x+)}", &registry).unwrap();
        let mut params = Params::new();

        assert!(segments[0].accept("k-xx", false, &mut params));
        assert_eq!(params.get("a"), Some("k"));
        assert_eq!(params.get("b"), Some("xx"));
    }

    #[test]
    fn test_accept_param_with_check() {
        let registry = InterceptorRegistry::with_builtins();
        let (segments, _) = compile("/{id:digit}", &registry).unwrap();
        let mut params = Params::new();

        assert!(!segments[0].accept("abc", false, &mut params));
        assert!(params.is_empty());
        assert!(segments[0].accept("42", false, &mut params));
        assert_eq!(params.get("id"), Some("42"));
    }

    #[test]
    fn test_accept_pattern() {
        let registry = InterceptorRegistry::with_builtins();
        let (segments, _) = compile("/{name}.{ext:json|xml}", &registry).unwrap();
        let mut params = Params::new();

        assert!(segments[0].accept("report.json", false, &mut params));
        assert_eq!(params.get("name"), Some("report"));
        assert_eq!(params.get("ext"), Some("json"));

        assert!(!segments[0].accept("report.csv", false, &mut Params::new()));
    }

    #[test]
    fn test_accept_pattern_checks_intercepted_groups() {
        let registry = InterceptorRegistry::with_builtins();
        let (segments, _) = compile("/v{major:digit}", &registry).unwrap();

        assert!(segments[0].accept("v2", false, &mut Params::new()));
        assert!(!segments[0].accept("vx", false, &mut Params::new()));
    }

    #[test]
    fn test_accept_static_case() {
        let registry = InterceptorRegistry::new();
        let (segments, _) = compile("/About", &registry).unwrap();

        assert!(!segments[0].accept("about", false, &mut Params::new()));
        assert!(segments[0].accept("about", true, &mut Params::new()));
    }
}
