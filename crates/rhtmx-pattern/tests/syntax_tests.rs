//! Integration tests for the pure syntax functions
//!
//! Covers:
//! - Trie-safe prefixes, including argument order
//! - Validation categories and error kinds
//! - Fragment classification
//! - Built-in predicates
//! - Typed parameter readers

use pretty_assertions::assert_eq;
use rhtmx_pattern::constraint::{match_any, match_digit, match_word};
use rhtmx_pattern::route::parser::split_fragments;
use rhtmx_pattern::*;
use rstest::rstest;

// ============================================================================
// safe_prefix
// ============================================================================

#[rstest]
#[case("", "", Some(0))]
#[case("/test", "/abc", Some(1))]
#[case("/test", "/test", Some(5))]
#[case("/te{st", "/test", Some(3))]
#[case("/test", "/tes{t", Some(4))]
#[case("/tes{t}", "/tes{t}", Some(7))]
#[case("/tes{t:\\d+}", "/tes{t:\\d+}", Some(4))]
fn test_safe_prefix_scenarios(
    #[case] installed: &str,
    #[case] incoming: &str,
    #[case] expected: Option<usize>,
) {
    assert_eq!(safe_prefix(installed, incoming), expected);
}

const PREFIX_SAMPLES: &[&str] = &[
    "",
    "/",
    "/test",
    "/tes{t}",
    "/te{st",
    "/users/{id}",
    "/users/{name}",
    "/users/{id}/posts",
    "/users/new",
    "/{a}",
    "/{ab}",
    "/{a}x",
    "/static/*",
    "/café",
    "/cafè",
];

#[test]
fn test_safe_prefix_self_is_full_length() {
    for &x in PREFIX_SAMPLES {
        assert_eq!(safe_prefix(x, x), Some(x.len()), "pattern {x:?}");
    }
}

#[rstest]
#[case("/tes{t:\\d+}", Some(4))]
#[case("/{a}/{b:x}", Some(5))]
#[case("{x:y}", Some(0))]
#[case("/a:b", None)]
fn test_safe_prefix_self_stops_at_separator(#[case] x: &str, #[case] expected: Option<usize>) {
    assert_eq!(safe_prefix(x, x), expected);
}

#[test]
fn test_safe_prefix_symmetric_without_separator() {
    for &a in PREFIX_SAMPLES {
        for &b in PREFIX_SAMPLES {
            assert_eq!(safe_prefix(a, b), safe_prefix(b, a), "{a:?} vs {b:?}");
        }
    }
}

#[test]
fn test_safe_prefix_bounded_and_brace_safe() {
    for &a in PREFIX_SAMPLES {
        for &b in PREFIX_SAMPLES {
            let p = safe_prefix(a, b).unwrap();
            let max = a.len().min(b.len());
            assert!(p <= max, "{a:?} vs {b:?}");
            assert!(a.is_char_boundary(p) && b.is_char_boundary(p));

            // a cut short of both ends never lands inside an open brace
            if p != 0 && p != max {
                let head = &a[..p];
                let opens = head.matches('{').count();
                let closes = head.matches('}').count();
                assert_eq!(opens, closes, "{a:?} vs {b:?} cut at {p}");
            }
        }
    }
}

#[test]
fn test_safe_prefix_argument_order() {
    // the ':' rule looks at the installed pattern only
    assert_eq!(safe_prefix("/a:", "/ab"), None);
    assert_eq!(safe_prefix("/ab", "/a:"), Some(2));
    assert_eq!(safe_prefix("/{a:x}", "/{a}"), Some(1));
    assert_eq!(safe_prefix("/{a}", "/{a:x}"), Some(1));
}

// ============================================================================
// validate
// ============================================================================

#[rstest]
#[case("{a:\\d+}", PatternCategory::Regex)]
#[case("{a}/*", PatternCategory::Wildcard)]
#[case("{a:\\d+}/*", PatternCategory::Wildcard)]
#[case("/about", PatternCategory::Static)]
#[case("/users/{id}", PatternCategory::Named)]
#[case("/a/{b:c}/{d}", PatternCategory::Regex)]
#[case("", PatternCategory::Static)]
fn test_validate_category(#[case] pattern: &str, #[case] expected: PatternCategory) {
    assert_eq!(validate(pattern).unwrap(), expected);
}

#[rstest]
#[case("{{", "nested-brace", 1)]
#[case("/a:b", "stray-separator", 2)]
#[case("/{}", "empty-name", 2)]
#[case("/{:x}", "empty-name", 2)]
#[case("/a}", "unmatched-close", 2)]
fn test_validate_errors(#[case] pattern: &str, #[case] kind: &str, #[case] at: usize) {
    let err = validate(pattern).unwrap_err();
    assert_eq!(err.kind(), kind);

    let position = match err {
        PatternError::NestedBrace { position, .. }
        | PatternError::StraySeparator { position, .. }
        | PatternError::EmptyName { position, .. }
        | PatternError::UnmatchedClose { position, .. } => position,
        other => panic!("unexpected error {other:?}"),
    };
    assert_eq!(position, at);
}

#[test]
fn test_validate_error_message_names_pattern() {
    let err = validate("/users/{{id}").unwrap_err();
    assert_eq!(
        err.to_string(),
        "nested brace at byte 8 in pattern '/users/{{id}'"
    );
}

#[test]
fn test_validate_unclosed_brace_is_lenient() {
    assert_eq!(validate("/users/{id").unwrap(), PatternCategory::Named);
    assert_eq!(
        validate_strict("/users/{id").unwrap_err().kind(),
        "unclosed-brace"
    );
    assert_eq!(PatternCategory::of("/users/{{"), PatternCategory::Unknown);
}

#[rstest]
#[case("/users/{id}/posts")]
#[case("/files/{name}.{ext:json|xml}")]
#[case("/a/*")]
#[case("/a:b")]
#[case("/{{x}}")]
#[case("/x}/y")]
#[case("/{}/z")]
fn test_validate_agrees_with_fragments(#[case] pattern: &str) {
    let whole = validate(pattern).is_ok();
    let per_fragment = split_fragments(pattern)
        .into_iter()
        .all(|fragment| PatternCategory::of(fragment) != PatternCategory::Unknown);

    assert_eq!(whole, per_fragment);
}

// ============================================================================
// classify
// ============================================================================

#[rstest]
#[case("{id}", PatternCategory::Named, true)]
#[case("{id}x", PatternCategory::Named, false)]
#[case("about", PatternCategory::Static, false)]
#[case("{id:\\d+}", PatternCategory::Regex, true)]
#[case("v{major:\\d+}.{minor}", PatternCategory::Regex, true)]
fn test_classify(#[case] fragment: &str, #[case] category: PatternCategory, #[case] endpoint: bool) {
    let segment = classify(fragment);
    assert_eq!(segment.category(), category);
    assert_eq!(segment.is_endpoint(), endpoint);
}

#[test]
fn test_classify_preserves_value() {
    for fragment in ["{id}", "{id}x", "about", "{a:b}c{d}"] {
        let segment = classify(fragment);
        assert_eq!(segment.value(), fragment);
        assert_eq!(classify(segment.value()), segment);
    }
}

// ============================================================================
// Built-in predicates
// ============================================================================

#[test]
fn test_builtin_predicates() {
    assert_eq!(
        (match_digit("123"), match_digit(""), match_digit("1a")),
        (true, false, false)
    );
    assert!(match_word("Abc9"));
    assert!(!match_word(""));
    assert!(!match_word("é"));
    assert!(match_any(""));
}

// ============================================================================
// Params
// ============================================================================

#[test]
fn test_params_typed_readers() {
    let params: Params = [("key1", "1")].into_iter().collect();

    assert_eq!(params.int("key1"), Ok(1));
    assert_eq!(
        params.int("missing"),
        Err(ParamError::NotFound {
            name: "missing".to_string()
        })
    );
    assert_eq!(params.int_or("missing", -10), -10);
}

#[test]
fn test_params_uint_rejects_negative() {
    let params: Params = [("n", "-1")].into_iter().collect();

    let err = params.uint("n").unwrap_err();
    assert!(!err.is_not_found());
    assert_eq!(params.uint_or("n", 7), 7);
    assert_eq!(params.int("n"), Ok(-1));
}

#[rstest]
#[case("true", true)]
#[case("1", true)]
#[case("false", false)]
#[case("0", false)]
fn test_params_bool(#[case] raw: &str, #[case] expected: bool) {
    let params: Params = [("flag", raw)].into_iter().collect();
    assert_eq!(params.bool("flag"), Ok(expected));
}
