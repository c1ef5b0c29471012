//! # RHTMX Pattern
//!
//! Route pattern syntax engine for trie-based HTTP routers:
//! - Fragment classification (`about`, `{id}`, `{id:\d+}`, `*`)
//! - Brace-aware validation with positioned errors
//! - Trie-safe common prefix computation (never splits a `{...}`)
//! - Constraint interceptors: native predicates that replace regex bodies
//! - A priority-ordered [`Router`] built on top of the above
//!
//! ## Pattern Syntax
//!
//! | Fragment          | Category   | Matches                            |
//! |-------------------|------------|------------------------------------|
//! | `about`           | `Static`   | exactly `about`                    |
//! | `{id}`            | `Named`    | any non-empty segment              |
//! | `{id:[0-9]+}`     | `Regex`    | segments matching the body         |
//! | `{id:digit}`      | `Named`    | checked by the `digit` interceptor |
//! | `/*` (trailing)   | `Wildcard` | the rest of the path, possibly ""  |
//!
//! Routes are tried in order `Static < Regex < Named < Wildcard`, segment by
//! segment, so registering an interceptor for a regex body changes which
//! route wins (see [`intercept`]).
//!
//! ## Example
//!
//! ```
//! use rhtmx_pattern::{validate, PatternCategory, Router};
//!
//! assert_eq!(validate("/users/{id}").unwrap(), PatternCategory::Named);
//! assert_eq!(validate("/a/{b:c}}").unwrap_err().kind(), "unmatched-close");
//!
//! let mut router = Router::new();
//! router.add_route("/users/{id:digit}").unwrap();
//! router.add_route("/users/{name}").unwrap();
//!
//! let route_match = router.match_route("/users/42").unwrap();
//! assert_eq!(route_match.route.pattern, "/users/{id:digit}");
//! assert_eq!(route_match.params.get("id"), Some("42"));
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod constraint;
pub mod error;
pub mod intercept;
pub mod params;
pub mod path;
pub mod route;
mod router;

// Re-export public types
pub use config::{InterceptorConfig, RouterConfig, RoutingConfig};
pub use error::{ParamError, PatternError, RegistryError};
pub use intercept::{InterceptorRegistry, Predicate};
pub use params::Params;
pub use route::{classify, safe_prefix, validate, validate_strict, PatternCategory, Segment};
pub use router::{Route, RouteMatch, Router};
