//! Priority-ordered route table
//!
//! Routes are kept sorted by the categories of their segments (see
//! [`PatternCategory`]) and matched first to last. Routes of equal priority
//! keep their insertion order.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::config::RouterConfig;
use crate::error::PatternError;
use crate::intercept::{self, InterceptorRegistry};
use crate::params::Params;
use crate::path;
use crate::route::parser::{compile, pieces, Matcher, Piece, RouteSegment, WILDCARD_PARAM};
use crate::route::PatternCategory;

// ============================================================================
// Core Types
// ============================================================================

/// A compiled route pattern with its metadata
#[derive(Debug, Clone)]
pub struct Route {
    /// Pattern as written, e.g. `/users/{id:digit}`
    pub pattern: String,
    /// Compiled fragments, wildcard last
    pub segments: Vec<RouteSegment>,
    /// Parameter names in declaration order
    pub params: Vec<String>,
    /// Optional name for URL generation
    pub name: Option<String>,
    /// Arbitrary metadata (titles, permissions, ...)
    pub metadata: HashMap<String, String>,
}

/// Result of matching a path against a router
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    /// The matched route
    pub route: &'a Route,
    /// Captured parameters
    pub params: Params,
}

// ============================================================================
// Route Implementation
// ============================================================================

impl Route {
    /// Compiles `pattern` against the process-wide interceptor registry
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_pattern::Route;
    ///
    /// let route = Route::parse("/users/{id:digit}").unwrap();
    /// assert_eq!(route.params, vec!["id"]);
    ///
    /// let params = route.matches("/users/42").unwrap();
    /// assert_eq!(params.int("id"), Ok(42));
    /// assert!(route.matches("/users/abc").is_none());
    /// ```
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        Self::parse_with(pattern, &intercept::global())
    }

    /// Compiles `pattern` against an explicit registry
    ///
    /// Interceptors are looked up once, here. Later changes to the registry
    /// do not affect the compiled route.
    pub fn parse_with(pattern: &str, registry: &InterceptorRegistry) -> Result<Self, PatternError> {
        let (segments, params) = compile(pattern, registry)?;

        Ok(Route {
            pattern: pattern.to_string(),
            segments,
            params,
            name: None,
            metadata: HashMap::new(),
        })
    }

    /// Segment categories, the key routes are ordered by
    pub fn priority(&self) -> Vec<PatternCategory> {
        self.segments.iter().map(RouteSegment::category).collect()
    }

    /// Whether the route has no parameters at all
    pub fn is_static(&self) -> bool {
        self.params.is_empty()
    }

    pub fn has_wildcard(&self) -> bool {
        self.segments.last().is_some_and(RouteSegment::is_wildcard)
    }

    /// Matches this route against a path (case-sensitive)
    pub fn matches(&self, path: &str) -> Option<Params> {
        self.matches_with_options(path, false)
    }

    /// Matches this route against a path with options
    ///
    /// The path is normalized first, so `/users//42/` matches like
    /// `/users/42`.
    pub fn matches_with_options(&self, path: &str, case_insensitive: bool) -> Option<Params> {
        let path = path::normalize(path);
        let parts: Vec<&str> = path::segments(&path).collect();
        self.match_segments(&parts, case_insensitive)
    }

    /// Matches already split path segments
    pub fn match_segments(&self, parts: &[&str], case_insensitive: bool) -> Option<Params> {
        let mut params = Params::new();

        for (index, segment) in self.segments.iter().enumerate() {
            if segment.is_wildcard() {
                let rest = parts.get(index..).unwrap_or_default();
                params.set(WILDCARD_PARAM, rest.join("/"));
                return Some(params);
            }

            let part = parts.get(index)?;
            if !segment.accept(part, case_insensitive, &mut params) {
                return None;
            }
        }

        (parts.len() == self.segments.len()).then_some(params)
    }

    /// Generates a URL for this route by substituting parameters
    ///
    /// Returns `None` if any parameter is missing, the wildcard `*`
    /// included; pass `*` as `""` for an empty tail. Values are inserted
    /// verbatim; constraints are not re-checked.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_pattern::{Params, Route};
    ///
    /// let route = Route::parse("/docs/{version}/*").unwrap();
    /// let params: Params = [("version", "v2"), ("*", "guide/intro")].into_iter().collect();
    ///
    /// assert_eq!(route.generate_url(&params).unwrap(), "/docs/v2/guide/intro");
    /// ```
    pub fn generate_url(&self, params: &Params) -> Option<String> {
        let mut url = String::new();

        for segment in &self.segments {
            let fragment = match segment.matcher() {
                Matcher::Static(text) => text.clone(),
                Matcher::Wildcard => params.get(WILDCARD_PARAM)?.to_string(),
                Matcher::Param { name, .. } => params.get(name)?.to_string(),
                Matcher::Pattern { .. } | Matcher::Split(_) => pieces(segment.segment().value())
                    .into_iter()
                    .map(|piece| match piece {
                        Piece::Literal(text) => Some(text),
                        Piece::Param { name, .. } => params.get(name),
                    })
                    .collect::<Option<String>>()?,
            };

            if !fragment.is_empty() {
                url.push('/');
                url.push_str(&fragment);
            }
        }

        if url.is_empty() {
            url.push('/');
        }
        Some(url)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Sets a name for this route (for URL generation)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets a metadata key-value pair
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

// ============================================================================
// Router
// ============================================================================

/// Ordered route table bound to one interceptor registry
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
    registry: Arc<InterceptorRegistry>,
    case_insensitive: bool,
    normalize_paths: bool,
}

impl Router {
    /// Creates a router using the process-wide interceptor registry
    pub fn new() -> Self {
        Self::with_registry(intercept::global())
    }

    /// Creates a router using `registry` for interceptor lookups
    ///
    /// Tests should pass a fresh registry so they do not depend on what
    /// other tests registered globally.
    pub fn with_registry(registry: Arc<InterceptorRegistry>) -> Self {
        Self {
            routes: Vec::new(),
            registry,
            case_insensitive: false,
            normalize_paths: true,
        }
    }

    /// Creates a router with a private registry seeded from `config`
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_pattern::{Router, RouterConfig};
    ///
    /// let config = RouterConfig::from_toml_str(
    ///     "[interceptors]\nregex_aliases = true\n",
    /// ).unwrap();
    /// let router = Router::from_config(&config);
    ///
    /// assert!(router.registry().contains("\\d+"));
    /// ```
    pub fn from_config(config: &RouterConfig) -> Self {
        Self {
            routes: Vec::new(),
            registry: Arc::new(InterceptorRegistry::from_config(&config.interceptors)),
            case_insensitive: config.routing.case_insensitive,
            normalize_paths: config.routing.normalize_paths,
        }
    }

    /// Builder form of case sensitivity
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    pub fn registry(&self) -> &Arc<InterceptorRegistry> {
        &self.registry
    }

    /// Compiles and adds a route
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_pattern::Router;
    ///
    /// let mut router = Router::new();
    /// router.add_route("/users/{id}").unwrap();
    /// router.add_route("/users/new").unwrap();
    ///
    /// // static routes are tried first whatever the insertion order
    /// let m = router.match_route("/users/new").unwrap();
    /// assert_eq!(m.route.pattern, "/users/new");
    ///
    /// assert!(router.add_route("/users/{id").is_err());
    /// ```
    pub fn add_route(&mut self, pattern: &str) -> Result<(), PatternError> {
        let route = Route::parse_with(pattern, &self.registry)?;
        self.insert(route);
        Ok(())
    }

    /// Builder form of [`add_route`](Self::add_route)
    pub fn with_route(mut self, pattern: &str) -> Result<Self, PatternError> {
        self.add_route(pattern)?;
        Ok(self)
    }

    /// Adds an already compiled route, after every route of equal or higher
    /// priority
    pub fn insert(&mut self, route: Route) {
        if self.routes.iter().any(|r| r.pattern == route.pattern) {
            warn!(pattern = %route.pattern, "route added twice; the later one is unreachable");
        }

        let priority = route.priority();
        let position = self
            .routes
            .partition_point(|existing| existing.priority() <= priority);

        debug!(pattern = %route.pattern, position, "added route");
        self.routes.insert(position, route);
    }

    /// Removes the first route with exactly this pattern
    pub fn remove_route(&mut self, pattern: &str) -> Option<Route> {
        let index = self.routes.iter().position(|r| r.pattern == pattern)?;
        debug!(pattern, "removed route");
        Some(self.routes.remove(index))
    }

    /// Finds the first route, in priority order, that matches `path`
    pub fn match_route(&self, path: &str) -> Option<RouteMatch<'_>> {
        let path = if self.normalize_paths {
            path::normalize(path)
        } else {
            path.into()
        };
        let parts: Vec<&str> = path::segments(&path).collect();

        let found = self.routes.iter().find_map(|route| {
            route
                .match_segments(&parts, self.case_insensitive)
                .map(|params| RouteMatch { route, params })
        });

        trace!(path = %path, matched = ?found.as_ref().map(|m| &m.route.pattern), "match attempt");
        found
    }

    /// Routes in matching order
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn get_route_by_name(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name.as_deref() == Some(name))
    }

    /// Generates a URL for the named route
    pub fn url_for(&self, name: &str, params: &Params) -> Option<String> {
        self.get_route_by_name(name)?.generate_url(params)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
