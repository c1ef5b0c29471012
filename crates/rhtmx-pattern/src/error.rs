//! Error types for pattern validation, interceptor registration and
//! parameter access.
//!
//! Every error carries enough context to produce a readable message on its
//! own: the offending pattern and byte offset for syntax errors, the key
//! for registry conflicts, the parameter name for accessor failures.

/// Syntax errors raised while validating or compiling a route pattern
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    /// `{` seen while a brace was already open
    #[error("nested brace at byte {position} in pattern '{pattern}'")]
    NestedBrace { pattern: String, position: usize },

    /// `:` outside of any brace
    #[error("stray ':' outside a parameter at byte {position} in pattern '{pattern}'")]
    StraySeparator { pattern: String, position: usize },

    /// `{}` or `{:...}`: a parameter without a name
    #[error("empty parameter name at byte {position} in pattern '{pattern}'")]
    EmptyName { pattern: String, position: usize },

    /// `}` without a matching `{`
    #[error("unmatched '}}' at byte {position} in pattern '{pattern}'")]
    UnmatchedClose { pattern: String, position: usize },

    /// The pattern ended while a brace opened at `position` was still open
    #[error("brace opened at byte {position} is never closed in pattern '{pattern}'")]
    UnclosedBrace { pattern: String, position: usize },

    /// `{name:}`: a constraint without a body
    #[error("empty constraint body at byte {position} in pattern '{pattern}'")]
    EmptyBody { pattern: String, position: usize },

    /// `/` inside a parameter; a parameter never spans path segments
    #[error("'/' inside a parameter at byte {position} in pattern '{pattern}'")]
    SlashInParam { pattern: String, position: usize },

    /// A constraint body that the regex engine rejects
    #[error("invalid constraint in fragment '{fragment}' of pattern '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        fragment: String,
        #[source]
        source: regex::Error,
    },

    /// The same parameter name appears twice in one route
    #[error("parameter '{name}' is declared more than once in pattern '{pattern}'")]
    DuplicateParam { pattern: String, name: String },
}

impl PatternError {
    /// Short kebab-case identifier of the error kind
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_pattern::validate;
    ///
    /// let err = validate("{{").unwrap_err();
    /// assert_eq!(err.kind(), "nested-brace");
    /// ```
    pub fn kind(&self) -> &'static str {
        match self {
            PatternError::NestedBrace { .. } => "nested-brace",
            PatternError::StraySeparator { .. } => "stray-separator",
            PatternError::EmptyName { .. } => "empty-name",
            PatternError::UnmatchedClose { .. } => "unmatched-close",
            PatternError::UnclosedBrace { .. } => "unclosed-brace",
            PatternError::EmptyBody { .. } => "empty-body",
            PatternError::SlashInParam { .. } => "slash-in-param",
            PatternError::InvalidRegex { .. } => "invalid-regex",
            PatternError::DuplicateParam { .. } => "duplicate-param",
        }
    }
}

/// Errors raised by the interceptor registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("an interceptor is already registered for '{key}'")]
    DuplicateKey { key: String },
}

/// Errors raised by the typed [`Params`](crate::Params) readers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("route parameter '{name}' not found")]
    NotFound { name: String },

    #[error("route parameter '{name}' = '{value}' is not a valid {expected}")]
    Parse {
        name: String,
        value: String,
        expected: &'static str,
    },
}

impl ParamError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ParamError::NotFound { .. })
    }
}
