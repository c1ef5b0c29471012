//! Route pattern syntax engine
//!
//! Pure functions over route pattern text, plus the compiler that joins
//! them with the interceptor registry:
//! - [`pattern`]: fragment classification
//! - [`validate`]: single-pass syntax checking
//! - [`prefix`]: trie-safe common prefix of two patterns
//! - [`parser`]: compilation into matchable segments

pub mod parser;
pub mod pattern;
pub mod prefix;
pub mod validate;

// Re-export commonly used types
pub use parser::{compile, RouteSegment, WILDCARD_PARAM};
pub use pattern::{classify, PatternCategory, Segment};
pub use prefix::safe_prefix;
pub use validate::{validate, validate_strict};
