//! Constraint interceptors
//!
//! An interceptor is a predicate installed under a constraint body (the
//! text between `:` and `}` in `{id:\d+}`). When a route is compiled, every
//! `{name:body}` whose body has an interceptor is matched by calling the
//! predicate instead of running a regex, and the fragment drops from
//! `Regex` to `Named` priority.
//!
//! # Priority hazard
//!
//! Demotion is keyed on the *exact* body text. `{id:\d+}` and
//! `{id:[0-9]+}` mean the same thing, but if only `\d+` is intercepted the
//! first becomes `Named` while the second stays `Regex` and is tried before
//! it. Register every spelling you use, or keep one spelling per router.
//! The router keeps insertion order among equal priorities so the outcome
//! is at least deterministic.
//!
//! # Examples
//!
//! ```
//! use rhtmx_pattern::InterceptorRegistry;
//!
//! let registry = InterceptorRegistry::new();
//! registry
//!     .register(|s: &str| s.len() == 36, &["uuid"])
//!     .unwrap();
//!
//! let uuid = registry.lookup("uuid").unwrap();
//! assert!(uuid("67e55044-10b1-426f-9247-bb680e5fe0c8"));
//! assert!(registry.register(|_: &str| true, &["uuid"]).is_err());
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::config::InterceptorConfig;
use crate::constraint::{match_digit, match_word};
use crate::error::RegistryError;

/// Predicate run on a captured parameter value
pub type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Key of the built-in digit interceptor
pub const DIGIT_KEY: &str = "digit";
/// Key of the built-in word interceptor
pub const WORD_KEY: &str = "word";

/// Regex spellings covered by the built-ins when `regex_aliases` is on
const DIGIT_ALIASES: [&str; 2] = [r"\d+", "[0-9]+"];
const WORD_ALIASES: [&str; 1] = ["[a-zA-Z0-9]+"];

static GLOBAL: Lazy<Arc<InterceptorRegistry>> =
    Lazy::new(|| Arc::new(InterceptorRegistry::with_builtins()));

/// Thread-safe map from constraint body to predicate
///
/// Each operation on a single key takes the lock for exactly one map
/// operation, so lookups and registrations never wait on each other for
/// longer than that.
pub struct InterceptorRegistry {
    entries: RwLock<HashMap<String, Predicate>>,
}

impl InterceptorRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a registry holding the built-in interceptors
    ///
    /// - `"digit"` → [`match_digit`]
    /// - `"word"` → [`match_word`]
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_pattern::InterceptorRegistry;
    ///
    /// let registry = InterceptorRegistry::with_builtins();
    /// assert!(registry.lookup("digit").unwrap()("42"));
    /// assert!(registry.lookup("word").unwrap()("abc42"));
    /// ```
    pub fn with_builtins() -> Self {
        Self::from_config(&InterceptorConfig::default())
    }

    /// Creates a registry seeded according to `config`
    pub fn from_config(config: &InterceptorConfig) -> Self {
        let mut entries: HashMap<String, Predicate> = HashMap::new();

        if config.builtins {
            let digit: Predicate = Arc::new(match_digit);
            let word: Predicate = Arc::new(match_word);

            entries.insert(DIGIT_KEY.to_string(), Arc::clone(&digit));
            entries.insert(WORD_KEY.to_string(), Arc::clone(&word));

            if config.regex_aliases {
                for key in DIGIT_ALIASES {
                    entries.insert(key.to_string(), Arc::clone(&digit));
                }
                for key in WORD_ALIASES {
                    entries.insert(key.to_string(), Arc::clone(&word));
                }
            }
        }

        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Registers `predicate` under every key in `keys`
    ///
    /// Keys are inserted one at a time. If a key is already taken the call
    /// stops with [`RegistryError::DuplicateKey`]; keys inserted earlier in
    /// the same call stay registered.
    ///
    /// # Panics
    ///
    /// Panics if `keys` is empty. Registering nothing is a programming
    /// error, not a runtime condition.
    pub fn register<F>(&self, predicate: F, keys: &[&str]) -> Result<(), RegistryError>
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.register_predicate(Arc::new(predicate), keys)
    }

    /// Registers an already shared predicate, see [`register`](Self::register)
    pub fn register_predicate(
        &self,
        predicate: Predicate,
        keys: &[&str],
    ) -> Result<(), RegistryError> {
        assert!(
            !keys.is_empty(),
            "InterceptorRegistry::register called with an empty key list"
        );

        for &key in keys {
            match self.entries.write().entry(key.to_string()) {
                Entry::Occupied(_) => {
                    return Err(RegistryError::DuplicateKey {
                        key: key.to_string(),
                    })
                }
                Entry::Vacant(slot) => {
                    slot.insert(Arc::clone(&predicate));
                }
            }
            debug!(key, "registered route interceptor");
        }

        Ok(())
    }

    /// Removes every key in `keys`; unknown keys are ignored
    pub fn deregister(&self, keys: &[&str]) {
        for &key in keys {
            if self.entries.write().remove(key).is_some() {
                debug!(key, "deregistered route interceptor");
            }
        }
    }

    /// Returns the predicate registered under `key`
    pub fn lookup(&self, key: &str) -> Option<Predicate> {
        self.entries.read().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Registered keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for InterceptorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InterceptorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

// ============================================================================
// Process-wide registry
// ============================================================================

/// The process-wide registry, created with the built-ins on first use
pub fn global() -> Arc<InterceptorRegistry> {
    Arc::clone(&GLOBAL)
}

/// [`InterceptorRegistry::register`] on the process-wide registry
pub fn register<F>(predicate: F, keys: &[&str]) -> Result<(), RegistryError>
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    GLOBAL.register(predicate, keys)
}

/// [`InterceptorRegistry::deregister`] on the process-wide registry
pub fn deregister(keys: &[&str]) {
    GLOBAL.deregister(keys)
}

/// [`InterceptorRegistry::lookup`] on the process-wide registry
pub fn lookup(key: &str) -> Option<Predicate> {
    GLOBAL.lookup(key)
}
