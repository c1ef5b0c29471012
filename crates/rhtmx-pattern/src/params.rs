//! Captured route parameters
//!
//! Values are kept as captured strings, in capture order. Typed readers come
//! in two flavours:
//!
//! - strict (`int`, `uint`, ...) return a [`ParamError`] when the parameter
//!   is missing or does not parse;
//! - fallback (`int_or`, `uint_or`, ...) return the given default instead
//!   and never fail.

use std::str::FromStr;

use crate::error::ParamError;

/// Ordered name → value mapping filled in by a route match
///
/// # Examples
///
/// ```
/// use rhtmx_pattern::Params;
///
/// let mut params = Params::new();
/// params.set("key1", "1");
///
/// assert_eq!(params.int("key1"), Ok(1));
/// assert!(params.int("missing").unwrap_err().is_not_found());
/// assert_eq!(params.int_or("missing", -10), -10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Raw value of `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets `name`, replacing an existing value in place
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Iterates `(name, value)` pairs in capture order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    // ========================================================================
    // Strict readers
    // ========================================================================

    pub fn string(&self, name: &str) -> Result<&str, ParamError> {
        self.get(name).ok_or_else(|| ParamError::NotFound {
            name: name.to_string(),
        })
    }

    pub fn int(&self, name: &str) -> Result<i64, ParamError> {
        self.parse(name, "integer")
    }

    /// Unsigned integer; a leading `-` is a parse error
    pub fn uint(&self, name: &str) -> Result<u64, ParamError> {
        self.parse(name, "unsigned integer")
    }

    pub fn float(&self, name: &str) -> Result<f64, ParamError> {
        self.parse(name, "float")
    }

    /// Boolean; accepts `1 t T TRUE true True` and `0 f F FALSE false False`
    pub fn bool(&self, name: &str) -> Result<bool, ParamError> {
        let value = self.string(name)?;
        parse_bool(value).ok_or_else(|| ParamError::Parse {
            name: name.to_string(),
            value: value.to_string(),
            expected: "boolean",
        })
    }

    // ========================================================================
    // Fallback readers
    // ========================================================================

    pub fn string_or(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or(default).to_string()
    }

    pub fn int_or(&self, name: &str, default: i64) -> i64 {
        self.int(name).unwrap_or(default)
    }

    pub fn uint_or(&self, name: &str, default: u64) -> u64 {
        self.uint(name).unwrap_or(default)
    }

    pub fn float_or(&self, name: &str, default: f64) -> f64 {
        self.float(name).unwrap_or(default)
    }

    pub fn bool_or(&self, name: &str, default: bool) -> bool {
        self.bool(name).unwrap_or(default)
    }

    fn parse<T: FromStr>(&self, name: &str, expected: &'static str) -> Result<T, ParamError> {
        let value = self.string(name)?;
        value.parse().map_err(|_| ParamError::Parse {
            name: name.to_string(),
            value: value.to_string(),
            expected,
        })
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (name, value) in iter {
            params.set(name, value);
        }
        params
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
