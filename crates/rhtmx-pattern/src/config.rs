// File: src/config.rs
// Purpose: Router configuration parsing from TOML

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Router configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RouterConfig {
    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub interceptors: InterceptorConfig,
}

/// Request matching options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Compare static fragments ASCII case-insensitively (default: false)
    #[serde(default = "default_false")]
    pub case_insensitive: bool,

    /// Normalize request paths before matching (default: true)
    #[serde(default = "default_true")]
    pub normalize_paths: bool,
}

/// Which interceptors a router's private registry starts with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterceptorConfig {
    /// Install `digit` and `word` (default: true)
    #[serde(default = "default_true")]
    pub builtins: bool,

    /// Also install the built-ins under their usual regex spellings:
    /// `\d+`, `[0-9]+` and `[a-zA-Z0-9]+` (default: false)
    #[serde(default = "default_false")]
    pub regex_aliases: bool,
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            normalize_paths: true,
        }
    }
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            builtins: true,
            regex_aliases: false,
        }
    }
}

impl RouterConfig {
    /// Load configuration from a TOML file
    ///
    /// A missing or empty file yields the default configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read router config: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse router config: {:?}", path))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: RouterConfig = toml::from_str(content)?;
        Ok(config)
    }
}
