//! Paging limits and their configuration sources.
//!
//! # Environment Variables
//!
//! | Variable                         | Default | Description                          |
//! |----------------------------------|---------|--------------------------------------|
//! | `SKYVAULT_PAGING_DEFAULT_LIMIT`  | 100     | Page size when the request omits one |
//! | `SKYVAULT_PAGING_MAX_LIMIT`      | 1000    | Largest page size a request can get  |
//! | `SKYVAULT_PAGING_MAX_CURSOR_LEN` | 1024    | Longest cursor string accepted       |
//!
//! The same keys (kebab-case, without the prefix) are accepted from TOML:
//!
//! ```
//! use skyvault_paging::PagingConfig;
//!
//! let config = PagingConfig::from_toml_str("max-limit = 250").unwrap();
//! assert_eq!(config.max_limit, 250);
//! assert_eq!(config.default_limit, 100);
//! ```

use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::Error;

const DEFAULT_LIMIT_VAR: &str = "SKYVAULT_PAGING_DEFAULT_LIMIT";
const MAX_LIMIT_VAR: &str = "SKYVAULT_PAGING_MAX_LIMIT";
const MAX_CURSOR_LEN_VAR: &str = "SKYVAULT_PAGING_MAX_CURSOR_LEN";

/// Page size used when the request does not ask for one.
pub const DEFAULT_LIMIT: u32 = 100;

/// Upper bound for a requested page size.
pub const MAX_LIMIT: u32 = 1000;

/// Maximum accepted cursor length in bytes.
///
/// A cursor carries an id and at most one name, base64-wrapped; file names
/// are capped at 255 bytes upstream, so 1KB leaves room for escaping.
pub const MAX_CURSOR_LEN: usize = 1024;

/// Cached process-wide configuration.
static GLOBAL: OnceLock<PagingConfig> = OnceLock::new();

/// Limits applied while normalizing requests and decoding cursors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct PagingConfig {
    /// Page size used when the request omits one or asks for `<= 0`.
    pub default_limit: u32,
    /// Largest page size; larger requests are clamped.
    pub max_limit: u32,
    /// Longest cursor string accepted by the codec.
    pub max_cursor_len: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
            max_cursor_len: MAX_CURSOR_LEN,
        }
    }
}

impl PagingConfig {
    /// Process-wide configuration.
    ///
    /// Reads the environment on first call; later environment changes have
    /// no effect. An invalid environment falls back to the defaults.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(|| {
            let config = Self::from_env();
            match config.validate() {
                Ok(()) => config,
                Err(err) => {
                    tracing::warn!(%err, "ignoring paging environment overrides");
                    Self::default()
                },
            }
        })
    }

    /// Defaults overridden by `SKYVAULT_PAGING_*` environment variables.
    ///
    /// Unparseable values are logged and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (environment-style names).
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_override(DEFAULT_LIMIT_VAR, lookup(DEFAULT_LIMIT_VAR)) {
            self.default_limit = v;
        }
        if let Some(v) = parse_override(MAX_LIMIT_VAR, lookup(MAX_LIMIT_VAR)) {
            self.max_limit = v;
        }
        if let Some(v) = parse_override(MAX_CURSOR_LEN_VAR, lookup(MAX_CURSOR_LEN_VAR)) {
            self.max_cursor_len = v;
        }
        self
    }

    /// Reject limits that would make every request fail or misbehave.
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_limit == 0 {
            return Err(Error::Config("max-limit must be at least 1".into()));
        }
        if self.default_limit == 0 {
            return Err(Error::Config("default-limit must be at least 1".into()));
        }
        if self.default_limit > self.max_limit {
            return Err(Error::Config(format!(
                "default-limit ({}) exceeds max-limit ({})",
                self.default_limit, self.max_limit
            )));
        }
        if self.max_cursor_len == 0 {
            return Err(Error::Config("max-cursor-len must be at least 1".into()));
        }
        Ok(())
    }

    /// Clamp a requested page size into `[1, max_limit]`.
    ///
    /// Non-positive requests get `default_limit`.
    #[must_use]
    pub fn clamp_limit(&self, requested: i64) -> u32 {
        let max = self.max_limit.max(1);
        if requested <= 0 {
            return self.default_limit.clamp(1, max);
        }
        u32::try_from(requested).map_or(max, |limit| limit.min(max))
    }
}

fn parse_override<T: FromStr>(key: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable paging override");
            None
        },
    }
}
