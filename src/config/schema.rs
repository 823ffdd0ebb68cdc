//! Settings schema definitions.
//!
//! This module defines the settings file understood by the finder.
//! All types derive Serde traits and every field has a default, so an
//! empty file (or no file at all) is valid.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root settings for the finder.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FinderSettings {
    /// Directory that relative include patterns are retried under.
    pub include_root: PathBuf,

    /// DNS lookup settings.
    pub resolver: ResolverSettings,

    /// Parsing limits.
    pub limits: LimitSettings,

    /// Logging settings.
    pub observability: ObservabilitySettings,
}

impl Default for FinderSettings {
    fn default() -> Self {
        Self {
            include_root: PathBuf::from("/etc/nginx"),
            resolver: ResolverSettings::default(),
            limits: LimitSettings::default(),
            observability: ObservabilitySettings::default(),
        }
    }
}

/// DNS lookup settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Lookup deadline in seconds.
    pub timeout_secs: u64,
}

impl ResolverSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self { timeout_secs: 5 }
    }
}

/// Parsing limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitSettings {
    /// Maximum include nesting.
    pub max_include_depth: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_include_depth: crate::nginx::loader::DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilitySettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
