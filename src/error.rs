//! Top-level error type and process exit codes.

use thiserror::Error;

use crate::config::SettingsError;
use crate::net::ResolveError;
use crate::nginx::ParseError;

/// A matching server block was found.
pub const EXIT_FOUND: u8 = 0;
/// The configuration could not be read or segmented.
pub const EXIT_CONFIG: u8 = 1;
/// No server block answers for the hostname.
pub const EXIT_NO_MATCH: u8 = 2;
/// The hostname could not be resolved to a single address.
pub const EXIT_RESOLUTION: u8 = 3;
/// The settings file is unreadable or invalid.
pub const EXIT_SETTINGS: u8 = 4;
/// Bad command-line usage.
pub const EXIT_USAGE: u8 = 64;

/// Any fatal failure of a lookup.
#[derive(Debug, Error)]
pub enum FinderError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl FinderError {
    /// Exit code reported for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            FinderError::Settings(_) => EXIT_SETTINGS,
            FinderError::Parse(_) => EXIT_CONFIG,
            FinderError::Resolve(_) => EXIT_RESOLUTION,
        }
    }
}

/// Result type for end-to-end lookups.
pub type FinderResult<T> = Result<T, FinderError>;
