//! Errors raised while reading and segmenting a configuration tree.

use std::path::PathBuf;
use thiserror::Error;

use crate::nginx::line::Location;

/// Errors that can occur while loading or splitting the configuration.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The root configuration file does not exist.
    #[error("configuration file not found: {}", .path.display())]
    ConfigNotFound { path: PathBuf },

    /// A file in the tree could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An include directive pulls in a file that is already being read.
    #[error("circular include at {at}: {}", display_chain(.chain))]
    CircularInclude { at: Location, chain: Vec<PathBuf> },

    /// Includes are nested deeper than the configured limit.
    #[error("include nesting deeper than {limit} at {at}")]
    IncludeDepthExceeded { at: Location, limit: usize },

    /// An include pattern is not a valid glob.
    #[error("invalid include pattern '{pattern}' at {at}: {source}")]
    InvalidIncludePattern {
        pattern: String,
        at: Location,
        #[source]
        source: globset::Error,
    },

    /// Braces do not balance.
    #[error("malformed configuration at {at}: {reason}")]
    MalformedConfig { at: Location, reason: String },

    /// No top-level `http {` block was found.
    #[error("no http block found in {}", .path.display())]
    MissingHttpBlock { path: PathBuf },
}

/// Result type for configuration parsing.
pub type ParseResult<T> = Result<T, ParseError>;

fn display_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
