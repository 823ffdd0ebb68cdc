//! Offline nginx virtual host finder.
//!
//! Answers "which `server {}` block would handle this hostname?" from the
//! configuration files alone, following the server's own `server_name`
//! precedence.

pub mod config;
pub mod error;
pub mod finder;
pub mod net;
pub mod nginx;
pub mod observability;
pub mod report;
pub mod vhost;

pub use config::FinderSettings;
pub use error::{FinderError, FinderResult};
pub use finder::{Query, SearchOutcome, VhostFinder};
