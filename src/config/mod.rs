//! Settings management subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → FinderSettings (validated, immutable)
//!     → command-line overrides applied by the binary, then validated again
//! ```
//!
//! # Design Decisions
//! - Settings are immutable once loaded
//! - All fields have defaults to allow minimal (or absent) files
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_settings, parse_settings, SettingsError};
pub use schema::{FinderSettings, LimitSettings, ObservabilitySettings, ResolverSettings};
pub use validation::{validate_settings, ValidationError};
