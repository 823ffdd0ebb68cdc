//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! loader / extractor / matcher
//!     → tracing events (debug per pass, warn for skipped input)
//!     → logging.rs subscriber (EnvFilter + fmt layer on stderr)
//! ```
//!
//! # Design Decisions
//! - Structured fields (file, line, hostname, ip, port) on every event
//! - A `search` span carries the query through all subsystems
//! - Configured exactly once by the binary

pub mod logging;
