//! Virtual host subsystem.
//!
//! # Data Flow
//! ```text
//! server {} block lines
//!     → record.rs (server_name patterns + listen.rs specs)
//!     → ServerRecord (immutable)
//!
//! Query (hostname, ip, protocol, port)
//!     → matcher.rs (listen filter, then five precedence passes)
//!     → Return: VhostMatch or no match
//! ```
//!
//! # Design Decisions
//! - Records are built once at startup and only read afterwards
//! - Matching is deterministic: declaration order breaks every tie
//! - No match is an ordinary outcome, not an error

pub mod listen;
pub mod matcher;
pub mod record;

pub use listen::ListenSpec;
pub use matcher::{InvalidPattern, MatchKind, MatchRequest, Matcher, RegexOutcome, VhostMatch};
pub use record::{build_records, ServerRecord};
