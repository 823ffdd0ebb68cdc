//! Network lookups.
//!
//! # Data Flow
//! ```text
//! Queried hostname
//!     → resolver.rs (system DNS with deadline, or a static table)
//!     → exactly one Ipv4Addr, or a ResolveError naming the host
//! ```
//!
//! # Design Decisions
//! - Resolution happens once per query, before any matching pass
//! - More than one address is refused rather than guessed at

pub mod resolver;

pub use resolver::{resolve_single, ResolveError, Resolver, StaticResolver, SystemResolver};
