//! Configuration reading subsystem.
//!
//! # Data Flow
//! ```text
//! nginx.conf (+ included files)
//!     → loader.rs (follow includes, strip comments, flatten)
//!     → Vec<ConfigLine> (text + file + line number)
//!     → block.rs (locate http {}, carve out server {} blocks)
//!     → &[ConfigLine] per server block
//!     → vhost::record (structured ServerRecord)
//! ```
//!
//! # Design Decisions
//! - Only `http`, `server`, `listen`, `server_name` and `include` are understood
//! - Structure is recovered from brace depth, not from a full grammar
//! - Every line keeps its origin so errors and reports can point at it

pub mod block;
pub mod error;
pub mod include;
pub mod lexer;
pub mod line;
pub mod loader;

pub use error::{ParseError, ParseResult};
pub use include::{GlobExpander, PathExpander};
pub use line::{ConfigLine, Location};
pub use loader::ConfigLoader;
