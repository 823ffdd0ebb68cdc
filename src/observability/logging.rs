//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once, at startup
//! - Pick the verbosity from `--debug`, then settings, then `RUST_LOG`
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Logs go to stderr; stdout only ever carries the answer
//! - No global verbosity flag: the subscriber filter is the single source

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for the given verbosity.
///
/// `debug` wins over `level`; `RUST_LOG`, when set, wins over both.
pub fn filter_directive(level: &str, debug: bool) -> String {
    let level = if debug { "debug" } else { level };
    format!("vhost_finder={}", level.to_ascii_lowercase())
}

/// Install the global subscriber.
pub fn init_logging(level: &str, debug: bool) {
    let directive = filter_directive(level, debug);
    let filter = if debug {
        EnvFilter::new(directive)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| directive.into())
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive("info", false), "vhost_finder=info");
        assert_eq!(filter_directive("WARN", false), "vhost_finder=warn");
        assert_eq!(filter_directive("warn", true), "vhost_finder=debug");
    }
}
