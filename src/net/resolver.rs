//! Hostname resolution.
//!
//! # Responsibilities
//! - Turn the queried hostname into its IPv4 address
//! - Enforce a lookup deadline
//! - Refuse names with zero or several addresses
//!
//! # Design Decisions
//! - The `Resolver` trait is synchronous; `SystemResolver` drives a
//!   current-thread tokio runtime internally for the timeout
//! - Answers are de-duplicated, keeping the resolver's order
//! - `StaticResolver` answers from a table, for `--ip` and for tests

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use thiserror::Error;

/// Errors raised while resolving the queried hostname.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The lookup failed or returned no IPv4 address.
    #[error("unable to resolve {hostname}: {reason}")]
    ResolutionFailed { hostname: String, reason: String },

    /// The lookup did not finish in time.
    #[error("resolving {hostname} timed out after {} ms", .timeout.as_millis())]
    TimedOut { hostname: String, timeout: Duration },

    /// The hostname has more than one IPv4 address.
    #[error("{hostname} resolves to several addresses ({}); virtual hosts on multiple IPs are not supported", display_addrs(.addresses))]
    MultipleAddressesUnsupported {
        hostname: String,
        addresses: Vec<Ipv4Addr>,
    },
}

fn display_addrs(addrs: &[Ipv4Addr]) -> String {
    addrs
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Looks up the IPv4 addresses of a hostname.
pub trait Resolver {
    fn lookup(&self, hostname: &str) -> Result<Vec<Ipv4Addr>, ResolveError>;
}

/// Resolve `hostname` to exactly one address.
pub fn resolve_single<R: Resolver + ?Sized>(
    resolver: &R,
    hostname: &str,
) -> Result<Ipv4Addr, ResolveError> {
    let addresses = resolver.lookup(hostname)?;
    match addresses.as_slice() {
        [] => Err(ResolveError::ResolutionFailed {
            hostname: hostname.to_string(),
            reason: "no IPv4 address".to_string(),
        }),
        [ip] => Ok(*ip),
        _ => Err(ResolveError::MultipleAddressesUnsupported {
            hostname: hostname.to_string(),
            addresses,
        }),
    }
}

/// Resolver backed by the operating system (getaddrinfo).
#[derive(Debug, Clone)]
pub struct SystemResolver {
    timeout: Duration,
}

impl SystemResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Resolver for SystemResolver {
    fn lookup(&self, hostname: &str) -> Result<Vec<Ipv4Addr>, ResolveError> {
        let failed = |reason: String| ResolveError::ResolutionFailed {
            hostname: hostname.to_string(),
            reason,
        };

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| failed(e.to_string()))?;

        let answers = runtime
            .block_on(async {
                tokio::time::timeout(self.timeout, tokio::net::lookup_host((hostname, 0))).await
            })
            .map_err(|_| ResolveError::TimedOut {
                hostname: hostname.to_string(),
                timeout: self.timeout,
            })?
            .map_err(|e| failed(e.to_string()))?;

        let mut addresses = Vec::new();
        for addr in answers {
            if let IpAddr::V4(v4) = addr.ip() {
                if !addresses.contains(&v4) {
                    addresses.push(v4);
                }
            }
        }
        tracing::debug!(hostname, addresses = ?addresses, "resolved");
        Ok(addresses)
    }
}

/// Resolver answering from a fixed table.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    entries: HashMap<String, Vec<Ipv4Addr>>,
    fallback: Option<Ipv4Addr>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `ip` for every hostname not in the table.
    pub fn fixed(ip: Ipv4Addr) -> Self {
        Self {
            entries: HashMap::new(),
            fallback: Some(ip),
        }
    }

    /// Add (or replace) the answer for `hostname`.
    pub fn with(mut self, hostname: impl Into<String>, addresses: Vec<Ipv4Addr>) -> Self {
        self.entries.insert(hostname.into(), addresses);
        self
    }
}

impl Resolver for StaticResolver {
    fn lookup(&self, hostname: &str) -> Result<Vec<Ipv4Addr>, ResolveError> {
        if let Some(addresses) = self.entries.get(hostname) {
            return Ok(addresses.clone());
        }
        self.fallback
            .map(|ip| vec![ip])
            .ok_or_else(|| ResolveError::ResolutionFailed {
                hostname: hostname.to_string(),
                reason: "no such host".to_string(),
            })
    }
}
