//! `listen` directive parsing.
//!
//! # Responsibilities
//! - Split the first token into bind address and port
//! - Keep the trailing flags (`ssl`, `default_server`, ...)
//! - Answer port/address questions for the capability predicates
//!
//! # Design Decisions
//! - The port stays textual: `unix:` sockets and bare addresses have none
//! - Address matching is literal: `ip:port` must name the resolved address,
//!   and only a bare port token accepts every address. `*:80` and
//!   `0.0.0.0:80` name an address like any other

use std::fmt;
use std::net::Ipv4Addr;

use serde::Serialize;

const ENCRYPTED_FLAG: &str = "ssl";
const DEFAULT_FLAGS: [&str; 2] = ["default_server", "default"];

/// One parsed `listen` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListenSpec {
    /// Bind address, if one was given.
    pub address: Option<String>,
    /// Port token (empty for unix sockets and bare addresses).
    pub port: String,
    /// Every token after the address/port, in order.
    pub flags: Vec<String>,
}

impl ListenSpec {
    /// Parse the tokens following the `listen` keyword.
    ///
    /// Returns `None` when there are no tokens at all.
    pub fn parse(tokens: &[String]) -> Option<Self> {
        let (first, rest) = tokens.split_first()?;
        let (address, port) = split_address(first);
        Some(Self {
            address,
            port,
            flags: rest.to_vec(),
        })
    }

    /// True if this directive carries the encryption flag.
    pub fn is_encrypted(&self) -> bool {
        self.has_flag(ENCRYPTED_FLAG)
    }

    /// True if this directive carries a default-server marker.
    pub fn is_default(&self) -> bool {
        DEFAULT_FLAGS.iter().any(|f| self.has_flag(f))
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    /// The directive listens on `port`, whatever the address.
    pub fn binds_port(&self, port: u16) -> bool {
        !self.port.is_empty() && self.port == port.to_string()
    }

    /// The directive names exactly `ip:port`.
    pub fn binds_exact(&self, ip: Ipv4Addr, port: u16) -> bool {
        self.binds_port(port) && self.address.as_deref() == Some(ip.to_string().as_str())
    }

    /// The directive is the bare port token, with no address.
    pub fn binds_bare_port(&self, port: u16) -> bool {
        self.address.is_none() && self.binds_port(port)
    }

    /// The directive accepts connections to `ip:port`.
    pub fn accepts(&self, ip: Ipv4Addr, port: u16) -> bool {
        self.binds_exact(ip, port) || self.binds_bare_port(port)
    }
}

impl fmt::Display for ListenSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.address, self.port.is_empty()) {
            (Some(addr), true) => write!(f, "{}", addr)?,
            (Some(addr), false) => write!(f, "{}:{}", addr, self.port)?,
            (None, _) => write!(f, "{}", self.port)?,
        }
        for flag in &self.flags {
            write!(f, "/{}", flag)?;
        }
        Ok(())
    }
}

/// Split `addr:port`, `[v6]:port`, `port`, `addr` or `unix:path`.
fn split_address(token: &str) -> (Option<String>, String) {
    if token.starts_with("unix:") {
        return (Some(token.to_string()), String::new());
    }
    if token.starts_with('[') {
        return match token.rsplit_once("]:") {
            Some((addr, port)) => (Some(format!("{}]", addr)), port.to_string()),
            None => (Some(token.to_string()), String::new()),
        };
    }
    if token.chars().all(|c| c.is_ascii_digit()) {
        return (None, token.to_string());
    }
    match token.rsplit_once(':') {
        Some((addr, port)) => (Some(addr.to_string()), port.to_string()),
        None => (Some(token.to_string()), String::new()),
    }
}
