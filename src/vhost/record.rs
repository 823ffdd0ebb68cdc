//! Server block records.
//!
//! # Responsibilities
//! - Build a `ServerRecord` from the lines of one `server {}` block
//! - Collect `server_name` patterns in declaration order
//! - Collect one `ListenSpec` per `listen` directive
//! - Evaluate which (ip, protocol, port) combinations a record can serve
//!
//! # Design Decisions
//! - Records are plain data, built once and never mutated
//! - Several `server_name` lines append; they never replace
//! - A block without `listen` serves plain traffic on any address and port

use std::net::Ipv4Addr;

use crate::nginx::lexer;
use crate::nginx::line::{ConfigLine, Location};
use crate::vhost::listen::ListenSpec;

/// Pattern that marks a catch-all server.
pub const DEFAULT_NAME: &str = "_";

/// A parsed `server {}` block.
#[derive(Debug, Clone)]
pub struct ServerRecord {
    /// Position of the block among all server blocks (0-based).
    pub index: usize,
    /// Host-name patterns, in declaration order.
    pub names: Vec<String>,
    /// One entry per `listen` directive.
    pub listens: Vec<ListenSpec>,
    /// Source lines of the block.
    pub lines: Vec<ConfigLine>,
}

impl ServerRecord {
    /// Parse the lines of one server block.
    pub fn from_block(index: usize, block: &[ConfigLine]) -> Self {
        let mut names = Vec::new();
        let mut listens = Vec::new();

        for line in block {
            for stmt in lexer::statements(&line.text) {
                let tokens = lexer::tokenize(stmt);
                let Some((directive, args)) = tokens.split_first() else {
                    continue;
                };
                match directive.as_str() {
                    "server_name" => names.extend(args.iter().cloned()),
                    "listen" => match ListenSpec::parse(args) {
                        Some(spec) => listens.push(spec),
                        None => tracing::warn!(at = %line.location(), "listen directive without arguments"),
                    },
                    _ => {}
                }
            }
        }

        Self {
            index,
            names,
            listens,
            lines: block.to_vec(),
        }
    }

    /// First declared name, or an empty string when there is none.
    pub fn primary_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or("")
    }

    /// Where the block starts.
    pub fn origin(&self) -> Option<Location> {
        self.lines.first().map(ConfigLine::location)
    }

    /// Serves unencrypted traffic on `port`.
    pub fn serves_plain(&self, port: u16) -> bool {
        self.listens.is_empty() || self.listens.iter().any(|l| l.binds_port(port))
    }

    /// Serves encrypted traffic on `port`.
    pub fn serves_encrypted(&self, port: u16) -> bool {
        self.listens
            .iter()
            .any(|l| l.is_encrypted() && l.binds_port(port))
    }

    /// Can take a connection to `ip:port` for the given protocol.
    pub fn can_serve(&self, ip: Ipv4Addr, encrypted: bool, port: u16) -> bool {
        if self.listens.is_empty() {
            return !encrypted;
        }
        let protocol = if encrypted {
            self.serves_encrypted(port)
        } else {
            self.serves_plain(port)
        };
        protocol && self.listens.iter().any(|l| l.accepts(ip, port))
    }

    /// Declares the `_` catch-all name.
    pub fn is_named_default(&self) -> bool {
        self.names.iter().any(|n| n == DEFAULT_NAME)
    }

    /// Is the default server for `ip:port` by way of its `listen` directives.
    pub fn is_listen_default(&self, ip: Ipv4Addr, port: u16) -> bool {
        self.listens
            .iter()
            .any(|l| l.binds_exact(ip, port) || (l.is_default() && l.binds_bare_port(port)))
    }
}

/// Build one record per server block, keeping block order.
pub fn build_records(blocks: &[&[ConfigLine]]) -> Vec<ServerRecord> {
    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| ServerRecord::from_block(index, block))
        .collect()
}
