//! End-to-end lookup: configuration tree in, server block out.
//!
//! # Data Flow
//! ```text
//! config path
//!     → nginx::loader (flattened lines)
//!     → nginx::block (http body, server blocks)
//!     → vhost::record (ServerRecord list, built once)
//!
//! Query (hostname, protocol, port)
//!     → net::resolver (exactly one IPv4 address)
//!     → vhost::matcher (five passes)
//!     → SearchOutcome::Found / SearchOutcome::NoMatch
//! ```

use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use crate::net::{resolve_single, ResolveError, Resolver};
use crate::nginx::{block, ConfigLine, ConfigLoader, ParseResult, PathExpander};
use crate::vhost::{build_records, MatchRequest, Matcher, ServerRecord, VhostMatch};

/// Default port for plain traffic.
pub const HTTP_PORT: u16 = 80;
/// Default port for encrypted traffic.
pub const HTTPS_PORT: u16 = 443;

/// What the operator asked for.
#[derive(Debug, Clone, Copy)]
pub struct Query<'h> {
    pub hostname: &'h str,
    pub encrypted: bool,
    /// Explicit port; the protocol's default when `None`.
    pub port: Option<u16>,
}

impl<'h> Query<'h> {
    pub fn new(hostname: &'h str) -> Self {
        Self {
            hostname,
            encrypted: false,
            port: None,
        }
    }

    pub fn encrypted(mut self, encrypted: bool) -> Self {
        self.encrypted = encrypted;
        self
    }

    pub fn port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// The port actually matched against.
    pub fn effective_port(&self) -> u16 {
        match (self.port, self.encrypted) {
            (Some(port), _) => port,
            (None, true) => HTTPS_PORT,
            (None, false) => HTTP_PORT,
        }
    }
}

/// Span that carries one query through loading, extraction and matching.
///
/// Enter it before `VhostFinder::load` so every event of the lookup is
/// tagged with the hostname.
pub fn search_span(query: &Query<'_>) -> tracing::Span {
    tracing::info_span!(
        "search",
        hostname = query.hostname,
        encrypted = query.encrypted,
        port = query.effective_port()
    )
}

/// Result of a search that got as far as matching.
#[derive(Debug, Clone, Copy)]
pub enum SearchOutcome<'a> {
    Found {
        ip: Ipv4Addr,
        port: u16,
        matched: VhostMatch<'a>,
    },
    NoMatch {
        ip: Ipv4Addr,
        port: u16,
    },
}

/// Parsed server blocks of one configuration tree.
#[derive(Debug, Clone)]
pub struct VhostFinder {
    root: PathBuf,
    records: Vec<ServerRecord>,
}

impl VhostFinder {
    /// Read the tree rooted at `path` and build every server record.
    pub fn load<E: PathExpander>(path: &Path, loader: &ConfigLoader<E>) -> ParseResult<Self> {
        let lines = loader.load(path)?;
        Self::from_lines(path, &lines)
    }

    /// Build records from already flattened lines.
    pub fn from_lines(root: &Path, lines: &[ConfigLine]) -> ParseResult<Self> {
        let items = block::split_lines(lines);
        let body = block::http_block(&items, root)?;
        let blocks = block::server_blocks(body)?;
        let records = build_records(&blocks);
        tracing::debug!(records = records.len(), root = %root.display(), "server records built");
        Ok(Self {
            root: root.to_path_buf(),
            records,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn records(&self) -> &[ServerRecord] {
        &self.records
    }

    /// Resolve the hostname, then select its server block.
    pub fn search<R: Resolver + ?Sized>(
        &self,
        resolver: &R,
        query: &Query<'_>,
    ) -> Result<SearchOutcome<'_>, ResolveError> {
        let ip = resolve_single(resolver, query.hostname)?;
        let port = query.effective_port();
        let request = MatchRequest {
            hostname: query.hostname,
            ip,
            encrypted: query.encrypted,
            port,
        };

        match Matcher::new(&self.records).find(&request) {
            Some(matched) => {
                tracing::info!(
                    kind = %matched.kind,
                    name = matched.record.primary_name(),
                    block = matched.record.index,
                    "server block selected"
                );
                Ok(SearchOutcome::Found { ip, port, matched })
            }
            None => {
                tracing::info!(%ip, port, "no server block matches");
                Ok(SearchOutcome::NoMatch { ip, port })
            }
        }
    }
}
