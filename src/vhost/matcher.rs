//! Virtual host selection.
//!
//! # Responsibilities
//! - Keep only the records that can serve the (ip, protocol, port) triple
//! - Pick one record following the server's `server_name` precedence:
//!   1. exact name
//!   2. longest wildcard starting with an asterisk (`*.example.com`, `.example.com`)
//!   3. longest wildcard ending with an asterisk (`www.example.*`)
//!   4. first matching regular expression, in declaration order
//!   5. default server (`_` or a `listen ... default_server`)
//!
//! # Design Decisions
//! - "Longest" is measured in dots; ties keep the first record declared
//! - An invalid regular expression is reported and skipped, never fatal
//! - The default pass only looks at records that passed the listen filter

use std::fmt;
use std::net::Ipv4Addr;

use fancy_regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::vhost::record::ServerRecord;

/// The question being asked of the configuration.
#[derive(Debug, Clone, Copy)]
pub struct MatchRequest<'h> {
    pub hostname: &'h str,
    pub ip: Ipv4Addr,
    pub encrypted: bool,
    pub port: u16,
}

/// Which pass produced the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchKind {
    Exact,
    LeadingWildcard,
    TrailingWildcard,
    Regex,
    Default,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchKind::Exact => "exact name",
            MatchKind::LeadingWildcard => "wildcard starting with an asterisk",
            MatchKind::TrailingWildcard => "wildcard ending with an asterisk",
            MatchKind::Regex => "regular expression",
            MatchKind::Default => "default server",
        };
        f.write_str(name)
    }
}

/// The selected record and why it won.
#[derive(Debug, Clone, Copy)]
pub struct VhostMatch<'a> {
    pub record: &'a ServerRecord,
    pub kind: MatchKind,
    /// The pattern that matched; `None` for the default pass.
    pub pattern: Option<&'a str>,
}

/// A record/pattern pair that hit during a wildcard pass.
#[derive(Debug, Clone, Copy)]
pub struct MatchCandidate<'a> {
    pub record: &'a ServerRecord,
    pub pattern: &'a str,
    /// Dot count of the pattern.
    pub specificity: Option<usize>,
}

/// A `~` pattern that cannot be compiled or evaluated.
#[derive(Debug, Clone, Error)]
#[error("invalid server_name regex '{pattern}': {reason}")]
pub struct InvalidPattern {
    pub pattern: String,
    pub reason: String,
}

/// Result of testing one regular expression against the hostname.
#[derive(Debug, Clone)]
pub enum RegexOutcome {
    Matched,
    NoMatch,
    Invalid(InvalidPattern),
}

/// Evaluate a `server_name` regular expression (without the leading `~`).
pub fn test_regex(pattern: &str, hostname: &str) -> RegexOutcome {
    let invalid = |reason: String| {
        RegexOutcome::Invalid(InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        })
    };
    let regex = match Regex::new(pattern) {
        Ok(r) => r,
        Err(e) => return invalid(e.to_string()),
    };
    match regex.is_match(hostname) {
        Ok(true) => RegexOutcome::Matched,
        Ok(false) => RegexOutcome::NoMatch,
        Err(e) => invalid(e.to_string()),
    }
}

/// Selects the server block that would answer a request.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    records: &'a [ServerRecord],
}

impl<'a> Matcher<'a> {
    pub fn new(records: &'a [ServerRecord]) -> Self {
        Self { records }
    }

    /// Run every pass in order and return the first winner.
    pub fn find(&self, req: &MatchRequest<'_>) -> Option<VhostMatch<'a>> {
        let candidates = self.candidates(req);
        tracing::debug!(
            ip = %req.ip,
            port = req.port,
            encrypted = req.encrypted,
            candidates = candidates.len(),
            "pre-selected server blocks able to serve the request"
        );

        tracing::debug!("1st pass: exact names");
        if let Some(m) = exact(&candidates, req.hostname) {
            return Some(m);
        }

        tracing::debug!("2nd pass: longest wildcard name starting with an asterisk");
        if let Some(m) = leading_wildcard(&candidates, req.hostname) {
            return Some(m);
        }

        tracing::debug!("3rd pass: longest wildcard name ending with an asterisk");
        if let Some(m) = trailing_wildcard(&candidates, req.hostname) {
            return Some(m);
        }

        tracing::debug!("4th pass: first matching regular expression");
        if let Some(m) = first_regex(&candidates, req.hostname) {
            return Some(m);
        }

        tracing::debug!("5th pass: default server");
        fallback(&candidates, req.ip, req.port)
    }

    /// Records able to serve the request, in declaration order.
    pub fn candidates(&self, req: &MatchRequest<'_>) -> Vec<&'a ServerRecord> {
        self.records
            .iter()
            .filter(|r| r.can_serve(req.ip, req.encrypted, req.port))
            .collect()
    }
}

fn exact<'a>(candidates: &[&'a ServerRecord], hostname: &str) -> Option<VhostMatch<'a>> {
    candidates.iter().find_map(|&record| {
        record
            .names
            .iter()
            .find(|name| name.as_str() == hostname)
            .map(|name| VhostMatch {
                record,
                kind: MatchKind::Exact,
                pattern: Some(name.as_str()),
            })
    })
}

fn leading_wildcard<'a>(candidates: &[&'a ServerRecord], hostname: &str) -> Option<VhostMatch<'a>> {
    let hits = wildcard_hits(candidates, |name| {
        let suffix = name
            .strip_prefix("*.")
            .or_else(|| name.strip_prefix('.'))?;
        Some(!suffix.is_empty() && hostname.ends_with(suffix))
    });
    most_specific(hits).map(|c| VhostMatch {
        record: c.record,
        kind: MatchKind::LeadingWildcard,
        pattern: Some(c.pattern),
    })
}

fn trailing_wildcard<'a>(candidates: &[&'a ServerRecord], hostname: &str) -> Option<VhostMatch<'a>> {
    let hits = wildcard_hits(candidates, |name| {
        let prefix = name.strip_suffix(".*")?;
        Some(!prefix.is_empty() && hostname.starts_with(prefix))
    });
    most_specific(hits).map(|c| VhostMatch {
        record: c.record,
        kind: MatchKind::TrailingWildcard,
        pattern: Some(c.pattern),
    })
}

/// Collect every (record, pattern) pair for which `test` reports a hit.
/// `test` returns `None` for patterns that are not of the pass's shape.
fn wildcard_hits<'a, F>(candidates: &[&'a ServerRecord], test: F) -> Vec<MatchCandidate<'a>>
where
    F: Fn(&str) -> Option<bool>,
{
    let mut hits = Vec::new();
    for &record in candidates {
        for name in &record.names {
            if test(name.as_str()) == Some(true) {
                hits.push(MatchCandidate {
                    record,
                    pattern: name.as_str(),
                    specificity: Some(name.matches('.').count()),
                });
            }
        }
    }
    hits
}

/// Highest dot count wins; the first one seen wins a tie.
fn most_specific(hits: Vec<MatchCandidate<'_>>) -> Option<MatchCandidate<'_>> {
    let mut best: Option<MatchCandidate<'_>> = None;
    for hit in hits {
        let better = match &best {
            None => true,
            Some(current) => hit.specificity > current.specificity,
        };
        if better {
            best = Some(hit);
        }
    }
    best
}

fn first_regex<'a>(candidates: &[&'a ServerRecord], hostname: &str) -> Option<VhostMatch<'a>> {
    for &record in candidates {
        for name in &record.names {
            let Some(pattern) = name.strip_prefix('~') else {
                continue;
            };
            match test_regex(pattern, hostname) {
                RegexOutcome::Matched => {
                    return Some(VhostMatch {
                        record,
                        kind: MatchKind::Regex,
                        pattern: Some(name.as_str()),
                    });
                }
                RegexOutcome::NoMatch => {}
                RegexOutcome::Invalid(err) => {
                    let at = record.origin().map(|l| l.to_string()).unwrap_or_default();
                    tracing::warn!(at = %at, "{}; skipping", err);
                }
            }
        }
    }
    None
}

fn fallback<'a>(candidates: &[&'a ServerRecord], ip: Ipv4Addr, port: u16) -> Option<VhostMatch<'a>> {
    candidates
        .iter()
        .find(|r| r.is_named_default() || r.is_listen_default(ip, port))
        .copied()
        .map(|record| VhostMatch {
            record,
            kind: MatchKind::Default,
            pattern: None,
        })
}
