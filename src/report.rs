//! Rendering of search results for the terminal.

use std::net::Ipv4Addr;

use serde::Serialize;

use crate::finder::SearchOutcome;
use crate::vhost::{ListenSpec, MatchKind, ServerRecord};

/// How a result is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Only the primary server name.
    Name,
    /// Listen directives and every server name.
    Summary,
    /// Machine-readable report.
    Json,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    hostname: &'a str,
    ip: Ipv4Addr,
    port: u16,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    server: Option<JsonServer<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonServer<'a> {
    matched_by: MatchKind,
    pattern: Option<&'a str>,
    server_names: &'a [String],
    listen: &'a [ListenSpec],
    defined_at: Option<String>,
}

/// Text printed on stdout for an outcome.
pub fn render(outcome: &SearchOutcome<'_>, hostname: &str, mode: OutputMode) -> String {
    match (mode, outcome) {
        (OutputMode::Json, _) => render_json(outcome, hostname),
        (OutputMode::Name, SearchOutcome::Found { matched, .. }) => {
            matched.record.primary_name().to_string()
        }
        (OutputMode::Summary, SearchOutcome::Found { matched, .. }) => {
            let mut out = vec![listening_line(matched.record)];
            for name in &matched.record.names {
                out.push(format!("server_name: {}", name));
            }
            let how = match matched.pattern {
                Some(pattern) => format!("matched by: {} ({})", matched.kind, pattern),
                None => format!("matched by: {}", matched.kind),
            };
            out.push(how);
            if let Some(origin) = matched.record.origin() {
                out.push(format!("defined at: {}", origin));
            }
            out.join("\n")
        }
        (_, SearchOutcome::NoMatch { .. }) => String::new(),
    }
}

/// Message printed on stderr when nothing matches.
pub fn no_match_message(hostname: &str, ip: Ipv4Addr, port: u16) -> String {
    format!(
        "no server block matches {} and there is no default server for {}:{}",
        hostname, ip, port
    )
}

fn listening_line(record: &ServerRecord) -> String {
    if record.listens.is_empty() {
        return "listening on *:80 (implicit)".to_string();
    }
    let specs: Vec<String> = record.listens.iter().map(ToString::to_string).collect();
    format!("listening on {}", specs.join(", "))
}

fn render_json(outcome: &SearchOutcome<'_>, hostname: &str) -> String {
    let report = match outcome {
        SearchOutcome::Found { ip, port, matched } => JsonReport {
            hostname,
            ip: *ip,
            port: *port,
            found: true,
            server: Some(JsonServer {
                matched_by: matched.kind,
                pattern: matched.pattern,
                server_names: &matched.record.names,
                listen: &matched.record.listens,
                defined_at: matched.record.origin().map(|o| o.to_string()),
            }),
        },
        SearchOutcome::NoMatch { ip, port } => JsonReport {
            hostname,
            ip: *ip,
            port: *port,
            found: false,
            server: None,
        },
    };
    serde_json::to_string_pretty(&report).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nginx::ConfigLine;
    use crate::vhost::VhostMatch;
    use std::path::Path;
    use std::sync::Arc;

    fn record() -> ServerRecord {
        let file: Arc<Path> = Arc::from(Path::new("sites/shop.conf"));
        let lines: Vec<ConfigLine> = [
            "server {",
            "listen 80 default_server;",
            "listen 443 ssl;",
            "server_name shop.test *.shop.test;",
            "}",
        ]
        .iter()
        .enumerate()
        .map(|(i, l)| ConfigLine::new(*l, file.clone(), i + 3))
        .collect();
        ServerRecord::from_block(0, &lines)
    }

    fn found(record: &ServerRecord) -> SearchOutcome<'_> {
        SearchOutcome::Found {
            ip: "192.0.2.10".parse().unwrap(),
            port: 80,
            matched: VhostMatch {
                record,
                kind: MatchKind::LeadingWildcard,
                pattern: Some("*.shop.test"),
            },
        }
    }

    #[test]
    fn test_name_mode() {
        let r = record();
        assert_eq!(render(&found(&r), "www.shop.test", OutputMode::Name), "shop.test");
    }

    #[test]
    fn test_summary_mode() {
        let r = record();
        let text = render(&found(&r), "www.shop.test", OutputMode::Summary);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "listening on 80/default_server, 443/ssl");
        assert_eq!(lines[1], "server_name: shop.test");
        assert_eq!(lines[2], "server_name: *.shop.test");
        assert!(lines[3].contains("*.shop.test"));
        assert_eq!(lines[4], "defined at: sites/shop.conf:3");
    }

    #[test]
    fn test_json_mode() {
        let r = record();
        let text = render(&found(&r), "www.shop.test", OutputMode::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["found"], true);
        assert_eq!(value["ip"], "192.0.2.10");
        assert_eq!(value["server"]["matched_by"], "leading-wildcard");
        assert_eq!(value["server"]["server_names"][1], "*.shop.test");
        assert_eq!(value["server"]["listen"][1]["flags"][0], "ssl");

        let none = SearchOutcome::NoMatch {
            ip: "192.0.2.10".parse().unwrap(),
            port: 443,
        };
        let value: serde_json::Value =
            serde_json::from_str(&render(&none, "x.test", OutputMode::Json)).unwrap();
        assert_eq!(value["found"], false);
        assert!(value.get("server").is_none());
    }
}
