//! nginx virtual host finder
//!
//! Reads an nginx configuration tree (following `include`s) and reports the
//! `server {}` block that would serve a given hostname.
//!
//! # Architecture Overview
//!
//! ```text
//!   nginx.conf ──▶ nginx::loader ──▶ nginx::block ──▶ vhost::record
//!                                                         │
//!   hostname ──▶ net::resolver ──▶ vhost::matcher ◀───────┘
//!                                        │
//!                                        ▼
//!                                     report ──▶ stdout / exit code
//! ```

use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use vhost_finder::config::{load_settings, validate_settings, FinderSettings, SettingsError};
use vhost_finder::error::{FinderError, EXIT_FOUND, EXIT_NO_MATCH, EXIT_USAGE};
use vhost_finder::net::{Resolver, StaticResolver, SystemResolver};
use vhost_finder::nginx::{ConfigLoader, GlobExpander};
use vhost_finder::observability::logging::init_logging;
use vhost_finder::report::{self, OutputMode};
use vhost_finder::finder::search_span;
use vhost_finder::{Query, SearchOutcome, VhostFinder};

#[derive(Parser, Debug)]
#[command(name = "vhost-finder")]
#[command(about = "Find the nginx server block that serves a virtual host", long_about = None)]
struct Cli {
    /// nginx configuration file
    config_path: PathBuf,

    /// Virtual host name to look up
    virtual_host: String,

    /// Match encrypted (ssl) listeners instead of plain ones
    #[arg(long)]
    https: bool,

    /// Non-standard port (defaults to 80, or 443 with --https)
    #[arg(long)]
    port: Option<u16>,

    /// Print listen directives and every server name of the match
    #[arg(long, conflicts_with = "json")]
    summary: bool,

    /// Print a JSON report
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Use this address instead of resolving the virtual host
    #[arg(long)]
    ip: Option<Ipv4Addr>,

    /// Settings file (TOML)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Directory relative include patterns are retried under
    #[arg(long)]
    include_root: Option<PathBuf>,

    /// DNS lookup timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.summary {
            OutputMode::Summary
        } else {
            OutputMode::Name
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return ExitCode::from(EXIT_USAGE);
        }
        Err(e) => e.exit(),
    };

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!(error = %e, "lookup failed");
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<u8, FinderError> {
    let mut settings = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => FinderSettings::default(),
    };
    if let Some(root) = &cli.include_root {
        settings.include_root = root.clone();
    }
    if let Some(secs) = cli.timeout {
        settings.resolver.timeout_secs = secs;
    }
    validate_settings(&settings).map_err(SettingsError::Validation)?;

    init_logging(&settings.observability.log_level, cli.debug);
    tracing::debug!(settings = ?settings, "settings loaded");

    let query = Query::new(&cli.virtual_host)
        .encrypted(cli.https)
        .port(cli.port);
    let _span = search_span(&query).entered();

    let loader = ConfigLoader::new(GlobExpander::new(&settings.include_root))
        .with_max_depth(settings.limits.max_include_depth);
    let finder = VhostFinder::load(&cli.config_path, &loader)?;

    let resolver: Box<dyn Resolver> = match cli.ip {
        Some(ip) => Box::new(StaticResolver::fixed(ip)),
        None => Box::new(SystemResolver::new(settings.resolver.timeout())),
    };

    let outcome = finder.search(resolver.as_ref(), &query)?;
    let mode = cli.output_mode();

    match outcome {
        SearchOutcome::Found { .. } => {
            println!("{}", report::render(&outcome, &cli.virtual_host, mode));
            Ok(EXIT_FOUND)
        }
        SearchOutcome::NoMatch { ip, port } => {
            if mode == OutputMode::Json {
                println!("{}", report::render(&outcome, &cli.virtual_host, mode));
            }
            eprintln!("{}", report::no_match_message(&cli.virtual_host, ip, port));
            Ok(EXIT_NO_MATCH)
        }
    }
}
