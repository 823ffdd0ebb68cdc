//! Configuration loading with include expansion.
//!
//! # Responsibilities
//! - Read the root file and every file it includes, recursively
//! - Cut every line into items (statements, block openers, `}`)
//! - Splice included items in place of the `include` directive
//! - Drop comments and blank lines
//! - Refuse include cycles and runaway nesting
//!
//! # Design Decisions
//! - Traversal uses an explicit stack of open files instead of recursion;
//!   the stack doubles as the include chain checked for cycles
//! - Files are compared by canonical path so `a/../b.conf` and `b.conf`
//!   are the same file
//! - An include that matches nothing is skipped with a warning, like the
//!   server itself does for globs

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::nginx::error::{ParseError, ParseResult};
use crate::nginx::include::PathExpander;
use crate::nginx::lexer;
use crate::nginx::line::{ConfigLine, Location};

/// Default bound on include nesting.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 64;

/// Reads a configuration tree into one ordered sequence of items.
#[derive(Debug, Clone)]
pub struct ConfigLoader<E> {
    expander: E,
    max_depth: usize,
}

/// One file being read.
struct Frame {
    file: Arc<Path>,
    canonical: PathBuf,
    lines: std::vec::IntoIter<(usize, String)>,
    /// Files produced by the include directive currently being expanded,
    /// each with the location of that directive.
    pending: VecDeque<(PathBuf, Location)>,
}

impl<E: PathExpander> ConfigLoader<E> {
    pub fn new(expander: E) -> Self {
        Self {
            expander,
            max_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }

    /// Override the include nesting bound.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Load `path` and everything it includes.
    pub fn load(&self, path: &Path) -> ParseResult<Vec<ConfigLine>> {
        if !path.exists() {
            return Err(ParseError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let mut out = Vec::new();
        let mut stack = vec![open(path)?];

        while let Some(frame) = stack.last_mut() {
            if let Some((next, at)) = frame.pending.pop_front() {
                let child = open(&next)?;

                if stack.iter().any(|f| f.canonical == child.canonical) {
                    let mut chain: Vec<PathBuf> =
                        stack.iter().map(|f| f.file.to_path_buf()).collect();
                    chain.push(next);
                    return Err(ParseError::CircularInclude { at, chain });
                }
                if stack.len() > self.max_depth {
                    return Err(ParseError::IncludeDepthExceeded {
                        at,
                        limit: self.max_depth,
                    });
                }

                tracing::debug!(file = %next.display(), included_from = %at, "including file");
                stack.push(child);
                continue;
            }

            let Some((number, text)) = frame.lines.next() else {
                stack.pop();
                continue;
            };

            if let Some(pattern) = include_pattern(&text) {
                let at = Location {
                    file: frame.file.clone(),
                    line: number,
                };
                let matches = self.expander.expand(&pattern).map_err(|source| {
                    ParseError::InvalidIncludePattern {
                        pattern: pattern.clone(),
                        at: at.clone(),
                        source,
                    }
                })?;
                if matches.is_empty() {
                    tracing::warn!(pattern = %pattern, at = %at, "include matched no files");
                }
                frame.pending = matches.into_iter().map(|m| (m, at.clone())).collect();
                continue;
            }

            out.push(ConfigLine::new(text, frame.file.clone(), number));
        }

        tracing::debug!(lines = out.len(), root = %path.display(), "configuration flattened");
        Ok(out)
    }
}

fn open(path: &Path) -> ParseResult<Frame> {
    let io_err = |source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    };
    let content = fs::read_to_string(path).map_err(io_err)?;
    let canonical = fs::canonicalize(path).map_err(io_err)?;
    let lines: Vec<(usize, String)> = content
        .lines()
        .enumerate()
        .flat_map(|(idx, line)| {
            lexer::split_items(lexer::strip_comment(line))
                .into_iter()
                .map(move |item| (idx + 1, item.to_string()))
        })
        .collect();

    Ok(Frame {
        file: Arc::from(path),
        canonical,
        lines: lines.into_iter(),
        pending: VecDeque::new(),
    })
}

/// The glob named by an `include` statement, if the item is one.
fn include_pattern(text: &str) -> Option<String> {
    let rest = text.strip_prefix("include")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let body = rest.trim().strip_suffix(';')?;
    lexer::tokenize(body).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nginx::include::GlobExpander;

    fn texts(lines: &[ConfigLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_several_includes_on_one_line() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a.conf");
        let b = tmp.path().join("b.conf");
        fs::write(&a, "server_name a.test;\n").unwrap();
        fs::write(&b, "server_name b.test;\n").unwrap();
        let root = tmp.path().join("nginx.conf");
        fs::write(
            &root,
            format!(
                "http {{ include {}; include {}; listen 80; }}\n",
                a.display(),
                b.display()
            ),
        )
        .unwrap();

        let lines = ConfigLoader::new(GlobExpander::new(tmp.path()))
            .load(&root)
            .unwrap();
        assert_eq!(
            texts(&lines),
            vec!["http {", "server_name a.test;", "server_name b.test;", "listen 80;", "}"]
        );
        assert!(lines[1].file.ends_with("a.conf"));
        assert_eq!(lines[3].number, 1);
    }

    #[test]
    fn test_include_after_block_opener() {
        let tmp = tempfile::tempdir().unwrap();
        let names = tmp.path().join("names.conf");
        fs::write(&names, "server_name x.test;\n").unwrap();
        let root = tmp.path().join("nginx.conf");
        fs::write(&root, format!("server {{ include {};\n}}\n", names.display())).unwrap();

        let lines = ConfigLoader::new(GlobExpander::new(tmp.path()))
            .load(&root)
            .unwrap();
        assert_eq!(texts(&lines), vec!["server {", "server_name x.test;", "}"]);
        assert_eq!(lines[2].number, 2);
    }

    #[test]
    fn test_include_pattern() {
        assert_eq!(include_pattern("include conf.d/*.conf;"), Some("conf.d/*.conf".into()));
        assert_eq!(include_pattern(r#"include "sites enabled/*";"#), Some("sites enabled/*".into()));
        assert_eq!(include_pattern("include_path foo;"), None);
        assert_eq!(include_pattern("include conf.d/*.conf"), None);
        assert_eq!(include_pattern("listen 80;"), None);
    }
}
