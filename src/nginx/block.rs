//! Block segmentation.
//!
//! # Responsibilities
//! - Find the first `http {` block in the flattened configuration
//! - Split its body into `server {}` blocks, in declaration order
//!
//! # Design Decisions
//! - Lines are first cut into items (see `split_lines`), so one line may
//!   open and close any number of blocks; depth then moves by at most one
//!   per item
//! - Only `server` blocks sitting directly inside `http` are extracted;
//!   `map`, `upstream` and friends are skipped over
//! - Lines are borrowed, never copied, until a record is built

use std::path::Path;

use crate::nginx::error::{ParseError, ParseResult};
use crate::nginx::lexer;
use crate::nginx::line::ConfigLine;

const HTTP_KEYWORD: &str = "http";
const SERVER_KEYWORD: &str = "server";

fn depth_delta(line: &ConfigLine) -> isize {
    let (opens, closes) = lexer::brace_counts(&line.text);
    opens as isize - closes as isize
}

/// Cut every line into its items, keeping file and line number.
///
/// Lines that already hold a single item are returned unchanged.
pub fn split_lines(lines: &[ConfigLine]) -> Vec<ConfigLine> {
    lines
        .iter()
        .flat_map(|line| {
            lexer::split_items(&line.text)
                .into_iter()
                .map(move |item| ConfigLine::new(item, line.file.clone(), line.number))
        })
        .collect()
}

/// Return the lines strictly inside the first `http { ... }` block.
///
/// `root` is only used to name the file when no block exists.
pub fn http_block<'a>(lines: &'a [ConfigLine], root: &Path) -> ParseResult<&'a [ConfigLine]> {
    let start = lines
        .iter()
        .position(|l| lexer::opens_block(&l.text, HTTP_KEYWORD))
        .ok_or_else(|| ParseError::MissingHttpBlock {
            path: root.to_path_buf(),
        })?;

    let opening = &lines[start];
    let mut depth = depth_delta(opening);
    if depth <= 0 {
        // `http { }` on one line
        return Ok(&lines[start + 1..start + 1]);
    }

    for (offset, line) in lines[start + 1..].iter().enumerate() {
        depth += depth_delta(line);
        if depth <= 0 {
            let end = start + 1 + offset;
            tracing::debug!(lines = end - start - 1, at = %opening.location(), "http block located");
            return Ok(&lines[start + 1..end]);
        }
    }

    Err(ParseError::MalformedConfig {
        at: opening.location(),
        reason: "http block is never closed".to_string(),
    })
}

/// Split an `http` body into its `server` blocks.
///
/// Each returned slice starts with the `server {` line and ends with the
/// line that closes it.
pub fn server_blocks(body: &[ConfigLine]) -> ParseResult<Vec<&[ConfigLine]>> {
    let mut blocks = Vec::new();
    let mut depth: isize = 0;
    let mut open: Option<usize> = None;

    for (idx, line) in body.iter().enumerate() {
        if open.is_none() && depth == 0 && lexer::opens_block(&line.text, SERVER_KEYWORD) {
            open = Some(idx);
        }

        depth += depth_delta(line);

        if depth < 0 {
            return Err(ParseError::MalformedConfig {
                at: line.location(),
                reason: "unexpected '}'".to_string(),
            });
        }

        if depth == 0 {
            if let Some(start) = open.take() {
                blocks.push(&body[start..=idx]);
            }
        }
    }

    if let Some(start) = open {
        return Err(ParseError::MalformedConfig {
            at: body[start].location(),
            reason: "server block is never closed".to_string(),
        });
    }

    tracing::debug!(servers = blocks.len(), "server blocks extracted");
    Ok(blocks)
}
