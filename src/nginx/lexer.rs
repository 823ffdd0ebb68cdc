//! Line-level lexical helpers.
//!
//! # Responsibilities
//! - Strip `#` comments that are not inside quotes
//! - Count structural braces (quoted braces are ignored)
//! - Cut a line into items: one statement, block opener or `}` each
//! - Split a line into `;`-terminated statements
//! - Tokenize a statement, removing surrounding quotes
//!
//! # Design Decisions
//! - Everything works on a single line; no state crosses line boundaries
//! - Escapes (`\"`, `\'`) inside quotes are honoured so regexes survive intact
//! - Unterminated trailing text (no `;`) is never reported as a statement

/// Tracks whether we are inside a quoted section while scanning a line.
#[derive(Debug, Default, Clone, Copy)]
struct QuoteState {
    quote: Option<char>,
    escaped: bool,
}

impl QuoteState {
    /// Feed one character. Returns true when the character is structural,
    /// i.e. outside quotes and not part of a quote delimiter or escape.
    fn feed(&mut self, c: char) -> bool {
        if self.escaped {
            self.escaped = false;
            return false;
        }
        if c == '\\' {
            self.escaped = true;
            return false;
        }
        match self.quote {
            Some(q) if c == q => {
                self.quote = None;
                false
            }
            Some(_) => false,
            None if c == '"' || c == '\'' => {
                self.quote = Some(c);
                false
            }
            None => true,
        }
    }
}

/// Remove a trailing comment, if any, and trim the result.
pub fn strip_comment(line: &str) -> &str {
    let mut state = QuoteState::default();
    for (idx, c) in line.char_indices() {
        if state.feed(c) && c == '#' {
            return line[..idx].trim();
        }
    }
    line.trim()
}

/// Number of structural `{` and `}` on the line.
pub fn brace_counts(line: &str) -> (usize, usize) {
    let mut state = QuoteState::default();
    let mut opens = 0;
    let mut closes = 0;
    for c in line.chars() {
        if state.feed(c) {
            match c {
                '{' => opens += 1,
                '}' => closes += 1,
                _ => {}
            }
        }
    }
    (opens, closes)
}

/// True when the line opens a block named `keyword`, e.g. `server {`.
pub fn opens_block(line: &str, keyword: &str) -> bool {
    line.trim_start()
        .strip_prefix(keyword)
        .map(|rest| rest.trim_start().starts_with('{'))
        .unwrap_or(false)
}

/// Cut a line into its structural items, in order.
///
/// Each item is one `;`-terminated statement, one block opener ending in
/// `{`, a lone `}`, or trailing text with no terminator. After this every
/// item changes the brace depth by at most one, so
/// `http { server { listen 80; } }` reads like five separate lines.
pub fn split_items(line: &str) -> Vec<&str> {
    let mut state = QuoteState::default();
    let mut out = Vec::new();
    let mut start = 0;
    for (idx, c) in line.char_indices() {
        if !state.feed(c) {
            continue;
        }
        match c {
            '{' | ';' => {
                let item = line[start..=idx].trim();
                if item != ";" {
                    out.push(item);
                }
                start = idx + 1;
            }
            '}' => {
                let before = line[start..idx].trim();
                if !before.is_empty() {
                    out.push(before);
                }
                out.push("}");
                start = idx + 1;
            }
            _ => {}
        }
    }
    let rest = line[start..].trim();
    if !rest.is_empty() {
        out.push(rest);
    }
    out
}

/// Split a line into its `;`-terminated statements.
///
/// For each statement only the text after the last structural brace is
/// kept, so `server { listen 80;` yields `listen 80`.
pub fn statements(line: &str) -> Vec<&str> {
    let mut state = QuoteState::default();
    let mut out = Vec::new();
    let mut start = 0;
    for (idx, c) in line.char_indices() {
        if !state.feed(c) {
            continue;
        }
        match c {
            '{' | '}' => start = idx + 1,
            ';' => {
                let stmt = line[start..idx].trim();
                if !stmt.is_empty() {
                    out.push(stmt);
                }
                start = idx + 1;
            }
            _ => {}
        }
    }
    out
}

/// Split a statement on whitespace, keeping quoted sections together and
/// dropping the quote characters themselves.
pub fn tokenize(stmt: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = stmt.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (_, '\\') => {
                // Keep the escape: regex patterns depend on it.
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_token = true;
            }
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_token = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}
