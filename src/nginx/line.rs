//! A single flattened configuration line.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// One item of the flattened configuration (a statement, a block opener
/// or a `}`), remembering the file and line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLine {
    /// Item text with comments stripped and whitespace trimmed.
    pub text: String,
    /// File the line was read from (shared by all lines of that file).
    pub file: Arc<Path>,
    /// 1-based line number within `file`.
    pub number: usize,
}

impl ConfigLine {
    pub fn new(text: impl Into<String>, file: Arc<Path>, number: usize) -> Self {
        Self {
            text: text.into(),
            file,
            number,
        }
    }

    /// `file:line`, for diagnostics.
    pub fn location(&self) -> Location {
        Location {
            file: self.file.clone(),
            line: self.number,
        }
    }
}

/// Position of a line in the configuration tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: Arc<Path>,
    pub line: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}
