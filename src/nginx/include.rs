//! Include pattern expansion.
//!
//! # Responsibilities
//! - Turn an `include` glob into the list of files it names
//! - Retry relative patterns against the configuration root
//! - Return matches in a deterministic (sorted) order
//!
//! # Design Decisions
//! - Matching is done one path component at a time, like glob(3): `*` never
//!   crosses a `/`, and a leading `.` must be matched explicitly
//! - Only regular files are returned; directories matched by the last
//!   component are ignored
//! - Absolute patterns are never re-rooted

use std::fs;
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};

/// Expands an include pattern into the files it refers to.
pub trait PathExpander {
    /// Return the matching files, sorted. An empty list is not an error.
    fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>, globset::Error>;
}

/// Filesystem glob expansion with a fallback root.
#[derive(Debug, Clone)]
pub struct GlobExpander {
    root: PathBuf,
}

impl GlobExpander {
    /// Create an expander that retries relative patterns under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PathExpander for GlobExpander {
    fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>, globset::Error> {
        let direct = glob_files(Path::new(pattern))?;
        if !direct.is_empty() || Path::new(pattern).is_absolute() {
            return Ok(direct);
        }
        let rooted = self.root.join(pattern);
        tracing::trace!(pattern, root = %self.root.display(), "retrying include under root");
        glob_files(&rooted)
    }
}

fn has_meta(component: &str) -> bool {
    component.contains(['*', '?', '[', '{'])
}

fn component_matcher(component: &str) -> Result<GlobMatcher, globset::Error> {
    Ok(GlobBuilder::new(component)
        .literal_separator(true)
        .backslash_escape(true)
        .build()?
        .compile_matcher())
}

/// Expand `pattern` against the filesystem.
fn glob_files(pattern: &Path) -> Result<Vec<PathBuf>, globset::Error> {
    let mut frontier = vec![PathBuf::new()];

    for component in pattern.components() {
        let text = match component {
            Component::Normal(part) => part.to_string_lossy(),
            other => {
                // Root, prefix, `.` and `..` are taken literally.
                for path in &mut frontier {
                    path.push(other.as_os_str());
                }
                continue;
            }
        };

        if !has_meta(&text) {
            for path in &mut frontier {
                path.push(&*text);
            }
            continue;
        }

        let matcher = component_matcher(&text)?;
        let explicit_dot = text.starts_with('.');
        let mut next = Vec::new();
        for dir in &frontier {
            let listing = if dir.as_os_str().is_empty() {
                Path::new(".")
            } else {
                dir.as_path()
            };
            let Ok(entries) = fs::read_dir(listing) else {
                continue;
            };
            for entry in entries.flatten() {
                let name = entry.file_name();
                let name = name.to_string_lossy();
                if name.starts_with('.') && !explicit_dot {
                    continue;
                }
                if matcher.is_match(&*name) {
                    next.push(dir.join(&*name));
                }
            }
        }
        frontier = next;
    }

    let mut files: Vec<PathBuf> = frontier
        .into_iter()
        .filter(|p| !p.as_os_str().is_empty() && p.is_file())
        .collect();
    files.sort();
    Ok(files)
}
