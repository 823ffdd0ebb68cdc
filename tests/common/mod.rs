//! Shared utilities for integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use vhost_finder::nginx::{ConfigLoader, GlobExpander};
use vhost_finder::VhostFinder;

/// A throw-away nginx configuration tree.
pub struct ConfigTree {
    dir: TempDir,
}

#[allow(dead_code)]
impl ConfigTree {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Write `contents` to `name` (relative to the tree), creating directories.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Loader whose include root is this tree.
    pub fn loader(&self) -> ConfigLoader<GlobExpander> {
        ConfigLoader::new(GlobExpander::new(self.root()))
    }

    /// Load `name` and build its server records.
    pub fn finder(&self, name: &str) -> VhostFinder {
        VhostFinder::load(&self.path(name), &self.loader()).unwrap()
    }
}

/// Wrap server blocks into a minimal nginx.conf.
#[allow(dead_code)]
pub fn http_conf(servers: &str) -> String {
    format!(
        "user www-data;\nevents {{\n    worker_connections 768;\n}}\nhttp {{\n    sendfile on;\n{}\n}}\n",
        servers
    )
}
