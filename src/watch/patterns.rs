// src/watch/patterns.rs

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::fs::FileSystem;

/// Compiled include/exclude globs deciding which files are containers.
///
/// Patterns are relative to the container root; callers pass relative,
/// forward-slash paths (e.g. `"Assets/Prefabs/Hero.prefab"`) into `matches`.
#[derive(Clone)]
pub struct ContainerPatterns {
    include: Vec<String>,
    include_set: GlobSet,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for ContainerPatterns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerPatterns")
            .field("include", &self.include)
            .finish_non_exhaustive()
    }
}

impl ContainerPatterns {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        let include_set = build_globset(include).context("building container include globset")?;

        let exclude_set = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude).context("building container exclude globset")?)
        };

        Ok(Self {
            include: include.to_vec(),
            include_set,
            exclude_set,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.include_patterns(), settings.exclude_patterns())
    }

    /// Returns true if `rel_path` names a container.
    pub fn matches(&self, rel_path: &str) -> bool {
        if !self.include_set.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Collect all files under `root` that match `patterns`.
///
/// Results are sorted so full builds visit containers in a stable order.
/// Symlinked directories are not descended into, so a link back to an
/// ancestor cannot make one container show up under many paths. A
/// subdirectory that cannot be listed is logged and skipped; only an
/// unreadable `root` is an error.
pub fn collect_matching_files(
    fs: &dyn FileSystem,
    root: &Path,
    patterns: &ContainerPatterns,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if dir == root => return Err(err),
            Err(err) => {
                warn!(?dir, error = %err, "skipping unreadable directory");
                continue;
            }
        };

        for path in entries {
            if fs.is_dir(&path) {
                if fs.is_symlink(&path) {
                    debug!(?path, "not following symlinked directory");
                } else {
                    stack.push(path);
                }
            } else if fs.is_file(&path) {
                if let Ok(rel) = path.strip_prefix(root) {
                    let rel_str = rel.to_string_lossy().replace('\\', "/");
                    if patterns.matches(&rel_str) {
                        files.push(path);
                    }
                }
            }
        }
    }

    files.sort();
    Ok(files)
}
