// src/engine/scanner.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::Settings;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::index::Extractor;
use crate::types::{ContainerPath, ScriptSet};
use crate::watch::patterns::{collect_matching_files, ContainerPatterns};
use crate::watch::router::ChangeRouter;

/// Read-only half of a build: find containers and extract their references.
///
/// Cheap to clone, so a full scan can run on a blocking thread while the
/// coordinator keeps serving events.
#[derive(Debug, Clone)]
pub struct Scanner {
    fs: Arc<dyn FileSystem>,
    extractor: Extractor,
    patterns: ContainerPatterns,
    root: PathBuf,
}

impl Scanner {
    pub fn new(settings: &Settings, fs: Arc<dyn FileSystem>) -> Result<Self> {
        let extractor = Extractor::new(settings.export_key())?;
        let patterns = ContainerPatterns::from_settings(settings)?;
        Ok(Self {
            fs,
            extractor,
            patterns,
            root: settings.container_root().to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// All containers under the root, in a stable order.
    ///
    /// An unreadable root is logged and yields no containers.
    pub fn enumerate(&self) -> Vec<ContainerPath> {
        let started = Instant::now();
        match collect_matching_files(self.fs.as_ref(), &self.root, &self.patterns) {
            Ok(files) => {
                info!(
                    root = ?self.root,
                    containers = files.len(),
                    elapsed = ?started.elapsed(),
                    "enumerated containers"
                );
                files
            }
            Err(err) => {
                warn!(root = ?self.root, error = %err, "failed to enumerate containers");
                Vec::new()
            }
        }
    }

    /// Identifiers referenced by `path`; empty if it cannot be read.
    pub fn extract(&self, path: &Path) -> ScriptSet {
        self.extractor.extract_file(self.fs.as_ref(), path)
    }

    /// Enumerate and extract every container, one at a time.
    ///
    /// `sink` receives each result before the next file is opened and may
    /// return `false` to stop early. Returns how many containers were
    /// handed over.
    pub fn scan_all<F>(&self, mut sink: F) -> usize
    where
        F: FnMut(ContainerPath, ScriptSet) -> bool,
    {
        let paths = self.enumerate();
        let started = Instant::now();
        let mut scanned = 0;

        for path in paths {
            let scripts = self.extract(&path);
            scanned += 1;
            if !sink(path, scripts) {
                warn!(scanned, "scan stopped early");
                break;
            }
        }

        info!(scanned, elapsed = ?started.elapsed(), "extracted script references");
        scanned
    }

    /// A router filtering events with the same root and patterns.
    pub fn router(&self) -> ChangeRouter {
        ChangeRouter::new(self.root.clone(), self.patterns.clone(), Arc::clone(&self.fs))
    }
}
