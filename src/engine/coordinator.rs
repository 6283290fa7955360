// src/engine/coordinator.rs

//! Build coordinator: owns the index, the build state and the pending set.
//!
//! Every change to the index goes through one of these entry points, and
//! the choice between "queue it" and "apply it now" is a single match on
//! [`BuildState`]:
//!
//! | state                  | change / delete                  |
//! |------------------------|----------------------------------|
//! | `NotBuilt`, `Building` | recorded in [`PendingChanges`]   |
//! | `Built`                | applied to the index immediately |
//!
//! Pending changes are replayed exactly once when a build finishes: every
//! changed path first (re-extracted, since the file may have moved on since
//! it was queued), then every deleted path.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::engine::pending::PendingChanges;
use crate::engine::scanner::Scanner;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::index::ScriptIndex;
use crate::types::{BuildState, ChangeKind, ContainerPath, ContainerSet, FileChange, ScriptSet};

/// Answer to a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// No build has completed yet.
    NotReady,
    /// Containers referencing the script (possibly none).
    Found(ContainerSet),
}

/// Counters reported when a build settles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Containers visited by the scan.
    pub scanned: usize,
    /// Containers referencing at least one script after replay.
    pub containers: usize,
    /// Distinct referenced scripts after replay.
    pub scripts: usize,
    /// Queued changes replayed after the scan.
    pub replayed_changes: usize,
    /// Queued deletes replayed after the scan.
    pub replayed_deletes: usize,
}

#[derive(Debug)]
pub struct BuildCoordinator {
    settings: Settings,
    scanner: Scanner,
    index: ScriptIndex,
    state: BuildState,
    pending: PendingChanges,
}

impl BuildCoordinator {
    pub fn new(settings: Settings, fs: Arc<dyn FileSystem>) -> Result<Self> {
        let scanner = Scanner::new(&settings, fs)?;
        Ok(Self {
            settings,
            scanner,
            index: ScriptIndex::new(),
            state: BuildState::NotBuilt,
            pending: PendingChanges::new(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    pub fn is_built(&self) -> bool {
        self.state == BuildState::Built
    }

    pub fn index(&self) -> &ScriptIndex {
        &self.index
    }

    pub fn pending(&self) -> &PendingChanges {
        &self.pending
    }

    /// Start a full build: clear the index and enter `Building`.
    ///
    /// Returns false (and changes nothing) if a build is already running.
    /// Changes queued before this call are kept for the replay.
    pub fn begin_build(&mut self) -> bool {
        let Some(next) = self.state.begin_build() else {
            debug!("build already in progress");
            return false;
        };

        self.index.clear();
        self.state = next;
        info!(root = ?self.scanner.root(), "building cache");
        true
    }

    /// Record one container produced by the running scan.
    pub fn record_scanned(&mut self, path: &Path, scripts: ScriptSet) {
        if self.state != BuildState::Building {
            warn!(?path, state = %self.state, "scan result outside of a build; dropped");
            return;
        }
        self.index.record_container(path, scripts);
    }

    /// Extract `path` and record it as part of the running scan.
    pub fn scan_container(&mut self, path: &Path) {
        let scripts = self.scanner.extract(path);
        self.record_scanned(path, scripts);
    }

    /// Settle the running build and replay queued changes.
    ///
    /// Returns `None` if no build was running.
    pub fn finish_build(&mut self, scanned: usize) -> Option<BuildSummary> {
        let next = self.state.finish_build()?;
        self.state = next;

        let drained = self.pending.drain();
        let replayed_changes = drained.changed.len();
        let replayed_deletes = drained.deleted.len();

        for path in &drained.changed {
            self.update_container(path);
        }
        for path in &drained.deleted {
            self.index.remove_container(path);
        }

        let summary = BuildSummary {
            scanned,
            containers: self.index.container_count(),
            scripts: self.index.script_count(),
            replayed_changes,
            replayed_deletes,
        };
        info!(?summary, "build cache complete");
        Some(summary)
    }

    /// Run a whole build synchronously: enumerate, extract each container
    /// in turn, then settle.
    ///
    /// Returns `None` if a build is already running.
    pub fn full_build(&mut self) -> Option<BuildSummary> {
        if !self.begin_build() {
            return None;
        }

        let started = Instant::now();
        let paths = self.scanner.enumerate();
        for path in &paths {
            self.scan_container(path);
        }
        debug!(elapsed = ?started.elapsed(), "full scan finished");

        self.finish_build(paths.len())
    }

    /// Route a classified change.
    pub fn apply(&mut self, change: FileChange) {
        match self.state {
            BuildState::NotBuilt | BuildState::Building => self.pending.record(change),
            BuildState::Built => match change.kind {
                ChangeKind::Changed => self.update_container(&change.path),
                ChangeKind::Deleted => {
                    self.index.remove_container(&change.path);
                }
            },
        }
    }

    /// A container was created or modified.
    pub fn apply_change(&mut self, path: impl Into<ContainerPath>) {
        self.apply(FileChange::changed(path));
    }

    /// A container was removed.
    pub fn apply_delete(&mut self, path: impl Into<ContainerPath>) {
        self.apply(FileChange::deleted(path));
    }

    /// Containers referencing `script`, once a build has completed.
    pub fn lookup(&self, script: &str) -> Lookup {
        match self.state {
            BuildState::Built => Lookup::Found(self.index.lookup(script)),
            BuildState::NotBuilt | BuildState::Building => Lookup::NotReady,
        }
    }

    /// Drop everything and return to `NotBuilt`.
    pub fn reset(&mut self) {
        self.index.clear();
        self.pending.clear();
        self.state = BuildState::NotBuilt;
        debug!("coordinator reset");
    }

    fn update_container(&mut self, path: &Path) {
        let scripts = self.scanner.extract(path);
        self.index.record_container(path, scripts);
    }
}
