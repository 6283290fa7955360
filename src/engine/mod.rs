// src/engine/mod.rs

//! Orchestration engine.
//!
//! This module ties together:
//! - the build coordinator (index + build state + pending changes)
//! - the scanner that enumerates and extracts containers
//! - the runtime event loop that reacts to:
//!   - build requests and scan progress
//!   - routed file changes
//!   - queries from the command surface
//!   - shutdown signals
//!
//! The synchronous state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use std::path::PathBuf;

use tokio::sync::oneshot;

use crate::command::CommandOutcome;
use crate::types::{ContainerPath, FileChange, ScriptSet};

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// If true, stop the runtime once a build has settled and no rebuild is
    /// queued.
    pub exit_after_build: bool,
}

/// Events flowing into the runtime from the scanner, watcher and callers.
#[derive(Debug)]
pub enum RuntimeEvent {
    /// Start a full (re)build.
    BuildRequested,
    /// The running scan extracted one container.
    ContainerScanned {
        path: ContainerPath,
        scripts: ScriptSet,
    },
    /// The running scan visited every container.
    BuildFinished { scanned: usize },
    /// A routed filesystem change.
    FileChanged(FileChange),
    /// Run the find-references command for `active_file`.
    Query {
        active_file: PathBuf,
        reply: oneshot::Sender<CommandOutcome>,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod coordinator;
pub mod core;
pub mod pending;
pub mod runtime;
pub mod scanner;

pub use coordinator::{BuildCoordinator, BuildSummary, Lookup};
pub use self::core::{CoreCommand, CoreRuntime, CoreStep};
pub use pending::{DrainedChanges, PendingChanges};
pub use runtime::Runtime;
pub use scanner::Scanner;
