// src/engine/core.rs

//! Core runtime state machine.
//!
//! Consumes [`RuntimeEvent`]s and produces:
//! - an updated coordinator state
//! - a list of commands describing what the IO shell should do next
//!
//! The async shell (`engine::runtime::Runtime`) reads events from channels,
//! runs scans on blocking threads and handles shutdown. Everything here is
//! synchronous and can be unit tested without Tokio.

use tracing::{debug, info};

use crate::command::find_references;
use crate::engine::coordinator::{BuildCoordinator, BuildSummary};
use crate::engine::{RuntimeEvent, RuntimeOptions};

/// Command produced by the core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Start a scan task feeding `ContainerScanned` / `BuildFinished`.
    StartScan,
    /// A build settled.
    BuildCompleted(BuildSummary),
    /// Request that the runtime exits.
    RequestExit,
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn running(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

#[derive(Debug)]
pub struct CoreRuntime {
    coordinator: BuildCoordinator,
    options: RuntimeOptions,
    /// A rebuild was requested while one was running.
    rebuild_queued: bool,
}

impl CoreRuntime {
    pub fn new(coordinator: BuildCoordinator, options: RuntimeOptions) -> Self {
        Self {
            coordinator,
            options,
            rebuild_queued: false,
        }
    }

    pub fn coordinator(&self) -> &BuildCoordinator {
        &self.coordinator
    }

    pub fn into_coordinator(self) -> BuildCoordinator {
        self.coordinator
    }

    /// Handle a single runtime event.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::BuildRequested => self.handle_build_request(),
            RuntimeEvent::ContainerScanned { path, scripts } => {
                self.coordinator.record_scanned(&path, scripts);
                CoreStep::running(Vec::new())
            }
            RuntimeEvent::BuildFinished { scanned } => self.handle_build_finished(scanned),
            RuntimeEvent::FileChanged(change) => {
                self.coordinator.apply(change);
                CoreStep::running(Vec::new())
            }
            RuntimeEvent::Query { active_file, reply } => {
                let outcome = find_references(Some(&self.coordinator), &active_file);
                if reply.send(outcome).is_err() {
                    debug!(?active_file, "query caller went away");
                }
                CoreStep::running(Vec::new())
            }
            RuntimeEvent::ShutdownRequested => {
                self.coordinator.reset();
                CoreStep {
                    commands: Vec::new(),
                    keep_running: false,
                }
            }
        }
    }

    fn handle_build_request(&mut self) -> CoreStep {
        if self.coordinator.begin_build() {
            return CoreStep::running(vec![CoreCommand::StartScan]);
        }

        info!("build already running; rebuild queued");
        self.rebuild_queued = true;
        CoreStep::running(Vec::new())
    }

    fn handle_build_finished(&mut self, scanned: usize) -> CoreStep {
        let mut commands = Vec::new();

        let Some(summary) = self.coordinator.finish_build(scanned) else {
            debug!("build finished without a running build; ignored");
            return CoreStep::running(commands);
        };
        commands.push(CoreCommand::BuildCompleted(summary));

        if self.rebuild_queued {
            self.rebuild_queued = false;
            if self.coordinator.begin_build() {
                commands.push(CoreCommand::StartScan);
            }
            return CoreStep::running(commands);
        }

        if self.options.exit_after_build {
            commands.push(CoreCommand::RequestExit);
            return CoreStep {
                commands,
                keep_running: false,
            };
        }

        CoreStep::running(commands)
    }
}
