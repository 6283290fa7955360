// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::engine::coordinator::BuildCoordinator;
use crate::engine::core::{CoreCommand, CoreRuntime};
use crate::engine::RuntimeEvent;
use crate::errors::Result;

/// Drives the [`CoreRuntime`] from a channel of [`RuntimeEvent`]s.
///
/// This is the only task that mutates the index. Scans run on a blocking
/// thread and report back through the same channel, so routed file changes
/// interleave with scan progress and are queued while a build is running.
pub struct Runtime {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    /// Handed to scan tasks so they can report into this loop.
    event_tx: mpsc::Sender<RuntimeEvent>,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(
        core: CoreRuntime,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        event_tx: mpsc::Sender<RuntimeEvent>,
    ) -> Self {
        Self {
            core,
            event_rx,
            event_tx,
        }
    }

    /// Main event loop.
    ///
    /// Runs until shutdown is requested or the core asks to exit. Returns
    /// the coordinator in its final state.
    pub async fn run(mut self) -> Result<BuildCoordinator> {
        info!("prefab-index runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            match &event {
                // Per-container scan results are too chatty for debug.
                RuntimeEvent::ContainerScanned { path, .. } => {
                    trace!(?path, "runtime received scan result");
                }
                other => debug!(event = ?other, "runtime received event"),
            }

            let step = self.core.step(event);

            for command in step.commands {
                self.execute_command(command);
            }

            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        info!("runtime exiting");
        Ok(self.core.into_coordinator())
    }

    fn execute_command(&mut self, command: CoreCommand) {
        match command {
            CoreCommand::StartScan => self.spawn_scan(),
            CoreCommand::BuildCompleted(summary) => {
                info!(
                    containers = summary.containers,
                    scripts = summary.scripts,
                    "Build cache complete."
                );
            }
            CoreCommand::RequestExit => {
                info!("core issued RequestExit command");
            }
        }
    }

    /// Scan every container on a blocking thread, strictly one after
    /// another, feeding results back into this loop.
    fn spawn_scan(&self) {
        let scanner = self.core.coordinator().scanner().clone();
        let tx = self.event_tx.clone();

        tokio::task::spawn_blocking(move || {
            let scanned = scanner.scan_all(|path, scripts| {
                tx.blocking_send(RuntimeEvent::ContainerScanned { path, scripts })
                    .is_ok()
            });

            if let Err(err) = tx.blocking_send(RuntimeEvent::BuildFinished { scanned }) {
                warn!("failed to send RuntimeEvent::BuildFinished: {err}");
            }
        });
    }
}
