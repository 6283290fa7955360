// src/watch/watcher.rs

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::watch::router::ChangeRouter;

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch the router's root recursively and forward container changes to the
/// runtime as [`RuntimeEvent::FileChanged`].
///
/// The router runs on a dedicated async task; the runtime stays the only
/// writer to the index.
pub fn spawn_watcher(
    router: ChangeRouter,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    eprintln!("prefab-index: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("prefab-index: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(router.root(), RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", router.root());

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");

            for change in router.classify(&event) {
                debug!(path = ?change.path, kind = ?change.kind, "container change");
                if let Err(err) = runtime_tx.send(RuntimeEvent::FileChanged(change)).await {
                    warn!("failed to send RuntimeEvent::FileChanged: {err}");
                    // Runtime is gone; nothing left to feed.
                    return;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}
