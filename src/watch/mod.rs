// src/watch/mod.rs

//! File watching and change routing.
//!
//! This module is responsible for:
//! - Compiling the container include/exclude globs.
//! - Enumerating containers under a root.
//! - Classifying `notify` events into container changes.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//!
//! It does not touch the index; changes are handed to the engine.

pub mod path_utils;
pub mod patterns;
pub mod router;
pub mod watcher;

pub use patterns::{collect_matching_files, ContainerPatterns};
pub use router::ChangeRouter;
pub use watcher::{spawn_watcher, WatcherHandle};
