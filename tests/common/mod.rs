#![allow(dead_code)]

pub use prefab_index_test_utils::builders;
pub use prefab_index_test_utils::{init_tracing, with_timeout};

use prefab_index::engine::{BuildCoordinator, Lookup};
use prefab_index::types::ContainerSet;

/// Unwrap a lookup that is expected to be ready.
pub fn found(coordinator: &BuildCoordinator, script: &str) -> ContainerSet {
    match coordinator.lookup(script) {
        Lookup::Found(set) => set,
        Lookup::NotReady => panic!("lookup({script}) before the index was built"),
    }
}
