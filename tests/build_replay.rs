// tests/build_replay.rs

mod common;
use crate::common::builders::MockProject;
use crate::common::{found, init_tracing};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use prefab_index::engine::BuildCoordinator;
use prefab_index::fs::mock::MockFileSystem;
use prefab_index::fs::{ContainerReader, FileSystem};
use prefab_index::types::{BuildState, ContainerSet};

/// Start a build and run its scan, but leave it unsettled.
fn scan_without_settling(coordinator: &mut BuildCoordinator) -> usize {
    assert!(coordinator.begin_build());
    let paths = coordinator.scanner().enumerate();
    for path in &paths {
        coordinator.scan_container(path);
    }
    paths.len()
}

#[test]
fn changes_queued_during_build_are_reflected_after_settling() {
    init_tracing();
    let project = MockProject::new();
    let p = project.container("Assets/P.prefab", &["Old"]);
    let q = project.container("Assets/Q.prefab", &["Keep", "Shared"]);
    project.container("Assets/R.prefab", &["Shared"]);

    let mut c = project.coordinator();
    let scanned = scan_without_settling(&mut c);
    assert_eq!(c.state(), BuildState::Building);

    project.container("Assets/P.prefab", &["New"]);
    c.apply_change(p.clone());
    c.apply_delete(q.clone());

    c.finish_build(scanned).expect("build was running");

    assert!(found(&c, "New").contains(&p));
    assert!(found(&c, "Old").is_empty());
    assert!(found(&c, "Keep").is_empty());
    assert_eq!(found(&c, "Shared").len(), 1);
    assert!(c.index().scripts_of(&q).is_none());
    c.index().verify().unwrap();
}

#[test]
fn changed_then_deleted_during_build_ends_absent() {
    let project = MockProject::new();
    let p = project.container("P.prefab", &["A"]);

    let mut c = project.coordinator();
    let scanned = scan_without_settling(&mut c);

    c.apply_change(p.clone());
    c.apply_delete(p.clone());
    c.finish_build(scanned);

    assert!(!c.index().contains_container(&p));
    assert!(found(&c, "A").is_empty());
}

#[test]
fn deleted_then_recreated_during_build_is_present() {
    let project = MockProject::new();
    let p = project.container("P.prefab", &["A"]);

    let mut c = project.coordinator();
    let scanned = scan_without_settling(&mut c);

    project.remove("P.prefab");
    c.apply_delete(p.clone());
    project.container("P.prefab", &["B"]);
    c.apply_change(p.clone());
    c.finish_build(scanned);

    assert!(found(&c, "A").is_empty());
    assert!(found(&c, "B").contains(&p));
}

#[test]
fn replay_reads_latest_content_not_content_at_queue_time() {
    let project = MockProject::new();
    let p = project.container("P.prefab", &["V1"]);

    let mut c = project.coordinator();
    let scanned = scan_without_settling(&mut c);

    project.container("P.prefab", &["V2"]);
    c.apply_change(p.clone());
    project.container("P.prefab", &["V3"]);

    c.finish_build(scanned);
    assert!(found(&c, "V2").is_empty());
    assert!(found(&c, "V3").contains(&p));
}

#[test]
fn created_during_build_is_picked_up() {
    let project = MockProject::new();
    project.container("A.prefab", &["A"]);

    let mut c = project.coordinator();
    let scanned = scan_without_settling(&mut c);

    let late = project.container("Scenes/Late.unity", &["Late"]);
    c.apply_change(late.clone());
    let summary = c.finish_build(scanned).unwrap();

    assert_eq!(summary.scanned, 1);
    assert_eq!(summary.replayed_changes, 1);
    assert!(found(&c, "Late").contains(&late));
}

#[test]
fn changes_before_first_build_are_kept_for_it() {
    let project = MockProject::new();
    let mut c = project.coordinator();

    // File written after enumeration would have run; only the event knows.
    let p = project.path("Ghost.prefab");
    c.apply_change(p.clone());
    assert_eq!(c.pending().len(), 1);

    assert!(c.begin_build());
    project.container("Ghost.prefab", &["Ghost"]);
    c.finish_build(0);

    assert!(found(&c, "Ghost").contains(&p));
}

#[test]
fn rebuild_starts_from_scratch() {
    let project = MockProject::new();
    project.container("A.prefab", &["A"]);
    let mut c = project.coordinator();
    c.full_build();

    project.remove("A.prefab");
    project.container("B.prefab", &["B"]);
    let summary = c.full_build().unwrap();

    assert_eq!(summary.scanned, 1);
    assert!(found(&c, "A").is_empty());
    assert_eq!(found(&c, "B").len(), 1);
}

#[test]
fn pending_replays_exactly_once() {
    let project = MockProject::new();
    let p = project.container("P.prefab", &["A"]);
    let mut c = project.coordinator();

    let scanned = scan_without_settling(&mut c);
    c.apply_delete(p.clone());
    let first = c.finish_build(scanned).unwrap();
    assert_eq!(first.replayed_deletes, 1);

    let second = c.full_build().unwrap();
    assert_eq!(second.replayed_deletes, 0);
    assert!(found(&c, "A").contains(&p));
}

/// Mock filesystem where listing one directory fails.
#[derive(Debug)]
struct UnlistableDir {
    inner: MockFileSystem,
    broken: PathBuf,
}

impl FileSystem for UnlistableDir {
    fn open_read(&self, path: &Path) -> anyhow::Result<ContainerReader> {
        self.inner.open_read(path)
    }
    fn is_file(&self, path: &Path) -> bool {
        self.inner.is_file(path)
    }
    fn is_dir(&self, path: &Path) -> bool {
        self.inner.is_dir(path)
    }
    fn is_symlink(&self, path: &Path) -> bool {
        self.inner.is_symlink(path)
    }
    fn canonicalize(&self, path: &Path) -> anyhow::Result<PathBuf> {
        self.inner.canonicalize(path)
    }
    fn read_dir(&self, path: &Path) -> anyhow::Result<Vec<PathBuf>> {
        if path == self.broken {
            anyhow::bail!("permission denied: {path:?}");
        }
        self.inner.read_dir(path)
    }
}

#[test]
fn unlistable_subdirectory_does_not_empty_the_build() {
    init_tracing();
    let project = MockProject::new();
    let hero = project.container("Assets/Hero.prefab", &["Hero"]);
    let main = project.container("Scenes/Main.unity", &["Hero"]);
    project.container("Library/Temp/Cached.prefab", &["Hero"]);

    let fs = UnlistableDir {
        inner: project.fs.clone(),
        broken: project.path("Library/Temp"),
    };
    let mut c = BuildCoordinator::new(project.settings(), Arc::new(fs)).unwrap();

    let summary = c.full_build().unwrap();
    assert_eq!(summary.scanned, 2);
    assert_eq!(found(&c, "Hero"), ContainerSet::from([hero, main]));
}

#[test]
fn unlistable_root_builds_an_empty_index() {
    let project = MockProject::new();
    project.container("Hero.prefab", &["Hero"]);

    let fs = UnlistableDir {
        inner: project.fs.clone(),
        broken: project.root.clone(),
    };
    let mut c = BuildCoordinator::new(project.settings(), Arc::new(fs)).unwrap();

    assert_eq!(c.full_build().unwrap().scanned, 0);
    assert!(c.is_built());
    assert!(found(&c, "Hero").is_empty());
}
