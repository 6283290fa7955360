// src/command.rs

//! The find-references command.
//!
//! Given the file open in the editor, list the containers that reference its
//! script. Presentation (pick lists, clipboard, reveal-in-explorer) is left
//! to the caller; this module only decides what to show.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::engine::{BuildCoordinator, Lookup};
use crate::types::{ContainerPath, ScriptId};
use crate::watch::path_utils::relative_str;

/// One selectable hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceItem {
    /// Container file name, e.g. `Hero.prefab`.
    pub label: String,
    /// Directory relative to the workspace root; empty for the root itself.
    pub description: String,
    pub path: ContainerPath,
}

impl ReferenceItem {
    fn new(workspace: &Path, path: ContainerPath) -> Self {
        let rel = relative_str(workspace, &path).unwrap_or_else(|| path.to_string_lossy().into_owned());
        let (description, label) = match rel.rsplit_once('/') {
            Some((dir, name)) => (dir.to_string(), name.to_string()),
            None => (String::new(), rel),
        };
        Self {
            label,
            description,
            path,
        }
    }

    /// Name to hand to the editor when the item is picked: the file name
    /// without its extension.
    pub fn copy_name(&self) -> &str {
        Path::new(&self.label)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.label)
    }
}

/// Titled list of hits for one script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceList {
    pub title: String,
    pub script: ScriptId,
    pub items: Vec<ReferenceItem>,
}

/// What the command should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Settings are missing; nothing was ever indexed.
    NotConfigured,
    /// The active file is not a script source file.
    UnsupportedFile { extension: String },
    /// The first build has not completed yet.
    NotReady,
    /// No container references the script.
    NoResults { script: ScriptId },
    Found(ReferenceList),
}

impl CommandOutcome {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            CommandOutcome::NotConfigured | CommandOutcome::UnsupportedFile { .. }
        )
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutcome::NotConfigured => f.write_str("Must set the `ExportName` config!"),
            CommandOutcome::UnsupportedFile { extension } => {
                write!(f, "Only support {} file!", extension.to_uppercase())
            }
            CommandOutcome::NotReady => f.write_str("Please wait for building cache."),
            CommandOutcome::NoResults { .. } => f.write_str("No found prefab files."),
            CommandOutcome::Found(list) => {
                writeln!(f, "{}", list.title)?;
                for item in &list.items {
                    if item.description.is_empty() {
                        writeln!(f, "  {}", item.label)?;
                    } else {
                        writeln!(f, "  {}  ({})", item.label, item.description)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Script identifier for a source file: its name without the extension.
pub fn script_id_for(path: &Path) -> Option<ScriptId> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

/// Run the command for `active_file`.
///
/// `coordinator` is `None` when the session refused to start because the
/// settings are unconfigured.
pub fn find_references(coordinator: Option<&BuildCoordinator>, active_file: &Path) -> CommandOutcome {
    let Some(coordinator) = coordinator else {
        return CommandOutcome::NotConfigured;
    };
    let settings = coordinator.settings();

    let ext = settings.script_extension();
    let is_script = active_file
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext));
    let script = match script_id_for(active_file) {
        Some(id) if is_script => id,
        _ => {
            return CommandOutcome::UnsupportedFile {
                extension: ext.to_string(),
            };
        }
    };

    let containers = match coordinator.lookup(&script) {
        Lookup::NotReady => return CommandOutcome::NotReady,
        Lookup::Found(set) if set.is_empty() => return CommandOutcome::NoResults { script },
        Lookup::Found(set) => set,
    };

    let file_name = active_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| script.clone());

    let items = containers
        .into_iter()
        .map(|path: PathBuf| ReferenceItem::new(settings.workspace_root(), path))
        .collect();

    CommandOutcome::Found(ReferenceList {
        title: format!("{file_name} be dependent by"),
        script,
        items,
    })
}
