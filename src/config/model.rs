// src/config/model.rs

use serde::Deserialize;

/// Settings file as read from TOML, before validation.
///
/// ```toml
/// [settings]
/// export_name = "ExportName"
/// container_root = ""        # empty: use the workspace root
/// script_extension = "ts"
///
/// [containers]
/// include = ["**/*.prefab", "**/*.unity"]
/// exclude = ["Library/**"]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub settings: SettingsSection,

    #[serde(default)]
    pub containers: ContainersSection,
}

impl RawConfigFile {
    /// Apply CLI overrides on top of the file contents.
    pub fn with_overrides(
        mut self,
        export_name: Option<String>,
        container_root: Option<String>,
    ) -> Self {
        if let Some(name) = export_name {
            self.settings.export_name = name;
        }
        if let Some(root) = container_root {
            self.settings.container_root = root;
        }
        self
    }
}

/// Validated settings. Only constructible through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    settings: SettingsSection,
    containers: ContainersSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(settings: SettingsSection, containers: ContainersSection) -> Self {
        Self {
            settings,
            containers,
        }
    }

    pub fn settings(&self) -> &SettingsSection {
        &self.settings
    }

    pub fn containers(&self) -> &ContainersSection {
        &self.containers
    }
}

/// `[settings]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsSection {
    /// Key whose value names the referenced script, e.g. `ExportName: Player`.
    ///
    /// Empty (after trimming) means "not configured".
    #[serde(default = "default_export_name")]
    pub export_name: String,

    /// Directory scanned for containers. Empty means the workspace root.
    #[serde(default)]
    pub container_root: String,

    /// Extension of script source files that can be queried.
    #[serde(default = "default_script_extension")]
    pub script_extension: String,
}

fn default_export_name() -> String {
    "ExportName".to_string()
}

fn default_script_extension() -> String {
    "ts".to_string()
}

impl Default for SettingsSection {
    fn default() -> Self {
        Self {
            export_name: default_export_name(),
            container_root: String::new(),
            script_extension: default_script_extension(),
        }
    }
}

impl SettingsSection {
    /// Trimmed export key; empty when unconfigured.
    pub fn export_key(&self) -> &str {
        self.export_name.trim()
    }

    /// Script extension without a leading dot.
    pub fn script_extension(&self) -> &str {
        self.script_extension.trim().trim_start_matches('.')
    }
}

/// `[containers]` section: which files count as scenes/prefabs.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainersSection {
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_include() -> Vec<String> {
    vec!["**/*.prefab".to_string(), "**/*.unity".to_string()]
}

impl Default for ContainersSection {
    fn default() -> Self {
        Self {
            include: default_include(),
            exclude: Vec::new(),
        }
    }
}
