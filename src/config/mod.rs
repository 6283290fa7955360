// src/config/mod.rs

//! Settings loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a settings file from disk (`loader.rs`).
//! - Validate it (`validate.rs`).
//! - Resolve it against a workspace into [`Settings`] (`settings.rs`).

pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{load_and_validate, load_for_workspace, load_from_path, DEFAULT_CONFIG_FILE};
pub use model::{ConfigFile, ContainersSection, RawConfigFile, SettingsSection};
pub use settings::Settings;
