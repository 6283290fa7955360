// src/config/validate.rs

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PrefabIndexError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::PrefabIndexError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.settings, raw.containers))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_export_name(cfg)?;
    validate_script_extension(cfg)?;
    validate_container_globs(cfg)?;
    Ok(())
}

fn ensure_export_name(cfg: &RawConfigFile) -> Result<()> {
    let key = cfg.settings.export_key();
    if key.is_empty() {
        return Err(PrefabIndexError::ConfigError(
            "Must set the `ExportName` config! ([settings].export_name is empty)".to_string(),
        ));
    }
    if key.chars().any(|c| c == ':' || c.is_whitespace()) {
        return Err(PrefabIndexError::ConfigError(format!(
            "[settings].export_name must be a single key without ':' or spaces (got {key:?})"
        )));
    }
    Ok(())
}

fn validate_script_extension(cfg: &RawConfigFile) -> Result<()> {
    if cfg.settings.script_extension().is_empty() {
        return Err(PrefabIndexError::ConfigError(
            "[settings].script_extension must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_container_globs(cfg: &RawConfigFile) -> Result<()> {
    if cfg.containers.include.is_empty() {
        return Err(PrefabIndexError::ConfigError(
            "[containers].include must list at least one pattern".to_string(),
        ));
    }

    let all = cfg.containers.include.iter().chain(cfg.containers.exclude.iter());
    for pat in all {
        if let Err(err) = Glob::new(pat) {
            return Err(PrefabIndexError::ConfigError(format!(
                "invalid container glob {pat:?}: {err}"
            )));
        }
    }
    Ok(())
}
