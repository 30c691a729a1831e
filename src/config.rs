//! User configuration for the lab runner.
//!
//! The config is optional: a missing file at the default location yields the
//! defaults, but an explicitly named file must exist and validate.
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_SCHEMA_VERSION: u32 = 1;

const CONFIG_DIR: &str = "seclab";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LabConfig {
    pub schema_version: u32,
    /// Scenario started when `--scenario` is omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_scenario: Option<String>,
    /// Extra directories scanned for `*.json` labs.
    #[serde(default)]
    pub lab_dirs: Vec<PathBuf>,
    /// `tracing` filter directive, overridden by `SECLAB_LOG`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            default_scenario: None,
            lab_dirs: Vec::new(),
            log_filter: None,
            log_file: None,
        }
    }
}

/// `<config_dir>/seclab/config.json`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Render the default config as pretty JSON.
pub fn config_stub() -> Result<String> {
    serde_json::to_string_pretty(&LabConfig::default()).context("serialize config stub")
}

/// Load the config named on the command line, or the default one if present.
pub fn resolve_config(explicit: Option<&Path>) -> Result<LabConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match default_config_path() {
        Some(path) if path.is_file() => load_config(&path),
        _ => Ok(LabConfig::default()),
    }
}

pub fn load_config(path: &Path) -> Result<LabConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: LabConfig = serde_json::from_slice(&bytes).context("parse config JSON")?;
    validate_config(&config).with_context(|| format!("validate config {}", path.display()))?;
    Ok(config)
}

pub fn validate_config(config: &LabConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    if let Some(id) = config.default_scenario.as_deref() {
        if id.trim().is_empty() {
            return Err(anyhow!("default_scenario must be non-empty"));
        }
    }
    if let Some(filter) = config.log_filter.as_deref() {
        if filter.trim().is_empty() {
            return Err(anyhow!("log_filter must be non-empty"));
        }
    }
    if config
        .lab_dirs
        .iter()
        .any(|dir| dir.as_os_str().is_empty())
    {
        return Err(anyhow!("lab_dirs entries must be non-empty"));
    }
    if config
        .log_file
        .as_ref()
        .is_some_and(|path| path.as_os_str().is_empty())
    {
        return Err(anyhow!("log_file must be non-empty"));
    }
    Ok(())
}
