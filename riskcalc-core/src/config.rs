//! Configuration file support for riskcalc
//!
//! Loads project-specific configuration from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.riskcalcrc.json` in the working directory
//! 3. `riskcalc.config.json` in the working directory
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::range::{NamedConfiguration, DEFAULT_CONFIGURATION};
use crate::resolver::{CustomConfiguration, Selection};
use crate::store::DEFAULT_STORE_PATH;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names, in discovery order
const CONFIG_FILE_NAMES: [&str; 2] = [".riskcalcrc.json", "riskcalc.config.json"];

/// riskcalc configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskcalcConfig {
    /// Built-in configuration name (default: "Default Configuration")
    #[serde(default)]
    pub configuration: Option<String>,

    /// Custom likelihood ranges, e.g. "LOW:0-3;MEDIUM:3-6;HIGH:6-9"
    #[serde(default)]
    pub likelihood_config: Option<String>,

    /// Custom impact ranges
    #[serde(default)]
    pub impact_config: Option<String>,

    /// Custom mapping, row-major verdict list
    #[serde(default)]
    pub mapping: Option<String>,

    /// Path of the named-mapping store (default: .riskcalc/mappings.json)
    #[serde(default)]
    pub store: Option<PathBuf>,
}

/// Resolved configuration ready for use
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Configuration every calculation uses unless overridden
    pub selection: Selection,
    /// Named configuration used when a custom one is rejected
    pub fallback_name: String,
    pub store_path: PathBuf,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl RiskcalcConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.configuration {
            if NamedConfiguration::find(name).is_none() {
                anyhow::bail!(
                    "configuration must be one of: {} (got {:?})",
                    builtin_names().join(", "),
                    name
                );
            }
        }

        self.custom()?;

        if let Some(store) = &self.store {
            if store.as_os_str().is_empty() {
                anyhow::bail!("store must not be an empty path");
            }
        }

        Ok(())
    }

    fn custom(&self) -> Result<Option<CustomConfiguration>> {
        CustomConfiguration::from_parts(
            self.likelihood_config.as_deref(),
            self.impact_config.as_deref(),
            self.mapping.as_deref(),
        )
        .context("invalid custom configuration")
    }

    /// Resolve config into compiled form ready for use
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let fallback_name = self
            .configuration
            .clone()
            .unwrap_or_else(|| DEFAULT_CONFIGURATION.to_string());

        let selection = match self.custom()? {
            Some(custom) => Selection::Custom(custom),
            None => Selection::named(fallback_name.clone()),
        };

        Ok(ResolvedConfig {
            selection,
            fallback_name,
            store_path: self
                .store
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        RiskcalcConfig::default().resolve()
    }
}

fn builtin_names() -> Vec<&'static str> {
    crate::range::BUILTIN_CONFIGURATIONS
        .iter()
        .map(|c| c.name)
        .collect()
}

/// Discover and load a config file from the project root
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(project_root: &Path) -> Result<Option<(RiskcalcConfig, PathBuf)>> {
    for name in CONFIG_FILE_NAMES {
        let path = project_root.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }
    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<RiskcalcConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: RiskcalcConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config for a project
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config from the project root.
/// Returns default config if nothing is found.
pub fn load_and_resolve(project_root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(project_root)? {
            Some((config, path)) => (config, Some(path)),
            None => (RiskcalcConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    // a relative store path is relative to the project, not the process
    if resolved.store_path.is_relative() {
        resolved.store_path = project_root.join(&resolved.store_path);
    }
    resolved.config_path = source_path;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config_is_valid() {
        let config = RiskcalcConfig::default();
        config.validate().expect("default config should be valid");
        let resolved = config.resolve().expect("default config should resolve");
        assert_eq!(resolved.selection, Selection::default());
        assert_eq!(resolved.fallback_name, DEFAULT_CONFIGURATION);
        assert_eq!(resolved.store_path, PathBuf::from(DEFAULT_STORE_PATH));
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "configuration": "Configuration 2",
            "likelihood_config": "LOW:0-3;MEDIUM:3-6;HIGH:6-9",
            "impact_config": "LOW:0-5;HIGH:5-9",
            "mapping": "NOTE,LOW,LOW,MEDIUM,MEDIUM,CRITICAL",
            "store": "shared/mappings.json"
        }"#;
        let config: RiskcalcConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert!(resolved.selection.is_custom());
        assert_eq!(resolved.fallback_name, "Configuration 2");
        assert_eq!(resolved.store_path, PathBuf::from("shared/mappings.json"));
    }

    #[test]
    fn test_reject_unknown_fields() {
        let json = r#"{"unknown_field": true}"#;
        let result: Result<RiskcalcConfig, _> = serde_json::from_str(json);
        assert!(result.is_err(), "unknown fields should be rejected");
    }

    #[test]
    fn test_reject_unknown_configuration_name() {
        let json = r#"{"configuration": "Configuration 9"}"#;
        let config: RiskcalcConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_partial_custom_configuration() {
        let json = r#"{"likelihood_config": "LOW:0-9"}"#;
        let config: RiskcalcConfig = serde_json::from_str(json).unwrap();
        let err = config.validate().unwrap_err();
        assert!(format!("{:#}", err).contains("impactConfig, mapping"));
    }

    #[test]
    fn test_reject_gapped_ranges() {
        let json = r#"{
            "likelihood_config": "LOW:0-3;HIGH:4-9",
            "impact_config": "LOW:0-9",
            "mapping": "NOTE,HIGH"
        }"#;
        let config: RiskcalcConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_discover_rc_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(".riskcalcrc.json");
        fs::write(&config_path, r#"{"configuration": "Configuration 1"}"#).unwrap();

        let (config, path) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.configuration.as_deref(), Some("Configuration 1"));
        assert_eq!(path, config_path);
    }

    #[test]
    fn test_discover_priority_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(".riskcalcrc.json"),
            r#"{"configuration": "Configuration 1"}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("riskcalc.config.json"),
            r#"{"configuration": "Configuration 3"}"#,
        )
        .unwrap();

        let (config, _) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(
            config.configuration.as_deref(),
            Some("Configuration 1"),
            ".riskcalcrc.json should take priority"
        );
    }

    #[test]
    fn test_no_config_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_and_resolve_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = load_and_resolve(dir.path(), None).unwrap();
        assert!(resolved.config_path.is_none());
        assert_eq!(resolved.store_path, dir.path().join(DEFAULT_STORE_PATH));
    }

    #[test]
    fn test_load_and_resolve_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.json");
        fs::write(&config_path, r#"{"configuration": "Configuration 3"}"#).unwrap();

        let resolved = load_and_resolve(dir.path(), Some(&config_path)).unwrap();
        assert_eq!(resolved.selection.display_name(), "Configuration 3");
        assert_eq!(resolved.config_path, Some(config_path));
    }
}
