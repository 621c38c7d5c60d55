//! Settings provider - reads the host settings file and resolves the
//! composer-utilities section from it.

use anyhow::{Context, Result};
use mergekit::settings::NAMESPACE;
use mergekit::{DocumentFile, Settings};
use serde_json::Value;
use std::path::Path;

/// Load operating settings from `path`.
///
/// A missing settings file is not an error: every setting has a default.
pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        log::debug!("Settings file {} not found, using defaults", path.display());
        return Ok(Settings::default());
    }

    let file = DocumentFile::load(path)
        .with_context(|| format!("Could not read settings from {}", path.display()))?;

    Settings::resolve(host_config(&file.value))
        .with_context(|| format!("Invalid settings in {}", path.display()))
}

/// Pick the part of a settings document that holds the namespace.
///
/// The package manager keeps plugin settings under `config`, older projects
/// put them under `extra`; a bare settings file holds the namespace at the
/// top level.
pub fn host_config(document: &Value) -> &Value {
    ["config", "extra"]
        .iter()
        .filter_map(|section| document.get(*section))
        .find(|section| section.get(NAMESPACE).is_some())
        .unwrap_or(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_host_config_prefers_config_section() {
        let doc = json!({
            "config": {"composer-utilities": {"sync": {}}},
            "extra": {"composer-utilities": {"parameters-update": {}}},
        });
        assert_eq!(host_config(&doc), &doc["config"]);
    }

    #[test]
    fn test_host_config_falls_back_to_extra() {
        let doc = json!({"config": {"sort-packages": true}, "extra": {"composer-utilities": {}}});
        assert_eq!(host_config(&doc), &doc["extra"]);
    }

    #[test]
    fn test_host_config_top_level() {
        let doc = json!({"composer-utilities": {}});
        assert_eq!(host_config(&doc), &doc);
    }

    #[test]
    fn test_missing_settings_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = load_settings(&temp.path().join("composer.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_settings_from_composer_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("composer.json");
        fs::write(
            &path,
            r#"{
                "name": "acme/app",
                "config": {
                    "composer-utilities": {
                        "sync": {"ignore": {"nodes": ["[repositories]"]}},
                        "parameters-update": {"parameters": ["database_host"]}
                    }
                }
            }"#,
        )
        .unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.ignore_nodes.len(), 1);
        assert_eq!(settings.update_parameters, ["database_host"]);
    }

    #[test]
    fn test_invalid_settings_are_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("composer.json");
        fs::write(&path, r#"{"config": {"composer-utilities": {"sync": {"ignore": {"nodes": "[bad]"}}}}}"#)
            .unwrap();

        let err = load_settings(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid settings"));
        assert!(err.downcast_ref::<mergekit::Error>().is_some());
    }
}
