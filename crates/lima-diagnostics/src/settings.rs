//! Application settings, as far as diagnostics need them.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{DiagnosticsError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub kubernetes: KubernetesSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KubernetesSettings {
    pub enabled: bool,
}

impl Default for KubernetesSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Settings {
    /// Parse a YAML settings document. Unknown keys are ignored; an empty
    /// document yields the defaults.
    pub fn from_yaml(content: &str) -> serde_yaml_ng::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(content)
    }
}

/// Source of the current settings. Fetched on every use, never cached.
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    async fn fetch(&self) -> Result<Settings>;
}

#[async_trait]
impl SettingsProvider for Settings {
    async fn fetch(&self) -> Result<Settings> {
        Ok(self.clone())
    }
}

/// Settings stored in a YAML file, re-read on each fetch.
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl SettingsProvider for SettingsFile {
    async fn fetch(&self) -> Result<Settings> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| DiagnosticsError::ReadSettings {
                path: self.path.clone(),
                source,
            })?;
        Settings::from_yaml(&content).map_err(|source| DiagnosticsError::ParseSettings {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kubernetes_enabled_by_default() {
        assert!(Settings::default().kubernetes.enabled);
        assert!(Settings::from_yaml("").unwrap().kubernetes.enabled);
        assert!(Settings::from_yaml("kubernetes: {}\n").unwrap().kubernetes.enabled);
    }

    #[test]
    fn parses_disabled_kubernetes_and_ignores_unknown_keys() {
        let yaml = "\
version: 10
kubernetes:
  enabled: false
  version: 1.30.0
containerEngine:
  name: moby
";
        let settings = Settings::from_yaml(yaml).unwrap();
        assert!(!settings.kubernetes.enabled);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(Settings::from_yaml("kubernetes:\n  enabled: maybe\n").is_err());
    }

    #[tokio::test]
    async fn in_memory_settings_return_themselves() {
        let settings = Settings {
            kubernetes: KubernetesSettings { enabled: false },
        };
        assert_eq!(settings.fetch().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn file_is_reread_on_every_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "kubernetes:\n  enabled: true\n").unwrap();
        let provider = SettingsFile::new(path.clone());
        assert!(provider.fetch().await.unwrap().kubernetes.enabled);

        std::fs::write(&path, "kubernetes:\n  enabled: false\n").unwrap();
        assert!(!provider.fetch().await.unwrap().kubernetes.enabled);
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let provider = SettingsFile::new(dir.path().join("nope.yaml"));
        let err = provider.fetch().await.unwrap_err();
        assert!(matches!(err, DiagnosticsError::ReadSettings { .. }));
        assert!(err.to_string().contains("nope.yaml"));
    }

    #[tokio::test]
    async fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "kubernetes: [unclosed\n").unwrap();
        let err = SettingsFile::new(path).fetch().await.unwrap_err();
        assert!(matches!(err, DiagnosticsError::ParseSettings { .. }));
    }
}
