use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::credentials::{ModelCredentials, TrackerCredentials};
use crate::error::{AppError, AppResult};
use crate::infra::{github, lemonsqueezy, openai};

const CONFIG_DIR_NAME: &str = "storyscribe";
const CONFIG_FILE_NAME: &str = "config.json";

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| {
            AppError::Configuration("could not determine the config directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

/// Values saved by `storyscribe config init`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_key: Option<String>,
}

/// Every user-editable setting, in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    OpenaiApiKey,
    OpenaiModel,
    GithubToken,
    GithubRepo,
    LicenseKey,
}

impl ConfigField {
    pub const ALL: [ConfigField; 5] = [
        ConfigField::OpenaiApiKey,
        ConfigField::OpenaiModel,
        ConfigField::GithubToken,
        ConfigField::GithubRepo,
        ConfigField::LicenseKey,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConfigField::OpenaiApiKey => "OpenAI API key",
            ConfigField::OpenaiModel => "OpenAI model (default gpt-4o-mini)",
            ConfigField::GithubToken => "GitHub token",
            ConfigField::GithubRepo => "GitHub repository (owner/name)",
            ConfigField::LicenseKey => "License key",
        }
    }

    pub fn is_secret(self) -> bool {
        matches!(
            self,
            ConfigField::OpenaiApiKey | ConfigField::GithubToken | ConfigField::LicenseKey
        )
    }
}

impl StoredConfig {
    pub fn get(&self, field: ConfigField) -> Option<&str> {
        match field {
            ConfigField::OpenaiApiKey => self.openai_api_key.as_deref(),
            ConfigField::OpenaiModel => self.openai_model.as_deref(),
            ConfigField::GithubToken => self.github_token.as_deref(),
            ConfigField::GithubRepo => self.github_repo.as_deref(),
            ConfigField::LicenseKey => self.license_key.as_deref(),
        }
    }

    pub fn slot(&mut self, field: ConfigField) -> &mut Option<String> {
        match field {
            ConfigField::OpenaiApiKey => &mut self.openai_api_key,
            ConfigField::OpenaiModel => &mut self.openai_model,
            ConfigField::GithubToken => &mut self.github_token,
            ConfigField::GithubRepo => &mut self.github_repo,
            ConfigField::LicenseKey => &mut self.license_key,
        }
    }

    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub openai_base_url: String,
    pub github_token: Option<String>,
    pub github_repo: Option<String>,
    pub github_base_url: String,
    pub license_key: Option<String>,
    pub license_base_url: String,
}

impl AppConfig {
    /// Stored file first, environment on top.
    pub fn load() -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Ok(Self::resolve(stored, |name| env::var(name).ok()))
    }

    pub fn resolve(stored: StoredConfig, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Self {
            openai_api_key: var("OPENAI_API_KEY").or(stored.openai_api_key),
            openai_model: var("STORYSCRIBE_MODEL").or(stored.openai_model),
            openai_base_url: var("STORYSCRIBE_OPENAI_URL")
                .unwrap_or_else(|| openai::DEFAULT_BASE_URL.to_string()),
            github_token: var("GITHUB_TOKEN").or(stored.github_token),
            github_repo: var("STORYSCRIBE_GITHUB_REPO").or(stored.github_repo),
            github_base_url: var("STORYSCRIBE_GITHUB_URL")
                .unwrap_or_else(|| github::DEFAULT_BASE_URL.to_string()),
            license_key: var("STORYSCRIBE_LICENSE_KEY").or(stored.license_key),
            license_base_url: var("STORYSCRIBE_LICENSE_URL")
                .unwrap_or_else(|| lemonsqueezy::DEFAULT_BASE_URL.to_string()),
        }
    }

    pub fn model_credentials(&self) -> AppResult<ModelCredentials> {
        self.openai_api_key
            .as_deref()
            .map(ModelCredentials::new)
            .ok_or_else(|| {
                AppError::Configuration(
                    "OpenAI API key not configured; run `storyscribe config init`".to_string(),
                )
            })
    }

    pub fn tracker_credentials(&self) -> AppResult<TrackerCredentials> {
        let token = self.github_token.as_deref().ok_or_else(|| {
            AppError::Configuration(
                "GitHub token not configured; run `storyscribe config init`".to_string(),
            )
        })?;
        let repository = self.github_repo.as_deref().ok_or_else(|| {
            AppError::Configuration(
                "GitHub repository not configured; run `storyscribe config init`".to_string(),
            )
        })?;
        TrackerCredentials::new(token, repository).map_err(AppError::Configuration)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn environment_overrides_stored_values() {
        let stored = StoredConfig {
            openai_api_key: Some("sk-stored".to_string()),
            github_repo: Some("acme/widgets".to_string()),
            ..StoredConfig::default()
        };

        let config = AppConfig::resolve(
            stored,
            lookup(&[("OPENAI_API_KEY", "sk-env"), ("STORYSCRIBE_GITHUB_REPO", "  ")]),
        );

        assert_eq!(config.openai_api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.github_repo.as_deref(), Some("acme/widgets"));
        assert_eq!(config.openai_base_url, openai::DEFAULT_BASE_URL);
    }

    #[test]
    fn missing_credentials_are_configuration_errors() {
        let config = AppConfig::resolve(StoredConfig::default(), lookup(&[]));

        assert!(matches!(
            config.model_credentials(),
            Err(AppError::Configuration(_))
        ));
        assert!(matches!(
            config.tracker_credentials(),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn builds_tracker_credentials() {
        let config = AppConfig::resolve(
            StoredConfig::default(),
            lookup(&[
                ("GITHUB_TOKEN", "ghp_env"),
                ("STORYSCRIBE_GITHUB_REPO", "acme/widgets"),
            ]),
        );

        let creds = config.tracker_credentials().unwrap();

        assert_eq!(creds.token, "ghp_env");
        assert_eq!(creds.repository, "acme/widgets");
    }

    #[test]
    fn stored_config_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let stored = StoredConfig {
            github_token: Some("ghp_saved".to_string()),
            ..StoredConfig::default()
        };

        stored.save_to(&path).unwrap();

        assert_eq!(StoredConfig::load_from(&path).unwrap(), stored);
    }

    #[test]
    fn missing_config_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = StoredConfig::load_from(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(loaded, StoredConfig::default());
    }

    #[test]
    fn corrupt_config_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            StoredConfig::load_from(&path),
            Err(AppError::Configuration(_))
        ));
    }
}
