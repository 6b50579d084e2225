use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::models::Settings;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to write settings TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Settings persisted as `settings.toml` in the data directory.
pub struct SettingsService {
    path: PathBuf,
    current: Arc<RwLock<Settings>>,
}

impl SettingsService {
    /// Load the settings file, writing the defaults first when it is missing.
    pub async fn new(config: &Config) -> Result<Self, SettingsError> {
        let path = config.settings_path();
        let settings = read_or_init(&path).await?;

        Ok(Self {
            path,
            current: Arc::new(RwLock::new(settings)),
        })
    }

    pub async fn get(&self) -> Settings {
        self.current.read().await.clone()
    }

    /// Re-read the file. The cached settings are kept when it is invalid.
    pub async fn reload(&self) -> Result<Settings, SettingsError> {
        let settings = read_or_init(&self.path).await?;
        *self.current.write().await = settings.clone();
        tracing::info!("Reloaded settings from {}", self.path.display());
        Ok(settings)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn read_or_init(path: &Path) -> Result<Settings, SettingsError> {
    let settings = match tokio::fs::read_to_string(path).await {
        Ok(content) => toml::from_str::<Settings>(&content)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let defaults = Settings::default();
            if let Some(dir) = path.parent() {
                tokio::fs::create_dir_all(dir).await?;
            }
            tokio::fs::write(path, toml::to_string_pretty(&defaults)?).await?;
            tracing::info!("Wrote default settings to {}", path.display());
            defaults
        }
        Err(e) => return Err(e.into()),
    };

    settings.validate().map_err(SettingsError::Invalid)?;
    Ok(settings)
}
