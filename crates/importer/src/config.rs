use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DATABASE_FILE: &str = "importer.db";
const SETTINGS_FILE: &str = "settings.toml";
const MEDIA_DIR: &str = "media";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory for the database, settings and media
    pub data_dir: PathBuf,
    pub database_url: String,
    pub max_connections: u32,
}

impl Config {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let database_url = format!(
            "sqlite:{}?mode=rwc",
            data_dir.join(DATABASE_FILE).display()
        );
        Self {
            data_dir,
            database_url,
            max_connections: 5,
        }
    }

    pub fn with_database_url(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = database_url.into();
        self
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }

    pub fn media_path(&self) -> PathBuf {
        self.data_dir.join(MEDIA_DIR)
    }
}
