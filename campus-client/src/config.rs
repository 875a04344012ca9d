/// Configuration management
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the Campus HTTP API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Directory credentials are persisted under, one file per role.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
}

fn default_api_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".campus")
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("CAMPUS_").from_env()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            storage_dir: default_storage_dir(),
        }
    }
}
