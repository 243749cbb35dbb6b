//! CLI configuration
use crate::error::Result;
use marquee_playback::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file read from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "marquee.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: Backend,

    /// Snapshot file used by the `json` backend
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Connection string used by the `sqlite` backend
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Json,
    Sqlite,
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `marquee.toml` is read if
    /// present. `MARQUEE_<SECTION>__<KEY>` variables override both, e.g.
    /// `MARQUEE_STORAGE__BACKEND=sqlite`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with MARQUEE_)
        settings = settings.add_source(
            config::Environment::with_prefix("MARQUEE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(settings.build()?.try_deserialize()?)
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            data_path: default_data_path(),
            database_url: default_database_url(),
        }
    }
}

// Default values
fn default_data_path() -> PathBuf {
    PathBuf::from("./data/marquee.json")
}

fn default_database_url() -> String {
    "sqlite://./data/marquee.db".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let config = CliConfig::default();
        assert_eq!(config.storage.backend, Backend::Json);
        assert_eq!(config.storage.data_path, PathBuf::from("./data/marquee.json"));
        assert_eq!(config.engine.history_capacity, 100);
        assert_eq!(config.engine.history_query_limit, 50);
        assert!(config.engine.shuffle_seed.is_none());
    }

    #[test]
    fn reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marquee.toml");
        std::fs::write(
            &path,
            r#"
[storage]
backend = "sqlite"
database_url = "sqlite://./test.db"

[engine]
history_capacity = 20
shuffle_seed = 42
"#,
        )
        .unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();

        assert_eq!(config.storage.backend, Backend::Sqlite);
        assert_eq!(config.storage.database_url, "sqlite://./test.db");
        assert_eq!(config.storage.data_path, PathBuf::from("./data/marquee.json"));
        assert_eq!(config.engine.history_capacity, 20);
        assert_eq!(config.engine.history_query_limit, 50);
        assert_eq!(config.engine.shuffle_seed, Some(42));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(CliConfig::load(Some(&missing)).is_err());
    }
}
