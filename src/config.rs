use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::placement::GridGeometry;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "timetabler.toml";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub grid: GridGeometry,
    pub search: SearchConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// URLs (`http://`, `https://`) or local paths of the JSON collections
    pub sources: Vec<String>,

    /// Timeout of each request, in seconds
    pub timeout_secs: u64,

    /// Custom User-Agent, defaults to `timetabler/<version>`
    pub user_agent: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            sources: vec![
                "schedules-majors.json".to_owned(),
                "schedules-liberal-arts.json".to_owned(),
            ],
            timeout_secs: 5,
            user_agent: None,
        }
    }
}

impl CatalogConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("timetabler/{}", env!("CARGO_PKG_VERSION")))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Rows added to the result window each time more are needed
    pub page_size: usize,

    /// Entries filtered between two checks for newer options
    pub chunk_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            chunk_size: crate::search::DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Config {
    /// Load the config at `config_path`, `None` if there is no such file
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content =
            std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            config_path: config_path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %config_path.display(), "config loaded");

        Ok(Some(config))
    }

    /// Load the given config, or the default file, falling back on defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = config_path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
        Ok(Self::load_from_path(path)?.unwrap_or_default())
    }
}
