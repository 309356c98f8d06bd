use std::path::PathBuf;

use thiserror::Error;

/// Text that isn't one of the seven day labels
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown day label: {0:?}")]
pub struct ParseDayError(pub String);

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to fetch catalog at {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    #[error("failed to read catalog at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse catalog from {location}: {source}")]
    Parse {
        location: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {config_path}: {source}")]
    Read {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {config_path}: {source}")]
    Parse {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no table named {0:?}")]
    UnknownTable(String),

    #[error("the last remaining table can't be removed")]
    LastTable,
}
