use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum PipgraphError {
    #[error("malformed package record: {0}")]
    MalformedRecord(String),
    #[error("dependency tool failed: {0}")]
    Tool(String),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse dependency tree: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PipgraphError>;
