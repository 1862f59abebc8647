use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("config file already exists: {0}")]
    ConfigExists(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Render options for the graph widget. Pure presentation state: none of
/// these fields affect node or edge identity, sizing, or highlighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_true")]
    pub directed: bool,
    #[serde(default = "default_true")]
    pub physics: bool,
    #[serde(default)]
    pub hierarchical: bool,
    #[serde(default = "default_true")]
    pub node_highlight_behavior: bool,
    #[serde(default = "default_highlight_color")]
    pub highlight_color: String,
    #[serde(default = "default_true")]
    pub collapsible: bool,
    #[serde(default)]
    pub node: NodeStyle,
    #[serde(default)]
    pub link: LinkStyle,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            directed: true,
            physics: true,
            hierarchical: false,
            node_highlight_behavior: true,
            highlight_color: default_highlight_color(),
            collapsible: true,
            node: NodeStyle::default(),
            link: LinkStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    #[serde(default = "default_node_color")]
    pub color: String,
    #[serde(default = "default_node_size")]
    pub size: u32,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            color: default_node_color(),
            size: default_node_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkStyle {
    #[serde(default = "default_link_color")]
    pub color: String,
    #[serde(default = "default_link_width")]
    pub width: u32,
}

impl Default for LinkStyle {
    fn default() -> Self {
        Self {
            color: default_link_color(),
            width: default_link_width(),
        }
    }
}

pub fn load(path: &Path) -> Result<DisplayConfig> {
    if !path.is_file() {
        return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Attempt load, else the documented defaults. Only a missing file falls
/// back; a present-but-invalid file is still a hard error.
pub fn load_or_default(path: &Path) -> Result<DisplayConfig> {
    match load(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::ConfigNotFound(_)) => Ok(DisplayConfig::default()),
        Err(err) => Err(err),
    }
}

pub fn save(config: &DisplayConfig, path: &Path) -> Result<()> {
    let contents = serde_json::to_string_pretty(config).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, contents)?;
    Ok(())
}

fn default_width() -> u32 {
    1300
}

fn default_height() -> u32 {
    800
}

fn default_true() -> bool {
    true
}

fn default_highlight_color() -> String {
    "#F7A7A6".to_string()
}

fn default_node_color() -> String {
    "lightblue".to_string()
}

fn default_node_size() -> u32 {
    15
}

fn default_link_color() -> String {
    "black".to_string()
}

fn default_link_width() -> u32 {
    2
}
