/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! `citeblock.toml`.
//!
//! Every section is optional:
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:3000"
//!
//! [storage]
//! styles_dir = "styles"
//! items_dir = "items"
//!
//! [site]
//! timezone = "Europe/Berlin"
//!
//! [block]
//! default_csl = "apa"
//! default_csl_type = "book"
//!
//! [render]
//! mode = "bibliography"
//!
//! [mapping]
//! title = ["title"]
//! field_author = ["author"]
//! ```
//!
//! A `[mapping]` table replaces the default mapping entirely.

use std::path::{Path, PathBuf};

use citeblock_core::{BlockConfig, FieldMapping};
use citeblock_processor::RenderMode;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "citeblock.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub block: BlockConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub mapping: FieldMapping,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_styles_dir")]
    pub styles_dir: PathBuf,

    #[serde(default = "default_items_dir")]
    pub items_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// IANA timezone used to turn timestamps into dates.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub mode: RenderMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            styles_dir: default_styles_dir(),
            items_dir: default_items_dir(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_styles_dir() -> PathBuf {
    PathBuf::from("styles")
}

fn default_items_dir() -> PathBuf {
    PathBuf::from("items")
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path`, or `citeblock.toml` if it exists, or the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }
}
