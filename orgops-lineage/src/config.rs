//! Layered configuration using Figment
//!
//! Sources, later ones overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. Global file `~/.orgops/orgops.{toml,yaml,yml,json}`
//! 3. Project file `./.orgops/orgops.{toml,yaml,yml,json}`
//! 4. Environment variables prefixed `ORGOPS_`, nested keys split on `__`
//!    (`ORGOPS_LOG__LEVEL=debug`)
//!
//! Nothing is cached; each `load` reads the sources again.

use crate::error::Result;
use crate::types::CompanyId;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Directory name used for both global and project configuration
pub const CONFIG_DIR: &str = ".orgops";

/// Base file name, extension decides the format
pub const CONFIG_FILE_STEM: &str = "orgops";

const ENV_PREFIX: &str = "ORGOPS_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgopsConfig {
    /// Root of the file-backed store
    pub data_dir: PathBuf,
    /// Tenant stamped onto persisted rows
    pub company_id: CompanyId,
    /// Attribution written to the activity log
    pub actor: Option<String>,
    pub log: LogConfig,
}

impl Default for OrgopsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(CONFIG_DIR),
            company_id: CompanyId::default(),
            actor: None,
            log: LogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// EnvFilter directive, e.g. `info` or `orgops_lineage=debug`
    pub level: String,
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: true,
        }
    }
}

/// Configuration file format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl OrgopsConfig {
    /// Load from the global and current-directory config dirs plus environment
    pub fn load() -> Result<Self> {
        let mut search = Vec::new();
        if let Some(home) = dirs::home_dir() {
            search.push(home.join(CONFIG_DIR));
        }
        search.push(std::env::current_dir()?.join(CONFIG_DIR));
        Self::load_from_dirs(&search)
    }

    /// Load from a single config directory plus environment
    pub fn load_from(dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_from_dirs(&[dir.as_ref().to_path_buf()])
    }

    fn load_from_dirs(dirs: &[PathBuf]) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        for dir in dirs {
            for (path, format) in discover(dir) {
                trace!("loading config file {}", path.display());
                figment = match format {
                    ConfigFormat::Toml => figment.merge(Toml::file(&path)),
                    ConfigFormat::Yaml => figment.merge(Yaml::file(&path)),
                    ConfigFormat::Json => figment.merge(Json::file(&path)),
                };
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Self = figment.extract()?;
        debug!(
            data_dir = %config.data_dir.display(),
            company_id = %config.company_id,
            "loaded configuration"
        );
        Ok(config)
    }
}

/// Config files present in `dir`, in merge order
fn discover(dir: &Path) -> Vec<(PathBuf, ConfigFormat)> {
    ["toml", "yaml", "yml", "json"]
        .iter()
        .filter_map(|ext| {
            let path = dir.join(format!("{}.{}", CONFIG_FILE_STEM, ext));
            let format = ConfigFormat::from_extension(ext)?;
            path.is_file().then_some((path, format))
        })
        .collect()
}
