//! Configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. `SONGSMITH_ROOT_FOLDER` environment variable
//! 2. `SONGSMITH_ROOT` environment variable
//! 3. `root_folder` key in the module TOML file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or unreadable TOML file is never fatal: a warning is logged and
//! defaults are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Primary root folder environment variable
pub const ROOT_FOLDER_ENV: &str = "SONGSMITH_ROOT_FOLDER";

/// Alternative root folder environment variable
pub const ROOT_ENV: &str = "SONGSMITH_ROOT";

/// Sub-directory of the root folder holding in-flight uploads
pub const UPLOADS_DIR_NAME: &str = "uploads";

/// Logging section of the TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing level when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Per-module TOML configuration (`~/.config/songsmith/<module>.toml`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Text-generation credential (fallback for `OPENAI_API_KEY`)
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Media-generation credential (fallback for `REPLICATE_API_TOKEN`)
    #[serde(default)]
    pub replicate_api_token: Option<String>,
}

impl TomlConfig {
    /// Parse a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }
}

/// Location of a module's TOML file, if the platform has a config directory
pub fn config_file_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("songsmith").join(format!("{}.toml", module_name)))
}

/// Where a module's TOML settings came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// No config directory or no file; compiled defaults apply
    Defaults,
    Loaded(PathBuf),
    /// File exists but could not be used; compiled defaults apply
    Ignored { path: PathBuf, reason: String },
}

impl ConfigSource {
    /// Report the outcome through `tracing`
    pub fn log(&self) {
        match self {
            ConfigSource::Defaults => debug!("No config file; using defaults"),
            ConfigSource::Loaded(path) => info!("Loaded config from {}", path.display()),
            ConfigSource::Ignored { path, reason } => {
                warn!("Ignoring config file {}: {}", path.display(), reason)
            }
        }
    }
}

/// Read a TOML config file without logging, degrading to defaults on any problem
///
/// For callers that must load settings before a subscriber exists; log the
/// returned [`ConfigSource`] afterwards.
pub fn read_toml_config(path: Option<&Path>) -> (TomlConfig, ConfigSource) {
    let Some(path) = path.filter(|p| p.exists()) else {
        return (TomlConfig::default(), ConfigSource::Defaults);
    };

    match TomlConfig::load(path) {
        Ok(config) => (config, ConfigSource::Loaded(path.to_path_buf())),
        Err(e) => (
            TomlConfig::default(),
            ConfigSource::Ignored {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        ),
    }
}

/// Load a module's TOML config, degrading to defaults on any problem
pub fn load_toml_config(module_name: &str) -> TomlConfig {
    let (config, source) = read_toml_config(config_file_path(module_name).as_deref());
    source.log();
    config
}

/// Compiled-in defaults for the current platform
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        // ~/.local/share/songsmith, ~/Library/Application Support/songsmith, %LOCALAPPDATA%\songsmith
        let root_folder = dirs::data_local_dir()
            .map(|d| d.join("songsmith"))
            .unwrap_or_else(|| PathBuf::from("./songsmith_data"));

        Self {
            root_folder,
            log_level: default_log_level(),
        }
    }
}

/// Resolves the root folder for a module
pub struct RootFolderResolver {
    module_name: String,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
        }
    }

    /// Resolve using environment → TOML → compiled default
    pub fn resolve(&self) -> PathBuf {
        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Ok(path) = std::env::var(ROOT_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(root_folder) = load_toml_config(&self.module_name).root_folder {
            return root_folder;
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the root folder and derives paths inside it
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the root folder (and parents). Idempotent.
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            info!("Creating root folder: {}", self.root_folder.display());
        }
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    /// Well-known directory for in-flight uploads (created lazily by its owner)
    pub fn uploads_path(&self) -> PathBuf {
        self.root_folder.join(UPLOADS_DIR_NAME)
    }
}

/// Validate a credential (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve a credential from environment → TOML
///
/// Returns `None` when neither source holds a usable value; callers decide
/// when absence becomes an error.
pub fn resolve_credential(env_var: &str, toml_value: Option<&str>) -> Option<String> {
    let env_key = std::env::var(env_var).ok().filter(|k| is_valid_key(k));
    let toml_key = toml_value.filter(|k| is_valid_key(k)).map(str::to_string);

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "{} found in both environment and TOML. Using environment (highest priority).",
            env_var
        );
    }

    env_key.or(toml_key)
}
