//! Configuration resolution for songsmith-studio
//!
//! Priority per setting:
//! - port: CLI / `PORT` → TOML → 5000
//! - bind address: CLI → 0.0.0.0
//! - root folder: CLI → `SONGSMITH_ROOT_FOLDER` / `SONGSMITH_ROOT` → TOML → platform default
//! - credentials: environment → TOML; absence is reported per request, not at startup

use songsmith_common::config::{resolve_credential, RootFolderResolver, TomlConfig};
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::services::{OPENAI_KEY_ENV, REPLICATE_TOKEN_ENV};

/// Module name (TOML file name, health output)
pub const MODULE_NAME: &str = "songsmith-studio";

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Values given on the command line (or via clap's env fallback)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub bind: Option<String>,
    pub root_folder: Option<PathBuf>,
}

/// Fully resolved service configuration
#[derive(Clone)]
pub struct StudioConfig {
    pub bind_addr: String,
    pub port: u16,
    pub root_folder: PathBuf,
    pub openai_api_key: Option<String>,
    pub replicate_api_token: Option<String>,
}

// Keys stay out of logs
impl fmt::Debug for StudioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudioConfig")
            .field("bind_addr", &self.bind_addr)
            .field("port", &self.port)
            .field("root_folder", &self.root_folder)
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<set>"))
            .field("replicate_api_token", &self.replicate_api_token.as_ref().map(|_| "<set>"))
            .finish()
    }
}

impl StudioConfig {
    pub fn resolve(overrides: CliOverrides, toml_config: &TomlConfig) -> Self {
        let port = overrides.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);
        let bind_addr = overrides.bind.unwrap_or_else(|| DEFAULT_BIND.to_string());
        let root_folder = overrides
            .root_folder
            .unwrap_or_else(|| RootFolderResolver::new(MODULE_NAME).resolve());

        Self {
            bind_addr,
            port,
            root_folder,
            openai_api_key: resolve_credential(
                OPENAI_KEY_ENV,
                toml_config.openai_api_key.as_deref(),
            ),
            replicate_api_token: resolve_credential(
                REPLICATE_TOKEN_ENV,
                toml_config.replicate_api_token.as_deref(),
            ),
        }
    }

    /// `host:port` for the listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Log which credentials are present (never their values)
    pub fn log_credentials(&self) {
        for (name, value) in [
            (OPENAI_KEY_ENV, &self.openai_api_key),
            (REPLICATE_TOKEN_ENV, &self.replicate_api_token),
        ] {
            if value.is_some() {
                info!("{} configured", name);
            } else {
                warn!("{} is not set; related requests will fail", name);
            }
        }
    }
}
