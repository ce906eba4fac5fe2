//! Credential resolution.
//!
//! Auth is resolved as a pure function of three explicit layers, in
//! precedence order: options passed by the caller, an environment
//! snapshot, and an optional on-disk config file. Nothing here reads
//! ambient process state except the two snapshot helpers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

const TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];
const USER_VARS: [&str; 2] = ["GITHUB_USER", "GH_USER"];

/// Resolved (or partially resolved) credentials. Both fields absent means
/// anonymous access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthConfig {
    pub user: Option<String>,
    pub token: Option<String>,
}

impl AuthConfig {
    pub fn token(token: impl Into<String>) -> Self {
        Self {
            user: None,
            token: Some(token.into()),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.token.is_none()
    }
}

/// The `~/.config/repolens/config.toml` schema.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub auth: FileAuth,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileAuth {
    pub user: Option<String>,
    pub token: Option<String>,
}

/// Default config file location under the platform config directory.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("repolens").join("config.toml"))
}

/// Load a config file if it exists. A missing file is `None`; a present
/// but unreadable or malformed file is an error.
pub fn load_config_file(path: &Path) -> Result<Option<ConfigFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path).map_err(|err| Error::Config {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    let parsed = toml::from_str(&raw).map_err(|err| Error::Config {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    Ok(Some(parsed))
}

/// Snapshot the environment variables credential resolution cares about.
pub fn env_snapshot() -> HashMap<String, String> {
    TOKEN_VARS
        .iter()
        .chain(USER_VARS.iter())
        .filter_map(|var| std::env::var(var).ok().map(|value| (var.to_string(), value)))
        .collect()
}

/// Resolve credentials: explicit options win over the environment, the
/// environment wins over the config file, and with none of the three the
/// result is anonymous.
pub fn resolve_auth(
    explicit: &AuthConfig,
    env: &HashMap<String, String>,
    file: Option<&ConfigFile>,
) -> AuthConfig {
    let from_env = |vars: &[&str]| {
        vars.iter()
            .find_map(|var| env.get(*var).filter(|value| !value.is_empty()).cloned())
    };

    let token = explicit
        .token
        .clone()
        .or_else(|| from_env(&TOKEN_VARS))
        .or_else(|| file.and_then(|f| f.auth.token.clone()));
    let user = explicit
        .user
        .clone()
        .or_else(|| from_env(&USER_VARS))
        .or_else(|| file.and_then(|f| f.auth.user.clone()));

    AuthConfig { user, token }
}
