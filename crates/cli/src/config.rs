use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use wire::Endpoint;

const APP_NAME: &str = "sdrdb";

/// Endpoint used when neither the flag nor the config file names one.
pub const DEFAULT_ENDPOINT: &str = "unix:///tmp/sdrdb.sock";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub endpoint: Option<String>,
}

pub fn get_config_dir() -> Result<PathBuf> {
    // SDRDB_CONFIG_PATH overrides the default config directory
    if let Ok(path) = std::env::var("SDRDB_CONFIG_PATH") {
        return Ok(PathBuf::from(path));
    }

    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .context("Could not determine config directory")
}

pub fn get_config_file() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let config_file = get_config_file()?;

    if !config_file.exists() {
        return Ok(Config::default());
    }

    let contents = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed to read config file: {}", config_file.display()))?;

    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", config_file.display()))
}

pub fn save_config(config: &Config) -> Result<()> {
    let config_file = get_config_file()?;
    let config_dir = get_config_dir()?;

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config directory: {}", config_dir.display()))?;
    }

    let contents = toml::to_string_pretty(config)?;
    fs::write(&config_file, contents)
        .with_context(|| format!("Failed to write config file: {}", config_file.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o600);
        fs::set_permissions(&config_file, perms)?;
    }

    Ok(())
}

pub fn get_config_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "server.endpoint" => config.server.endpoint.clone(),
        _ => None,
    }
}

pub fn set_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "server.endpoint" => {
            value
                .parse::<Endpoint>()
                .with_context(|| format!("Invalid endpoint: {}", value))?;
            config.server.endpoint = Some(value.to_string());
        }
        _ => anyhow::bail!("Unknown config key: {}", key),
    }
    Ok(())
}

/// Resolve the endpoint to talk to: flag > config file > default.
pub fn resolve_endpoint(flag: Option<&str>) -> Result<Endpoint> {
    let spec = match flag {
        Some(spec) => spec.to_string(),
        None => load_config()?
            .server
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
    };

    spec.parse()
        .with_context(|| format!("Invalid endpoint: {}", spec))
}
