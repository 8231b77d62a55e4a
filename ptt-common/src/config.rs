//! Configuration file resolution and loading

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "PTT_CONFIG";

/// Config file resolution, in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. User config file (`~/.config/ptt/config.toml` on Linux)
/// 4. System config file (`/etc/ptt/config.toml`, Linux only)
///
/// Returns `None` when nothing is found; callers then run on built-in defaults.
pub fn resolve_config_file(cli_arg: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: per-user config directory
    if let Some(path) = dirs::config_dir().map(|d| d.join("ptt").join("config.toml")) {
        if path.exists() {
            return Some(path);
        }
    }

    // Priority 4: system-wide file
    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/ptt/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Parsed from this file
    File(PathBuf),
    /// This file was named but does not exist; defaults apply
    Missing(PathBuf),
    /// No file was named; defaults apply
    Defaults,
}

/// A configuration plus the origin it was loaded from
#[derive(Debug, Clone)]
pub struct LoadedConfig<T> {
    pub config: T,
    pub origin: ConfigOrigin,
}

impl<T> LoadedConfig<T> {
    /// Report the origin through `tracing`
    ///
    /// Loading itself logs nothing, so binaries can load the config first
    /// (it sets the log level) and report once the subscriber is installed.
    pub fn log_origin(&self) {
        match &self.origin {
            ConfigOrigin::File(path) => info!("Loaded config file: {}", path.display()),
            ConfigOrigin::Missing(path) => warn!(
                "Config file not found: {} (using built-in defaults)",
                path.display()
            ),
            ConfigOrigin::Defaults => info!("No config file found, using built-in defaults"),
        }
    }
}

/// Load a TOML config, falling back to `T::default()` when there is no file
///
/// A file that was named explicitly but does not exist falls back to
/// defaults with [`ConfigOrigin::Missing`]. A file that exists but does not
/// parse is an error.
pub fn load_toml<T>(path: Option<&Path>) -> Result<LoadedConfig<T>>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        return Ok(LoadedConfig {
            config: T::default(),
            origin: ConfigOrigin::Defaults,
        });
    };

    if !path.exists() {
        return Ok(LoadedConfig {
            config: T::default(),
            origin: ConfigOrigin::Missing(path.to_path_buf()),
        });
    }

    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str::<T>(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

    Ok(LoadedConfig {
        config,
        origin: ConfigOrigin::File(path.to_path_buf()),
    })
}

/// [`load_toml`] for callers with a subscriber already installed
pub fn load_toml_or_default<T>(path: Option<&Path>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let loaded = load_toml(path)?;
    loaded.log_origin();
    Ok(loaded.config)
}
