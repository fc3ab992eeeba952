//! Platform-specific directory management
//!
//! Locates the configuration directory. `PICO_SETUP_CONFIG_DIR` overrides the
//! platform default (`$XDG_CONFIG_HOME/pico-setup` or `~/.config/pico-setup`
//! on Linux).

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the config directory
pub const ENV_CONFIG_DIR: &str = "PICO_SETUP_CONFIG_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "pico-setup";

/// Directory provider for pico-setup
#[derive(Debug, Clone)]
pub struct SetupDirs {
    config_dir: PathBuf,
}

impl SetupDirs {
    /// Resolve directories from the environment or platform defaults
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
        }
    }

    /// Get the config directory path
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Get the config file path
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// The invoking user's home directory
    #[must_use]
    pub fn home_dir() -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(path) = env::var(ENV_CONFIG_DIR) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }

        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }
}

impl Default for SetupDirs {
    fn default() -> Self {
        Self::new()
    }
}
