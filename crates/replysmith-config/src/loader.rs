//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound(path.display().to_string()),
            _ => ConfigError::Io(e),
        })?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// `~/.replysmith`, or `.replysmith` when no home directory is known.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(".replysmith"))
            .unwrap_or_else(|| PathBuf::from(".replysmith"))
    }

    /// Default config location: `~/.replysmith/config.toml`.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Resolve the state directory, honoring `storage.data_dir`.
    pub fn data_dir(config: &Config) -> PathBuf {
        match &config.storage.data_dir {
            Some(dir) => PathBuf::from(Self::expand_path(&dir.to_string_lossy())),
            None => Self::home_dir().join("state"),
        }
    }

    /// Resolve the log directory, honoring `logging.dir`.
    pub fn log_dir(config: &Config) -> PathBuf {
        match &config.logging.dir {
            Some(dir) => PathBuf::from(Self::expand_path(&dir.to_string_lossy())),
            None => Self::home_dir().join("logs"),
        }
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.config`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}
