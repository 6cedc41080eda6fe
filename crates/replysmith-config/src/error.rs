//! Configuration errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid config format: {0}")]
    InvalidFormat(String),

    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_error_names_location() {
        let toml_err = toml::from_str::<toml::Table>("[gate\nmax_per_hour = 3").unwrap_err();
        let err = ConfigError::from(toml_err);
        let display = err.to_string();
        assert!(display.starts_with("TOML parse error"));
        assert!(display.contains("line "));
    }

    #[test]
    fn test_env_var_error_names_variable() {
        let err = ConfigError::EnvVarNotSet("OPENAI_API_KEY".to_string());
        assert_eq!(
            err.to_string(),
            "Environment variable not set: OPENAI_API_KEY"
        );
    }

    #[test]
    fn test_io_error_keeps_cause() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(ConfigError::from(io_err).to_string(), "IO error: denied");
    }
}
