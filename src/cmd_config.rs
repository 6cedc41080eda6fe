//! `replysmith config`.

use std::path::Path;

use replysmith_config::{ConfigLoader, ConfigValidator};

/// Validate the file at `path`. Returns whether it is usable.
pub(crate) fn check(path: &Path) -> anyhow::Result<bool> {
    if !path.exists() {
        println!("{}: not found, built-in defaults apply", path.display());
    }
    let config = match ConfigLoader::load_or_default(path) {
        Ok(config) => config,
        Err(e) => {
            println!("error: {}", e);
            return Ok(false);
        }
    };

    let result = ConfigValidator::validate(&config)?;
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }
    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    if result.is_valid() {
        println!("Configuration OK");
    }
    Ok(result.is_valid())
}
