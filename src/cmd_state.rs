//! State inspection commands: status, cache, style and settings.

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;

use replysmith_protocols::{Settings, StyleProfile};

use crate::cli::{CacheAction, SettingsAction, StyleAction};
use crate::register::AppContext;

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn redacted(mut settings: Settings) -> Settings {
    if settings.api_key().is_some() {
        settings.api_key = Some("<redacted>".to_string());
    }
    settings
}

pub(crate) async fn status(ctx: &AppContext) -> anyhow::Result<()> {
    let status = ctx.orchestrator.gate().status().await?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

pub(crate) async fn cache(ctx: &AppContext, action: CacheAction) -> anyhow::Result<()> {
    let cache = ctx.orchestrator.cache();
    match action {
        CacheAction::Stats => {
            let stats = cache.stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        CacheAction::Clear => {
            cache.clear().await?;
            println!("Cache cleared");
        }
    }
    Ok(())
}

pub(crate) async fn style(ctx: &AppContext, action: StyleAction) -> anyhow::Result<()> {
    let styles = ctx.orchestrator.styles();
    match action {
        StyleAction::Show => {
            let profile = styles.get().await?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        StyleAction::Set { file } => {
            let profile: StyleProfile = read_json(&file)?;
            styles.set(&profile).await?;
            println!("Style profile updated");
        }
        StyleAction::Clear => {
            styles.clear().await?;
            println!("Style profile reset");
        }
    }
    Ok(())
}

pub(crate) async fn settings(ctx: &AppContext, action: SettingsAction) -> anyhow::Result<()> {
    match action {
        SettingsAction::Show => {
            let settings = redacted(ctx.effective_settings().await?);
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsAction::Set { file } => {
            let settings: Settings = read_json(&file)?;
            ctx.settings.set(&settings).await?;
            println!("Settings stored");
        }
        SettingsAction::Clear => {
            ctx.settings.clear().await?;
            println!("Stored settings cleared");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_hides_key_only() {
        let settings = Settings {
            api_key: Some("sk-secret".to_string()),
            model: "gpt-4o".to_string(),
            ..Default::default()
        };
        let shown = redacted(settings);
        assert_eq!(shown.api_key.as_deref(), Some("<redacted>"));
        assert_eq!(shown.model, "gpt-4o");

        assert!(redacted(Settings::default()).api_key.is_none());
    }

    #[test]
    fn test_read_json_reports_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("style.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = read_json::<StyleProfile>(&path).unwrap_err();
        assert!(err.to_string().contains("style.json"));
    }
}
