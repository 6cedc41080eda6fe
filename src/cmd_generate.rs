//! `replysmith generate`.

use std::io::Read;

use anyhow::{bail, Context};
use tracing::info;

use replysmith_protocols::{Author, Clock, GenerateRequest, GenerateResult};
use replysmith_runtime::SystemClock;

use crate::cli::GenerateArgs;
use crate::register::{switch_provider, AppContext};

fn post_content(raw: &str) -> anyhow::Result<String> {
    if raw != "-" {
        return Ok(raw.to_string());
    }
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("failed to read post from stdin")?;
    Ok(content)
}

pub(crate) fn build_request(args: &GenerateArgs, content: String) -> GenerateRequest {
    let mut request = GenerateRequest::new(content, Author::new(&args.author, &args.headline))
        .with_media(args.media);
    request.timestamp_ms = SystemClock.now().timestamp_millis();
    if let Some(label) = &args.vibe {
        request = request.with_vibe(label, args.vibe_prompt.clone().unwrap_or_default());
    }
    request
}

/// Draft a reply and print the result. Returns whether it succeeded.
pub(crate) async fn run(ctx: &AppContext, args: GenerateArgs) -> anyhow::Result<bool> {
    let content = post_content(&args.content)?;
    if content.trim().is_empty() {
        bail!("Post content is empty");
    }

    let mut settings = ctx.effective_settings().await?;
    if let Some(provider) = &args.provider {
        switch_provider(&ctx.config, &mut settings, provider);
    }
    if let Some(model) = &args.model {
        settings.model = model.clone();
    }

    let request = build_request(&args, content);
    let result: GenerateResult = ctx.orchestrator.generate(&request, &settings).await;

    if result.success {
        info!(from_cache = result.from_cache, "Reply drafted");
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(result.success)
}
