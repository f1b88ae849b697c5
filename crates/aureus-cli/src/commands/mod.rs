pub mod init;
pub mod list_models;
pub mod play;
pub mod questions;
pub mod wallet;

use std::sync::Arc;

use anyhow::{Context, Result};

use aureus_core::source::GeneratedQuestionSource;
use aureus_providers::{create_provider, ArcadeConfig};

/// Build the AI-backed question source for the chosen provider and model.
pub fn build_source(
    config: &ArcadeConfig,
    provider: Option<&str>,
    model: Option<&str>,
) -> Result<GeneratedQuestionSource> {
    let name = provider.unwrap_or(&config.default_provider);
    let provider_config = config.providers.get(name).with_context(|| {
        format!(
            "provider '{name}' is not configured. Run `aureus init`, set AUREUS_GEMINI_KEY, or pass --offline"
        )
    })?;
    let provider = create_provider(name, provider_config)?;
    let model = model.unwrap_or(&config.default_model);

    Ok(GeneratedQuestionSource::new(Arc::from(provider), model)
        .with_temperature(config.temperature)
        .with_timeout(config.fetch_timeout()))
}
