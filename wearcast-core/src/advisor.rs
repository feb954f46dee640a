//! Clothing recommendation pipeline: prompt in, raw text out.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::fmt::Debug;

use crate::{
    Config,
    advisor::gemini::GeminiClient,
    config::ProviderId,
    error::{Error, Result},
    model::WeatherReport,
    profile::UserAttributes,
    prompt::build_prompt,
};

pub mod gemini;

/// A generative-text backend.
#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    /// Submit one prompt and return the reply unmodified.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Build the prompt and make a single generation request.
pub async fn recommend(
    generator: &dyn TextGenerator,
    report: &WeatherReport,
    user: &UserAttributes,
    now: NaiveDateTime,
) -> Result<String> {
    let missing = user.missing_required();
    if !missing.is_empty() {
        return Err(Error::MissingUserAttributes(missing));
    }

    let prompt = build_prompt(report, user, now);
    tracing::debug!("Recommendation prompt is {} characters", prompt.len());

    let text = generator.generate(&prompt).await?;
    tracing::info!("Received recommendation ({} characters)", text.len());

    Ok(text)
}

/// Construct the text generator from config.
///
/// A missing API key is reported by the first `generate` call, so weather can
/// still be shown without one.
pub fn generator_from_config(config: &Config) -> Box<dyn TextGenerator> {
    let id = ProviderId::Gemini;
    let mut client = GeminiClient::new(config.resolved_api_key(id));

    if let Some(base_url) = config.base_url(id) {
        client = client.with_base_url(base_url);
    }
    if let Some(model) = config.model(id) {
        client = client.with_model(model);
    }

    Box::new(client)
}
