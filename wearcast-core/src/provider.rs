use crate::{
    Config,
    config::ProviderId,
    error::{Error, Result},
    model::{Coordinates, WeatherReport},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use std::fmt::Debug;

pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Resolve a free-text city name to the coordinates of its first match.
    async fn lookup_city(&self, city: &str) -> Result<Coordinates>;

    /// Fetch current conditions and today's forecast. All-or-nothing.
    async fn fetch(&self, coords: Coordinates, now: DateTime<FixedOffset>) -> Result<WeatherReport>;
}

/// Construct the weather provider from config.
pub fn weather_provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>> {
    let id = ProviderId::OpenWeather;
    let api_key = config.resolved_api_key(id).ok_or_else(|| {
        Error::ConfigurationError(format!(
            "No API key configured for provider '{id}'.\n\
             Hint: run `wearcast configure {id}` or set {}.",
            id.env_var()
        ))
    })?;

    let provider = match config.base_url(id) {
        Some(base_url) => OpenWeatherProvider::with_base_url(api_key, base_url),
        None => OpenWeatherProvider::new(api_key),
    };

    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        // An override from the environment would defeat this test.
        if std::env::var(ProviderId::OpenWeather.env_var()).is_ok() {
            return;
        }

        let cfg = Config::default();
        let err = weather_provider_from_config(&cfg).unwrap_err();

        assert!(matches!(err, Error::ConfigurationError(_)));
        let msg = err.to_string();
        assert!(msg.contains("No API key configured for provider 'openweather'"));
        assert!(msg.contains("Hint: run `wearcast configure openweather`"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "KEY".to_string());

        assert!(weather_provider_from_config(&cfg).is_ok());
    }
}
