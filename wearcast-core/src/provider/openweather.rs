use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::{
    error::{Error, Result},
    model::{Coordinates, WeatherReport},
    normalize::{self, OwCurrentResponse, OwForecastResponse},
};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const SERVICE: &str = "OpenWeather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

/// Error body shape, e.g. `{"cod":"404","message":"city not found"}`.
#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build OpenWeather client, using defaults: {}", e);
                Client::new()
            });

        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        what: &str,
    ) -> Result<T> {
        let url = format!("{}/data/2.5/{}", self.base_url, endpoint);
        tracing::debug!("Requesting OpenWeather {} ({})", what, url);

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("units", "metric"), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("OpenWeather {} request failed: {}", what, e.without_url());
                Error::NetworkUnavailable(format!("{SERVICE} ({what})"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            tracing::warn!("Failed to read OpenWeather {} response body: {}", what, e.without_url());
            Error::NetworkUnavailable(format!("{SERVICE} ({what})"))
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<OwErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| truncate_body(&body));

            tracing::warn!("OpenWeather {} returned {}: {}", what, status, message);
            return Err(Error::ProviderError { status: status.as_u16(), message });
        }

        serde_json::from_str(&body).map_err(|e| Error::MalformedResponse {
            service: format!("{SERVICE} ({what})"),
            detail: e.to_string(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn lookup_city(&self, city: &str) -> Result<Coordinates> {
        let city = city.trim();
        if city.is_empty() {
            return Err(Error::CityNotFound(String::new()));
        }

        let current: OwCurrentResponse = self
            .get("weather", &[("q", city.to_string())], "city lookup")
            .await
            .map_err(|err| match err {
                Error::ProviderError { status, ref message }
                    if status == 404 || message.eq_ignore_ascii_case("city not found") =>
                {
                    Error::CityNotFound(city.to_string())
                }
                other => other,
            })?;

        let coord = current.coord.ok_or_else(|| Error::MalformedResponse {
            service: format!("{SERVICE} (city lookup)"),
            detail: "response has no coordinates".into(),
        })?;

        tracing::info!("Resolved '{}' to {}, {}", city, coord.lat, coord.lon);
        Ok(Coordinates::new(coord.lat, coord.lon))
    }

    async fn fetch(&self, coords: Coordinates, now: DateTime<FixedOffset>) -> Result<WeatherReport> {
        let params = [
            ("lat", coords.latitude.to_string()),
            ("lon", coords.longitude.to_string()),
        ];

        let (current, forecast) = tokio::try_join!(
            self.get::<OwCurrentResponse>("weather", &params, "current weather"),
            self.get::<OwForecastResponse>("forecast", &params, "5-day forecast"),
        )?;

        let report = normalize::normalize(current, forecast, now);
        tracing::info!(
            "Fetched weather for {} with {} forecast slices today",
            report.location,
            report.daily_forecast.len()
        );

        Ok(report)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(250);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);

        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider = OpenWeatherProvider::with_base_url("KEY".into(), "http://localhost:1234/");
        assert_eq!(provider.base_url, "http://localhost:1234");
    }
}
