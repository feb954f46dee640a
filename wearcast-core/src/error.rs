//! Error taxonomy shared by every wearcast component.
//!
//! Each variant maps to one user-facing banner message via
//! [`Error::user_message`]; the `Display` text carries the technical detail
//! for logs.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid coordinates: '{0}'")]
    InvalidCoordinates(String),

    #[error("city not found: '{0}'")]
    CityNotFound(String),

    #[error("provider returned status {status}: {message}")]
    ProviderError { status: u16, message: String },

    #[error("no response received from {0}")]
    NetworkUnavailable(String),

    #[error("geolocation unavailable: {0}")]
    GeolocationUnavailable(String),

    #[error("configuration error: {0}")]
    ConfigurationError(String),

    #[error("authorization failed: {0}")]
    AuthorizationError(String),

    #[error("received an empty response from the text generation service")]
    EmptyResponse,

    #[error("failed to generate clothing recommendation: {0}")]
    GenerationError(String),

    #[error("malformed response from {service}: {detail}")]
    MalformedResponse { service: String, detail: String },

    #[error("missing user attributes: {}", .0.join(", "))]
    MissingUserAttributes(Vec<&'static str>),

    #[error("no weather data available")]
    NoWeatherData,
}

impl Error {
    /// Message suitable for the inline error banner.
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidCoordinates(_) => {
                "Invalid coordinates. Please enter valid latitude and longitude (e.g., 40.7128, -74.0060)."
                    .to_string()
            }
            Error::CityNotFound(_) => {
                "City not found. Please check the spelling and try again.".to_string()
            }
            Error::ProviderError { message, .. } => format!("Weather API error: {message}"),
            Error::NetworkUnavailable(_) => {
                "No response received from the weather service. Please check your internet connection."
                    .to_string()
            }
            Error::GeolocationUnavailable(_) => {
                "Unable to retrieve your location. Please enter coordinates manually.".to_string()
            }
            Error::ConfigurationError(detail) => format!("Configuration problem: {detail}"),
            Error::AuthorizationError(_) => {
                "Permission denied. Please check your API key and ensure it has the necessary permissions."
                    .to_string()
            }
            Error::EmptyResponse | Error::GenerationError(_) => {
                "Failed to generate clothing recommendation. Please try again.".to_string()
            }
            Error::MalformedResponse { .. } => {
                "Failed to fetch weather data. Please try again.".to_string()
            }
            Error::MissingUserAttributes(_) => {
                "Please set your age and gender in the settings before getting a recommendation."
                    .to_string()
            }
            Error::NoWeatherData => {
                "Weather data is missing. Please fetch weather data first.".to_string()
            }
        }
    }
}
