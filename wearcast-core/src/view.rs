//! Display strings for a [`WeatherReport`].

use chrono::Datelike;

use crate::{model::WeatherReport, season::Season};

const MISSING: &str = "N/A";

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub time: String,
    pub temperature: String,
    pub feels_like: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherView {
    pub temperature: String,
    pub feels_like: String,
    pub description: String,
    pub wind: String,
    pub humidity: String,
    pub cloud_cover: String,
    pub place: String,
    pub date: String,
    pub season: Season,
    pub rows: Vec<ForecastRow>,
}

fn celsius(value: f64) -> String {
    format!("{value:.1}°C")
}

fn or_missing(value: Option<f64>, fmt: impl Fn(f64) -> String) -> String {
    value.map(fmt).unwrap_or_else(|| MISSING.to_string())
}

impl WeatherView {
    pub fn new<D: Datelike>(report: &WeatherReport, today: &D) -> Self {
        let current = &report.current;

        Self {
            temperature: or_missing(current.temperature, celsius),
            feels_like: or_missing(current.feels_like, celsius),
            description: current.description.clone().unwrap_or_else(|| "Unknown".to_string()),
            wind: or_missing(current.wind_speed, |v| format!("{v:.1} m/s")),
            humidity: or_missing(current.humidity, |v| format!("{v}%")),
            cloud_cover: or_missing(current.cloud_coverage, |v| format!("{v}%")),
            place: report.location.to_string(),
            date: format!("{:04}-{:02}-{:02}", today.year(), today.month(), today.day()),
            season: Season::of(today),
            rows: report
                .daily_forecast
                .iter()
                .map(|slice| ForecastRow {
                    time: slice.time.clone(),
                    temperature: celsius(slice.temperature),
                    feels_like: celsius(slice.feels_like),
                    description: slice.description.clone(),
                })
                .collect(),
        }
    }
}
