//! Reduction of OpenWeather payloads into a [`WeatherReport`].
//!
//! Place name and country come only from the current-conditions payload.
//! Forecast entries are kept when their `dt_txt` starts with today's UTC
//! date; that comparison ignores the timezone of the location itself.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Deserialize;

use crate::model::{CurrentConditions, ForecastSlice, Place, WeatherReport};

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct OwCoord {
    pub(crate) lat: f64,
    pub(crate) lon: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct OwMain {
    pub(crate) temp: Option<f64>,
    pub(crate) feels_like: Option<f64>,
    pub(crate) humidity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct OwWeather {
    pub(crate) description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub(crate) struct OwWind {
    pub(crate) speed: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct OwClouds {
    pub(crate) all: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct OwSys {
    pub(crate) country: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OwCurrentResponse {
    pub(crate) coord: Option<OwCoord>,
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) sys: OwSys,
    #[serde(default)]
    pub(crate) main: OwMain,
    #[serde(default)]
    pub(crate) weather: Vec<OwWeather>,
    #[serde(default)]
    pub(crate) wind: OwWind,
    #[serde(default)]
    pub(crate) clouds: OwClouds,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct OwForecastMain {
    pub(crate) temp: f64,
    pub(crate) feels_like: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct OwForecastEntry {
    pub(crate) dt: i64,
    pub(crate) dt_txt: String,
    pub(crate) main: OwForecastMain,
    #[serde(default)]
    pub(crate) weather: Vec<OwWeather>,
    #[serde(default)]
    pub(crate) wind: OwWind,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OwForecastResponse {
    #[serde(default)]
    pub(crate) list: Vec<OwForecastEntry>,
}

/// Keep entries whose `dt_txt` falls on `today`.
pub(crate) fn filter_today(entries: Vec<OwForecastEntry>, today: NaiveDate) -> Vec<OwForecastEntry> {
    let prefix = today.format("%Y-%m-%d").to_string();
    entries.into_iter().filter(|e| e.dt_txt.starts_with(&prefix)).collect()
}

fn time_label(entry: &OwForecastEntry, offset: &FixedOffset) -> String {
    match DateTime::<Utc>::from_timestamp(entry.dt, 0) {
        Some(ts) => ts.with_timezone(offset).format("%H:%M").to_string(),
        None => entry.dt_txt.get(11..16).unwrap_or(entry.dt_txt.as_str()).to_string(),
    }
}

pub(crate) fn current_conditions(current: &OwCurrentResponse) -> CurrentConditions {
    CurrentConditions {
        temperature: current.main.temp,
        feels_like: current.main.feels_like,
        description: current.weather.first().map(|w| w.description.clone()),
        wind_speed: current.wind.speed,
        humidity: current.main.humidity,
        cloud_coverage: current.clouds.all,
    }
}

pub(crate) fn place(current: &OwCurrentResponse) -> Place {
    Place {
        city: current.name.clone(),
        country: current.sys.country.clone().unwrap_or_default(),
    }
}

/// Build the report from both payloads, relative to the caller's `now`.
pub(crate) fn normalize(
    current: OwCurrentResponse,
    forecast: OwForecastResponse,
    now: DateTime<FixedOffset>,
) -> WeatherReport {
    let today = now.with_timezone(&Utc).date_naive();
    let offset = *now.offset();

    let daily_forecast = filter_today(forecast.list, today)
        .into_iter()
        .map(|entry| ForecastSlice {
            time: time_label(&entry, &offset),
            temperature: entry.main.temp,
            feels_like: entry.main.feels_like,
            description: entry
                .weather
                .first()
                .map(|w| w.description.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            wind_speed: entry.wind.speed,
        })
        .collect();

    WeatherReport {
        current: current_conditions(&current),
        daily_forecast,
        location: place(&current),
    }
}
