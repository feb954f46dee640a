//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset};
use serde_json::{Value, json};
use wearcast_core::FixedClock;

/// 2024-05-01 08:30 UTC.
pub fn now() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2024-05-01T08:30:00Z").expect("timestamp")
}

pub fn clock() -> FixedClock {
    FixedClock(now())
}

pub fn current_london() -> Value {
    json!({
        "coord": { "lon": -0.1257, "lat": 51.5085 },
        "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
        "main": { "temp": 15.0, "feels_like": 14.4, "humidity": 82, "pressure": 1012 },
        "wind": { "speed": 4.63, "deg": 240 },
        "clouds": { "all": 75 },
        "dt": 1_714_552_200,
        "sys": { "country": "GB" },
        "name": "London",
        "cod": 200
    })
}

fn slice(dt: i64, dt_txt: &str, temp: f64, description: &str) -> Value {
    json!({
        "dt": dt,
        "main": { "temp": temp, "feels_like": temp - 0.8, "humidity": 80 },
        "weather": [{ "description": description }],
        "wind": { "speed": 3.9 },
        "dt_txt": dt_txt
    })
}

/// Three slices on 2024-05-01 and one on the next day.
pub fn forecast_london() -> Value {
    json!({
        "cod": "200",
        "cnt": 4,
        "list": [
            slice(1_714_554_000, "2024-05-01 09:00:00", 15.2, "light rain"),
            slice(1_714_564_800, "2024-05-01 12:00:00", 16.8, "overcast clouds"),
            slice(1_714_575_600, "2024-05-01 15:00:00", 17.1, "broken clouds"),
            slice(1_714_608_000, "2024-05-02 00:00:00", 10.4, "clear sky"),
        ],
        "city": { "name": "London", "country": "GB" }
    })
}

pub fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}
