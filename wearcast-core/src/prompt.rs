//! Prompt template for the clothing recommendation.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::{
    model::WeatherReport,
    profile::UserAttributes,
    season::{DayPhase, Season},
};

const DAYTIME_GUIDANCE: &str = "It is currently daytime. Include protective measures against UV rays \
(sunglasses, hat, sunscreen) where the conditions call for them.";

const NIGHTTIME_GUIDANCE: &str = "It is currently evening or nighttime. Do not mention sun exposure, \
UV protection, sunglasses or sunscreen.";

/// Build the prompt for one recommendation request.
///
/// The output depends only on the arguments.
pub fn build_prompt(report: &WeatherReport, user: &UserAttributes, now: NaiveDateTime) -> String {
    let season = Season::of(&now);
    let phase = DayPhase::from_hour(now.hour());
    let date = format!("{:04}-{:02}-{:02}", now.year(), now.month(), now.day());
    let time = now.format("%H:%M");
    let location = report.location.to_string();

    let current = to_json(&report.current);
    let forecast = to_json(&report.daily_forecast);
    let user_json = to_json(user);

    let guidance = if phase.is_night() { NIGHTTIME_GUIDANCE } else { DAYTIME_GUIDANCE };

    format!(
        "\
Given the following weather conditions, user information, current date, season, and location, \
provide a **concise and practical clothing recommendation**. Consider how the season and region \
might affect how the user perceives the temperature.

**Current Date:** {date}
**Current Season:** {season}
**Location:** {location}
**Current Time:** {time}
**Current Weather:** {current}
**Daily Forecast:** {forecast}
**User Information:** {user_json}

# Steps

1. **Analyze Input Data**: review the date, season, location, time, current weather and daily \
forecast, together with the user's age, gender, activity and time outdoors.

2. **Weather Summary**: start with a short summary of the conditions and expected changes that \
matter for clothing.

3. **Outfit Suggestion**: recommend clothing by layer:
    - Outerwear
    - Top layer
    - Bottom layer
    - Footwear
    - Essential accessories
   Tailor it to the time of day and the forecast.

4. **Adaptation Tips**: give practical tips for adapting to temperature changes during the \
activity, such as cooling winds or temperature swings.

5. **Daytime vs. Nighttime**: {guidance}

# Output Format

Separate sections with a blank line. Start each section with a bold header line.

- A brief weather summary paragraph
- A concise outfit list
- Adaptation tips as bullet points

# Example

**Weather Summary:**
Sunny with light winds, 24°C, cooling to 18°C by evening in {location}, during {season}.

**Clothing Recommendation:**
- Outerwear: Light jacket
- Top Layer: T-shirt
- Bottom Layer: Chinos
- Footwear: Sneakers
- Accessories: Cap, backpack for storing layers

**Adaptation Tips:**
- Carry a light scarf for cooling winds in the evening.
- Add a hoodie under your jacket when temperatures begin to drop.

Replace the example values with advice for this user and these conditions, and add emojis.
"
    )
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurrentConditions, ForecastSlice, Place};
    use chrono::NaiveDate;

    fn report() -> WeatherReport {
        WeatherReport {
            current: CurrentConditions {
                temperature: Some(15.0),
                feels_like: Some(13.9),
                description: Some("light rain".into()),
                wind_speed: Some(4.1),
                humidity: Some(82.0),
                cloud_coverage: Some(90.0),
            },
            daily_forecast: vec![ForecastSlice {
                time: "15:00".into(),
                temperature: 16.2,
                feels_like: 15.8,
                description: "overcast clouds".into(),
                wind_speed: Some(3.0),
            }],
            location: Place { city: "London".into(), country: "GB".into() },
        }
    }

    fn user() -> UserAttributes {
        UserAttributes {
            location: Some("London, GB".into()),
            age: Some(34),
            gender: Some("female".into()),
            activity: Some("Cycling".into()),
            outdoors_time: Some(2.0),
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .expect("valid datetime")
    }

    #[test]
    fn prompt_embeds_context_and_serialized_data() {
        let prompt = build_prompt(&report(), &user(), at(2024, 4, 12, 9, 5));

        assert!(prompt.contains("**Current Date:** 2024-04-12"));
        assert!(prompt.contains("**Current Season:** Spring"));
        assert!(prompt.contains("**Location:** London, GB"));
        assert!(prompt.contains("**Current Time:** 09:05"));
        assert!(prompt.contains("\"description\":\"light rain\""));
        assert!(prompt.contains("\"time\":\"15:00\""));
        assert!(prompt.contains("\"outdoorsTime\":2.0"));
        assert!(prompt.contains("\"activity\":\"Cycling\""));
        assert!(prompt.contains("**Weather Summary:**"));
        assert!(prompt.contains("**Clothing Recommendation:**"));
    }

    #[test]
    fn daytime_prompt_asks_for_uv_protection() {
        let prompt = build_prompt(&report(), &user(), at(2024, 7, 1, 17, 59));
        assert!(prompt.contains(DAYTIME_GUIDANCE));
        assert!(!prompt.contains(NIGHTTIME_GUIDANCE));
        assert!(prompt.contains("**Current Season:** Summer"));
    }

    #[test]
    fn nighttime_prompt_omits_sun_advice() {
        for hour in [18, 23, 0, 5] {
            let prompt = build_prompt(&report(), &user(), at(2024, 1, 15, hour, 0));
            assert!(prompt.contains(NIGHTTIME_GUIDANCE), "hour {hour}");
            assert!(!prompt.contains(DAYTIME_GUIDANCE), "hour {hour}");
        }
    }

    #[test]
    fn prompt_is_deterministic() {
        let now = at(2024, 10, 3, 12, 0);
        assert_eq!(build_prompt(&report(), &user(), now), build_prompt(&report(), &user(), now));
    }
}
