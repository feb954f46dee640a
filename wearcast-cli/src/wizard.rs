//! Interactive prompts.

use inquire::{CustomType, Password, PasswordDisplayMode, Select, Text};
use wearcast_core::{
    ProviderId, SettingsUpdate, UserAttributes,
    profile::{ACTIVITIES, GENDERS},
};

pub fn api_key(id: ProviderId) -> anyhow::Result<String> {
    let key = Password::new(&format!("API key for {id}:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message(&format!("Leave the variable {} unset to use this key", id.env_var()))
        .prompt()?;

    let key = key.trim().to_string();
    anyhow::ensure!(!key.is_empty(), "API key must not be empty");
    Ok(key)
}

pub fn location_input() -> anyhow::Result<String> {
    let input = Text::new("Location:")
        .with_placeholder("40.7128, -74.0060 or London")
        .with_help_message("Coordinates as \"lat, lon\", or a city name")
        .prompt()?;

    Ok(input.trim().to_string())
}

fn starting_cursor(options: &[&str], current: Option<&str>) -> usize {
    current
        .and_then(|c| options.iter().position(|o| o.eq_ignore_ascii_case(c)))
        .unwrap_or(0)
}

/// Activity and hours outdoors, defaulting to the stored values.
pub fn activity_form(current: &UserAttributes) -> anyhow::Result<(String, f64)> {
    let activity = Select::new("Activity:", ACTIVITIES.to_vec())
        .with_starting_cursor(starting_cursor(ACTIVITIES, current.activity.as_deref()))
        .prompt()?;

    let mut hours = CustomType::<f64>::new("Time outdoors (hours):")
        .with_error_message("Please enter a number of hours");
    if let Some(h) = current.outdoors_time {
        hours = hours.with_default(h);
    }

    Ok((activity.to_string(), hours.prompt()?))
}

pub fn settings_form(current: &UserAttributes) -> anyhow::Result<SettingsUpdate> {
    let mut age = CustomType::<u32>::new("Age:").with_error_message("Please enter a whole number");
    if let Some(a) = current.age {
        age = age.with_default(a);
    }
    let age = age.prompt()?;

    let gender = Select::new("Gender:", GENDERS.to_vec())
        .with_starting_cursor(starting_cursor(GENDERS, current.gender.as_deref()))
        .prompt()?;

    let (activity, hours) = activity_form(current)?;

    Ok(SettingsUpdate {
        age: Some(age),
        gender: Some(gender.to_string()),
        activity: Some(activity),
        outdoors_time: Some(hours),
    })
}
