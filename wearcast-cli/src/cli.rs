use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::{io::IsTerminal, process::ExitCode};
use wearcast_core::{
    Config, JsonFileStore, LocationQuery, Profile, ProfileStore, ProviderId, Services, Session,
    SettingsUpdate, SystemClock, generator_from_config, geolocator_for,
    weather_provider_from_config,
};

use crate::{output, wizard};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wearcast", version, about = "Weather-based clothing recommendations")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Where to get the weather for. Without any flag the saved location is used.
#[derive(Debug, Args)]
pub struct LocationArgs {
    /// Raw coordinates, e.g. "40.7128,-74.0060".
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true, conflicts_with_all = ["city", "here"])]
    coords: Option<String>,

    /// City name, optionally with a country code, e.g. "London,GB".
    #[arg(long, conflicts_with = "here")]
    city: Option<String>,

    /// Use the configured home position.
    #[arg(long)]
    here: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an API key for "openweather" or "gemini".
    Configure {
        provider: String,
    },

    /// Edit age, gender, activity and time outdoors. Prompts when no flag is given.
    Settings {
        #[arg(long)]
        age: Option<u32>,

        #[arg(long)]
        gender: Option<String>,

        #[arg(long)]
        activity: Option<String>,

        /// Hours spent outdoors.
        #[arg(long)]
        hours: Option<f64>,
    },

    /// Show current weather and today's forecast.
    Weather {
        #[command(flatten)]
        location: LocationArgs,
    },

    /// Show weather and a clothing recommendation.
    Recommend {
        #[command(flatten)]
        location: LocationArgs,

        #[arg(long)]
        activity: Option<String>,

        /// Hours spent outdoors.
        #[arg(long)]
        hours: Option<f64>,

        /// Never prompt; fail instead.
        #[arg(long)]
        no_input: bool,
    },

    /// Show stored user attributes and file locations.
    Profile,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Settings { age, gender, activity, hours } => {
                let update = SettingsUpdate { age, gender, activity, outdoors_time: hours };
                settings(update)
            }
            Command::Weather { location } => {
                let mut session = build_session()?;
                let interactive = std::io::stdin().is_terminal();
                if !ensure_weather(&mut session, &location, interactive).await? {
                    return Ok(ExitCode::FAILURE);
                }

                if let Some(view) = session.weather_view() {
                    output::print_weather(&view);
                }
                Ok(ExitCode::SUCCESS)
            }
            Command::Recommend { location, activity, hours, no_input } => {
                let mut session = build_session()?;
                let interactive = !no_input && std::io::stdin().is_terminal();
                recommend(&mut session, &location, activity, hours, interactive).await
            }
            Command::Profile => show_profile(),
        }
    }
}

fn build_session() -> anyhow::Result<Session> {
    let config = Config::load()?;

    let services = Services {
        weather: weather_provider_from_config(&config)?,
        generator: generator_from_config(&config),
        geolocator: geolocator_for(config.home),
        clock: Box::new(SystemClock),
    };

    let profile_path = Config::profile_file_path()?;
    tracing::debug!("Using profile at {}", profile_path.display());

    let store = JsonFileStore::new(profile_path);
    Ok(Session::new(services, Profile::load(Box::new(store))))
}

fn configure(provider: &str) -> anyhow::Result<ExitCode> {
    let id = ProviderId::try_from(provider)?;
    let api_key = wizard::api_key(id)?;

    let mut config = Config::load()?;
    config.upsert_provider_api_key(id, api_key);
    config.save()?;

    println!("Saved API key for {id} to {}", Config::config_file_path()?.display());
    Ok(ExitCode::SUCCESS)
}

fn settings(update: SettingsUpdate) -> anyhow::Result<ExitCode> {
    let store = JsonFileStore::new(Config::profile_file_path()?);
    let mut profile = Profile::load(Box::new(store));

    let no_flags = update.age.is_none()
        && update.gender.is_none()
        && update.activity.is_none()
        && update.outdoors_time.is_none();

    let update = if no_flags { wizard::settings_form(profile.attributes())? } else { update };
    profile.update(|attrs| update.apply(attrs));

    output::print_profile(profile.attributes());
    Ok(ExitCode::SUCCESS)
}

fn show_profile() -> anyhow::Result<ExitCode> {
    let profile_path = Config::profile_file_path()?;
    let attrs = JsonFileStore::new(&profile_path)
        .load()
        .with_context(|| format!("Failed to load profile from {}", profile_path.display()))?;

    output::print_profile(&attrs);
    println!();
    println!("Config file:  {}", Config::config_file_path()?.display());
    println!("Profile file: {}", profile_path.display());
    Ok(ExitCode::SUCCESS)
}

async fn locate(session: &mut Session, location: &LocationArgs) -> wearcast_core::Result<()> {
    if let Some(coords) = &location.coords {
        session.submit_coordinates(coords).await
    } else if let Some(city) = &location.city {
        session.submit_city(city).await
    } else if location.here {
        session.use_geolocation().await
    } else {
        session.start().await
    }
}

/// Fetch weather, falling back to manual entry when allowed. Returns whether weather is available.
async fn ensure_weather(
    session: &mut Session,
    location: &LocationArgs,
    interactive: bool,
) -> anyhow::Result<bool> {
    // Failures are reported through the session banner.
    let _ = locate(session, location).await;

    if let Some((title, message)) = session.geolocation_notice() {
        output::print_notice(title, message);
    }

    if session.state().weather.is_none() && session.state().location_prompt && interactive {
        if let Some(banner) = &session.state().banner {
            output::print_banner(banner);
        }

        let input = wizard::location_input()?;
        let _ = match LocationQuery::detect(&input) {
            LocationQuery::Coordinates(_) => session.submit_coordinates(&input).await,
            LocationQuery::City(city) => session.submit_city(&city).await,
        };
    }

    if session.state().weather.is_some() {
        return Ok(true);
    }

    match &session.state().banner {
        Some(banner) => output::print_banner(banner),
        None => output::print_banner(
            "No location saved. Pass --coords, --city or --here, or run interactively.",
        ),
    }
    Ok(false)
}

async fn recommend(
    session: &mut Session,
    location: &LocationArgs,
    activity: Option<String>,
    hours: Option<f64>,
    interactive: bool,
) -> anyhow::Result<ExitCode> {
    if !ensure_weather(session, location, interactive).await? {
        return Ok(ExitCode::FAILURE);
    }

    if let Some(view) = session.weather_view() {
        output::print_weather(&view);
    }

    let (activity, hours) = if interactive && (activity.is_none() || hours.is_none()) {
        let (a, h) = wizard::activity_form(session.user())?;
        (activity.or(Some(a)), hours.or(Some(h)))
    } else {
        (activity, hours)
    };

    let mut outcome = session.request_recommendation(activity.clone(), hours).await;

    if outcome.is_err() && session.state().settings_prompt && interactive {
        if let Some(banner) = &session.state().banner {
            output::print_banner(banner);
        }
        let update = wizard::settings_form(session.user())?;
        session.update_settings(update);
        outcome = session.request_recommendation(activity, hours).await;
    }

    if let Some(rendered) = session.rendered_recommendation() {
        output::print_recommendation(&rendered);
    } else {
        if let Some(banner) = &session.state().banner {
            output::print_banner(banner);
        }
        if let Some((title, message)) = session.fallback_notice() {
            output::print_notice(title, message);
        }
    }

    Ok(if outcome.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
