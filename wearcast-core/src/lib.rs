//! Core library for the `wearcast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Location resolution and the OpenWeather client with payload normalization
//! - Prompt construction and the Gemini text generation client
//! - Parsing of generated recommendations into display sections
//! - A [`Session`] that ties these together and owns the user profile
//!
//! It is used by `wearcast-cli`, but can also be reused by other front ends.

pub mod advisor;
pub mod clock;
pub mod config;
pub mod error;
pub mod location;
pub mod model;
mod normalize;
pub mod profile;
pub mod prompt;
pub mod provider;
pub mod render;
pub mod season;
pub mod session;
pub mod view;

pub use advisor::{TextGenerator, generator_from_config};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, ProviderConfig, ProviderId};
pub use error::{Error, Result};
pub use location::{Geolocator, LocationQuery, geolocator_for, parse_coordinates};
pub use model::{Coordinates, CurrentConditions, ForecastSlice, Place, WeatherReport};
pub use profile::{JsonFileStore, MemoryStore, Profile, ProfileStore, SettingsUpdate, UserAttributes};
pub use provider::{WeatherProvider, weather_provider_from_config};
pub use render::{RenderedRecommendation, Section, SectionBody, SectionKind, render};
pub use season::{DayPhase, Season};
pub use session::{Services, Session, ViewState};
pub use view::{ForecastRow, WeatherView};
