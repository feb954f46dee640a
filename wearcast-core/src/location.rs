//! Turning user input into coordinates.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::{Error, Result},
    model::Coordinates,
};

/// Parse a raw `"lat,lon"` string.
///
/// Both halves must be finite numbers. No range check is applied.
pub fn parse_coordinates(input: &str) -> Result<Coordinates> {
    let invalid = || Error::InvalidCoordinates(input.to_string());

    let mut parts = input.split(',');
    let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };

    let parse = |s: &str| s.trim().parse::<f64>().ok().filter(|v| v.is_finite());

    match (parse(lat), parse(lon)) {
        (Some(latitude), Some(longitude)) => Ok(Coordinates { latitude, longitude }),
        _ => Err(invalid()),
    }
}

/// How a location string should be resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coordinates(Coordinates),
    City(String),
}

impl LocationQuery {
    /// Anything that parses as coordinates is treated as such; the rest is a city name.
    pub fn detect(input: &str) -> Self {
        match parse_coordinates(input) {
            Ok(coords) => LocationQuery::Coordinates(coords),
            Err(_) => LocationQuery::City(input.trim().to_string()),
        }
    }
}

/// Platform location capability.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    /// One-shot position request. Fails only with [`Error::GeolocationUnavailable`].
    async fn current_position(&self) -> Result<Coordinates>;
}

/// No location capability on this platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

#[async_trait]
impl Geolocator for Unavailable {
    async fn current_position(&self) -> Result<Coordinates> {
        Err(Error::GeolocationUnavailable(
            "geolocation is not supported on this platform".into(),
        ))
    }
}

/// Reports a configured position, e.g. the `[home]` table of the config file.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator(pub Coordinates);

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinates> {
        Ok(self.0)
    }
}

/// Geolocator for an optional configured home position.
pub fn geolocator_for(home: Option<Coordinates>) -> Box<dyn Geolocator> {
    match home {
        Some(coords) => Box::new(FixedGeolocator(coords)),
        None => Box::new(Unavailable),
    }
}
