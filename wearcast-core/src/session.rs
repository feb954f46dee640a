//! Interactive session: the state behind whatever front end drives wearcast.
//!
//! Every operation catches its own failure, turns it into a banner message
//! and also hands the typed error back to the caller. Nothing is retried.

use crate::{
    advisor::{self, TextGenerator},
    clock::Clock,
    error::{Error, Result},
    location::{Geolocator, LocationQuery, parse_coordinates},
    model::WeatherReport,
    profile::{Profile, SettingsUpdate, UserAttributes},
    provider::WeatherProvider,
    render::{RenderedRecommendation, render},
    view::WeatherView,
};

/// Shown when weather is available but no recommendation is.
pub const FALLBACK_TITLE: &str = "AI Recommendation Unavailable";
pub const FALLBACK_MESSAGE: &str = "We're unable to generate a clothing recommendation at the moment. \
Please use the weather information to make your own decision.";

/// Shown after geolocation fails, next to the manual entry prompt.
pub const GEOLOCATION_TITLE: &str = "Geolocation Access Unavailable";
pub const GEOLOCATION_MESSAGE: &str = "Your position could not be determined. \
Set a home position in the config file, or enter coordinates or a city manually.";

/// External collaborators of a session.
#[derive(Debug)]
pub struct Services {
    pub weather: Box<dyn WeatherProvider>,
    pub generator: Box<dyn TextGenerator>,
    pub geolocator: Box<dyn Geolocator>,
    pub clock: Box<dyn Clock>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub loading: bool,
    pub banner: Option<String>,
    pub weather: Option<WeatherReport>,
    pub recommendation: Option<String>,
    /// The settings form should be opened.
    pub settings_prompt: bool,
    /// A location has to be entered.
    pub location_prompt: bool,
    /// Geolocation failed; manual entry is needed.
    pub geolocation_notice: bool,
}

#[derive(Debug)]
pub struct Session {
    services: Services,
    profile: Profile,
    state: ViewState,
}

impl Session {
    pub fn new(services: Services, profile: Profile) -> Self {
        let state = ViewState {
            location_prompt: profile.attributes().location.is_none(),
            ..ViewState::default()
        };

        Self { services, profile, state }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn user(&self) -> &UserAttributes {
        self.profile.attributes()
    }

    /// Fetch weather for the stored location, if there is one.
    pub async fn start(&mut self) -> Result<()> {
        let Some(stored) = self.user().location.clone() else {
            self.state.location_prompt = true;
            return Ok(());
        };

        tracing::info!("Restoring saved location '{}'", stored);
        match LocationQuery::detect(&stored) {
            LocationQuery::Coordinates(_) => self.submit_coordinates(&stored).await,
            LocationQuery::City(city) => self.submit_city(&city).await,
        }
    }

    /// Fetch weather for a raw `"lat,lon"` string.
    pub async fn submit_coordinates(&mut self, input: &str) -> Result<()> {
        self.begin();

        let outcome = match parse_coordinates(input) {
            Ok(coords) => self.services.weather.fetch(coords, self.services.clock.now()).await,
            Err(e) => Err(e),
        };

        let location = input.trim().to_string();
        self.finish_weather(outcome, |_| location)
    }

    /// Fetch weather for a city name.
    pub async fn submit_city(&mut self, city: &str) -> Result<()> {
        self.begin();

        let outcome = match self.services.weather.lookup_city(city).await {
            Ok(coords) => self.services.weather.fetch(coords, self.services.clock.now()).await,
            Err(e) => Err(e),
        };

        self.finish_weather(outcome, |report| report.location.to_string())
    }

    /// Ask the geolocator for a position. Unavailability is not an error.
    pub async fn use_geolocation(&mut self) -> Result<()> {
        match self.services.geolocator.current_position().await {
            Ok(coords) => {
                self.state.geolocation_notice = false;
                self.submit_coordinates(&coords.to_string()).await
            }
            Err(e) => {
                tracing::info!("Falling back to manual location entry: {}", e);
                self.state.geolocation_notice = true;
                self.state.location_prompt = true;
                self.state.banner = Some(e.user_message());
                Ok(())
            }
        }
    }

    /// Request a recommendation for the current weather.
    pub async fn request_recommendation(
        &mut self,
        activity: Option<String>,
        outdoors_time: Option<f64>,
    ) -> Result<()> {
        let missing = self.user().missing_required();
        if !missing.is_empty() {
            self.state.settings_prompt = true;
            return Err(self.fail(Error::MissingUserAttributes(missing)));
        }

        let Some(report) = self.state.weather.clone() else {
            return Err(self.fail(Error::NoWeatherData));
        };

        self.begin();
        self.state.recommendation = None;

        self.profile.update(|attrs| {
            SettingsUpdate { activity, outdoors_time, ..SettingsUpdate::default() }.apply(attrs)
        });

        let now = self.services.clock.now().naive_local();
        let outcome =
            advisor::recommend(self.services.generator.as_ref(), &report, self.profile.attributes(), now)
                .await;

        match outcome {
            Ok(text) => {
                self.state.loading = false;
                self.state.recommendation = Some(text);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Merge settings into the profile and close the settings prompt.
    pub fn update_settings(&mut self, update: SettingsUpdate) {
        self.profile.update(|attrs| update.apply(attrs));
        self.state.settings_prompt = false;
    }

    /// Title and message to show in place of a missing recommendation.
    pub fn fallback_notice(&self) -> Option<(&'static str, &'static str)> {
        let show = self.state.weather.is_some()
            && self.state.recommendation.is_none()
            && !self.state.loading;

        show.then_some((FALLBACK_TITLE, FALLBACK_MESSAGE))
    }

    /// Title and message explaining that the location must be entered by hand.
    pub fn geolocation_notice(&self) -> Option<(&'static str, &'static str)> {
        self.state
            .geolocation_notice
            .then_some((GEOLOCATION_TITLE, GEOLOCATION_MESSAGE))
    }

    pub fn weather_view(&self) -> Option<WeatherView> {
        let today = self.services.clock.now().date_naive();
        self.state.weather.as_ref().map(|report| WeatherView::new(report, &today))
    }

    pub fn rendered_recommendation(&self) -> Option<RenderedRecommendation> {
        let now = self.services.clock.now().naive_local();
        self.state.recommendation.as_deref().map(|text| render(text, &now))
    }

    fn begin(&mut self) {
        self.state.loading = true;
        self.state.banner = None;
    }

    fn fail(&mut self, err: Error) -> Error {
        tracing::warn!("{}", err);
        self.state.loading = false;
        self.state.banner = Some(err.user_message());
        err
    }

    fn finish_weather(
        &mut self,
        outcome: Result<WeatherReport>,
        location: impl FnOnce(&WeatherReport) -> String,
    ) -> Result<()> {
        let result = match outcome {
            Ok(report) => {
                let location = location(&report);
                self.profile.update(|attrs| attrs.location = Some(location));
                self.state.loading = false;
                self.state.recommendation = None;
                self.state.weather = Some(report);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        };

        self.state.location_prompt = self.user().location.is_none();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::FixedClock,
        location::{FixedGeolocator, Unavailable},
        model::{Coordinates, CurrentConditions, Place},
        profile::MemoryStore,
    };
    use async_trait::async_trait;
    use chrono::{DateTime, FixedOffset};
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Debug, Default)]
    struct StubWeather {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl WeatherProvider for StubWeather {
        async fn lookup_city(&self, city: &str) -> Result<Coordinates> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if city == "Atlantis" {
                Err(Error::CityNotFound(city.into()))
            } else {
                Ok(Coordinates::new(1.0, 2.0))
            }
        }

        async fn fetch(&self, _coords: Coordinates, _now: DateTime<FixedOffset>) -> Result<WeatherReport> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::NetworkUnavailable("stub".into()));
            }
            Ok(WeatherReport {
                current: CurrentConditions { temperature: Some(20.0), ..Default::default() },
                daily_forecast: Vec::new(),
                location: Place { city: "Lisbon".into(), country: "PT".into() },
            })
        }
    }

    #[derive(Debug)]
    struct StubGenerator {
        calls: Arc<AtomicUsize>,
        reply: Result<String>,
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(Error::EmptyResponse),
            }
        }
    }

    fn clock() -> FixedClock {
        FixedClock(DateTime::parse_from_rfc3339("2024-06-10T14:00:00+01:00").expect("timestamp"))
    }

    fn session_with(
        weather: StubWeather,
        reply: Result<String>,
        geolocator: Box<dyn Geolocator>,
        attrs: UserAttributes,
    ) -> (Session, Arc<AtomicUsize>, Arc<MemoryStore>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let store = Arc::new(MemoryStore::new(attrs));
        let services = Services {
            weather: Box::new(weather),
            generator: Box::new(StubGenerator { calls: calls.clone(), reply }),
            geolocator,
            clock: Box::new(clock()),
        };
        let session = Session::new(services, Profile::load(Box::new(store.clone())));
        (session, calls, store)
    }

    fn complete_user() -> UserAttributes {
        UserAttributes { age: Some(30), gender: Some("female".into()), ..Default::default() }
    }

    #[tokio::test]
    async fn invalid_coordinates_set_banner_without_fetching() {
        let (mut session, _, _) = session_with(
            StubWeather::default(),
            Ok("x".into()),
            Box::new(Unavailable),
            UserAttributes::default(),
        );

        let err = session.submit_coordinates("north, west").await.unwrap_err();

        assert!(matches!(err, Error::InvalidCoordinates(_)));
        assert!(session.state().banner.as_deref().is_some_and(|b| b.contains("Invalid coordinates")));
        assert!(!session.state().loading);
        assert!(session.state().weather.is_none());
        assert!(session.state().location_prompt);
    }

    #[tokio::test]
    async fn coordinates_success_stores_location() {
        let (mut session, _, store) = session_with(
            StubWeather::default(),
            Ok("x".into()),
            Box::new(Unavailable),
            UserAttributes::default(),
        );

        session.submit_coordinates(" 38.72, -9.14 ").await.expect("fetch");

        assert!(session.state().weather.is_some());
        assert!(session.state().banner.is_none());
        assert!(!session.state().location_prompt);
        assert_eq!(store.snapshot().location.as_deref(), Some("38.72, -9.14"));
    }

    #[tokio::test]
    async fn city_success_stores_resolved_place() {
        let (mut session, _, store) = session_with(
            StubWeather::default(),
            Ok("x".into()),
            Box::new(Unavailable),
            UserAttributes::default(),
        );

        session.submit_city("lisbon").await.expect("fetch");
        assert_eq!(store.snapshot().location.as_deref(), Some("Lisbon, PT"));

        let err = session.submit_city("Atlantis").await.unwrap_err();
        assert!(matches!(err, Error::CityNotFound(_)));
        // The previous report stays visible.
        assert!(session.state().weather.is_some());
        assert_eq!(store.snapshot().location.as_deref(), Some("Lisbon, PT"));
    }

    #[tokio::test]
    async fn start_restores_saved_location() {
        let attrs = UserAttributes { location: Some("Lisbon, PT".into()), ..Default::default() };
        let (mut session, _, _) =
            session_with(StubWeather::default(), Ok("x".into()), Box::new(Unavailable), attrs);

        assert!(!session.state().location_prompt);
        session.start().await.expect("start");
        assert!(session.state().weather.is_some());
    }

    #[tokio::test]
    async fn start_without_location_prompts_for_one() {
        let weather = StubWeather::default();
        let (mut session, _, _) =
            session_with(weather, Ok("x".into()), Box::new(Unavailable), UserAttributes::default());

        session.start().await.expect("start");
        assert!(session.state().location_prompt);
        assert!(session.state().weather.is_none());
    }

    #[tokio::test]
    async fn geolocation_unavailable_is_non_fatal() {
        let (mut session, _, _) = session_with(
            StubWeather::default(),
            Ok("x".into()),
            Box::new(Unavailable),
            UserAttributes::default(),
        );

        session.use_geolocation().await.expect("non-fatal");

        assert!(session.state().geolocation_notice);
        assert_eq!(session.geolocation_notice(), Some((GEOLOCATION_TITLE, GEOLOCATION_MESSAGE)));
        assert!(session.state().location_prompt);
        assert!(session.state().banner.as_deref().is_some_and(|b| b.contains("manually")));
    }

    #[tokio::test]
    async fn geolocation_success_submits_rounded_coordinates() {
        let geo = FixedGeolocator(Coordinates::new(38.722_252, -9.139_337));
        let (mut session, _, store) = session_with(
            StubWeather::default(),
            Ok("x".into()),
            Box::new(geo),
            UserAttributes::default(),
        );

        session.use_geolocation().await.expect("geolocate");

        assert!(!session.state().geolocation_notice);
        assert_eq!(session.geolocation_notice(), None);
        assert_eq!(store.snapshot().location.as_deref(), Some("38.7223, -9.1393"));
    }

    #[tokio::test]
    async fn missing_age_raises_settings_prompt_without_generating() {
        let attrs = UserAttributes { gender: Some("male".into()), ..Default::default() };
        let (mut session, calls, _) =
            session_with(StubWeather::default(), Ok("x".into()), Box::new(Unavailable), attrs);
        session.submit_city("Lisbon").await.expect("fetch");

        let err = session.request_recommendation(Some("Cycling".into()), Some(1.0)).await.unwrap_err();

        assert!(matches!(err, Error::MissingUserAttributes(_)));
        assert!(session.state().settings_prompt);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(session.fallback_notice().is_some());

        session.update_settings(SettingsUpdate { age: Some(41), ..Default::default() });
        assert!(!session.state().settings_prompt);
        session.request_recommendation(None, None).await.expect("recommend");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recommendation_without_weather_is_rejected() {
        let (mut session, calls, _) = session_with(
            StubWeather::default(),
            Ok("x".into()),
            Box::new(Unavailable),
            complete_user(),
        );

        let err = session.request_recommendation(None, None).await.unwrap_err();
        assert!(matches!(err, Error::NoWeatherData));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_recommendation_is_rendered_and_saves_activity() {
        let reply = "**Weather Summary:**\nWarm and dry.\n\n**Tips:**\n- Drink water";
        let (mut session, _, store) = session_with(
            StubWeather::default(),
            Ok(reply.into()),
            Box::new(Unavailable),
            complete_user(),
        );
        session.submit_city("Lisbon").await.expect("fetch");

        session
            .request_recommendation(Some("Hiking".into()), Some(4.0))
            .await
            .expect("recommend");

        assert_eq!(session.state().recommendation.as_deref(), Some(reply));
        assert!(session.fallback_notice().is_none());
        let saved = store.snapshot();
        assert_eq!(saved.activity.as_deref(), Some("Hiking"));
        assert_eq!(saved.outdoors_time, Some(4.0));

        let rendered = session.rendered_recommendation().expect("rendered");
        assert_eq!(rendered.sections.len(), 2);
        assert_eq!(rendered.tips.title(), "Adaptation Tips for Summer Day");
    }

    #[tokio::test]
    async fn failed_recommendation_falls_back_to_weather() {
        let (mut session, _, _) = session_with(
            StubWeather::default(),
            Err(Error::EmptyResponse),
            Box::new(Unavailable),
            complete_user(),
        );
        session.submit_city("Lisbon").await.expect("fetch");

        let err = session.request_recommendation(None, None).await.unwrap_err();

        assert!(matches!(err, Error::EmptyResponse));
        assert!(!session.state().loading);
        assert!(session.state().banner.is_some());
        assert_eq!(session.fallback_notice(), Some((FALLBACK_TITLE, FALLBACK_MESSAGE)));
        assert_eq!(session.weather_view().expect("view").temperature, "20.0°C");
    }

    #[tokio::test]
    async fn failed_fetch_keeps_no_partial_state() {
        let weather = StubWeather { fail: true, ..Default::default() };
        let (mut session, _, store) =
            session_with(weather, Ok("x".into()), Box::new(Unavailable), UserAttributes::default());

        let err = session.submit_coordinates("1, 2").await.unwrap_err();

        assert!(matches!(err, Error::NetworkUnavailable(_)));
        assert!(session.state().weather.is_none());
        assert!(store.snapshot().location.is_none());
        assert!(session.fallback_notice().is_none());
    }
}
