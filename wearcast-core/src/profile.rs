//! User attributes and their persistence.
//!
//! [`Profile`] is loaded once when a session starts and written back through
//! its [`ProfileStore`] on every change.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

/// Activities offered by the settings form.
pub const ACTIVITIES: &[&str] = &[
    "Walking or Light Outdoor Activity",
    "Running or Outdoor Exercise",
    "Cycling",
    "Office Work or Indoor Activities",
    "Attending an Outdoor Event",
    "Shopping or Errands",
    "Hiking",
];

/// Genders offered by the settings form.
pub const GENDERS: &[&str] = &["female", "male", "non-binary", "prefer not to say"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    /// Hours spent outdoors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outdoors_time: Option<f64>,
}

impl UserAttributes {
    /// Names of the attributes a recommendation cannot do without.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.age.is_none() {
            missing.push("age");
        }
        if self.gender.as_deref().is_none_or(|g| g.trim().is_empty()) {
            missing.push("gender");
        }
        missing
    }
}

/// Partial update from the settings form. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub activity: Option<String>,
    pub outdoors_time: Option<f64>,
}

impl SettingsUpdate {
    pub fn apply(self, attrs: &mut UserAttributes) {
        if let Some(age) = self.age {
            attrs.age = Some(age);
        }
        if let Some(gender) = self.gender {
            attrs.gender = Some(gender);
        }
        if let Some(activity) = self.activity {
            attrs.activity = Some(activity);
        }
        if let Some(hours) = self.outdoors_time {
            attrs.outdoors_time = Some(hours);
        }
    }
}

pub trait ProfileStore: Send + Sync + Debug {
    fn load(&self) -> Result<UserAttributes>;
    fn save(&self, attrs: &UserAttributes) -> Result<()>;
}

impl<S: ProfileStore + ?Sized> ProfileStore for Arc<S> {
    fn load(&self) -> Result<UserAttributes> {
        (**self).load()
    }

    fn save(&self, attrs: &UserAttributes) -> Result<()> {
        (**self).save(attrs)
    }
}

/// Profile stored as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for JsonFileStore {
    fn load(&self) -> Result<UserAttributes> {
        if !self.path.exists() {
            return Ok(UserAttributes::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read profile: {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse profile: {}", self.path.display()))
    }

    fn save(&self, attrs: &UserAttributes) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create profile directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(attrs).context("Failed to serialize profile")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write profile: {}", self.path.display()))
    }
}

/// In-process store, mostly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<UserAttributes>,
}

impl MemoryStore {
    pub fn new(attrs: UserAttributes) -> Self {
        Self { inner: Mutex::new(attrs) }
    }

    /// Last saved attributes.
    pub fn snapshot(&self) -> UserAttributes {
        self.inner.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl ProfileStore for MemoryStore {
    fn load(&self) -> Result<UserAttributes> {
        Ok(self.snapshot())
    }

    fn save(&self, attrs: &UserAttributes) -> Result<()> {
        let mut guard =
            self.inner.lock().map_err(|_| anyhow::anyhow!("profile store lock poisoned"))?;
        *guard = attrs.clone();
        Ok(())
    }
}

/// Session-scoped user attributes backed by a store.
#[derive(Debug)]
pub struct Profile {
    attrs: UserAttributes,
    store: Box<dyn ProfileStore>,
}

impl Profile {
    /// Load attributes from `store`. A corrupt or unreadable profile starts empty.
    pub fn load(store: Box<dyn ProfileStore>) -> Self {
        let attrs = store.load().unwrap_or_else(|e| {
            tracing::warn!("Could not load user profile, starting empty: {:#}", e);
            UserAttributes::default()
        });

        Self { attrs, store }
    }

    pub fn attributes(&self) -> &UserAttributes {
        &self.attrs
    }

    /// Apply `f` and persist the result when anything changed.
    pub fn update(&mut self, f: impl FnOnce(&mut UserAttributes)) {
        let before = self.attrs.clone();
        f(&mut self.attrs);

        if self.attrs == before {
            return;
        }

        if let Err(e) = self.store.save(&self.attrs) {
            tracing::warn!("Failed to save user profile: {:#}", e);
        }
    }
}
