//! Saved sets and their cookie mirror
//!
//! Features:
//! - Insertion-ordered, duplicate-free `SavedSets`
//! - JSON + percent-encoded cookie value with a rolling 30-day expiry
//! - Reads the older `{"number", "color"}` ball shape as well as plain numbers
//! - Fail-soft load (bad or missing data means no saved sets)

pub mod cookie;

pub use cookie::{CookieJar, MemoryCookies};

use chrono::Utc;
use serde::Deserialize;

use crate::error::{SaveRejection, StoreError};
use crate::sampler::NumberSet;
use crate::settings::CookieSettings;

/// User-curated sets, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedSets {
    sets: Vec<NumberSet>,
}

impl SavedSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an equal set (same numbers, any order) is already saved
    pub fn contains(&self, set: &NumberSet) -> bool {
        self.sets.contains(set)
    }

    /// Append a set unless it duplicates one already saved
    pub fn push(&mut self, set: NumberSet) -> Result<(), SaveRejection> {
        if self.contains(&set) {
            return Err(SaveRejection::Duplicate);
        }
        self.sets.push(set);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.sets.clear();
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NumberSet> {
        self.sets.iter()
    }

    pub fn as_slice(&self) -> &[NumberSet] {
        &self.sets
    }
}

impl TryFrom<Vec<NumberSet>> for SavedSets {
    type Error = SaveRejection;

    fn try_from(sets: Vec<NumberSet>) -> Result<Self, Self::Error> {
        let mut saved = Self::new();
        for set in sets {
            saved.push(set)?;
        }
        Ok(saved)
    }
}

/// One ball as found in storage
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredBall {
    Number(u8),
    /// Older payloads carried the display color alongside the number
    Ball { number: u8 },
}

impl StoredBall {
    fn number(&self) -> u8 {
        match *self {
            StoredBall::Number(n) | StoredBall::Ball { number: n } => n,
        }
    }
}

/// Parse a decoded cookie payload
fn decode_sets(json: &str) -> Result<SavedSets, StoreError> {
    let raw: Vec<Vec<StoredBall>> = serde_json::from_str(json).map_err(StoreError::Decode)?;

    let mut saved = SavedSets::new();
    for balls in raw {
        let numbers: Vec<u8> = balls.iter().map(StoredBall::number).collect();
        let set = NumberSet::new(&numbers)?;
        // Repeats in old payloads are dropped rather than failing the load
        if saved.push(set).is_err() {
            log::warn!("Skipping repeated stored set [{}]", set);
        }
    }
    Ok(saved)
}

/// Saved sets persisted in a single cookie
pub struct SetStore<J> {
    jar: J,
    settings: CookieSettings,
}

impl<J: CookieJar> SetStore<J> {
    pub fn new(jar: J, settings: CookieSettings) -> Self {
        Self { jar, settings }
    }

    pub fn jar(&self) -> &J {
        &self.jar
    }

    pub fn jar_mut(&mut self) -> &mut J {
        &mut self.jar
    }

    /// Load saved sets, reporting why the stored value was unusable
    pub fn try_load(&self) -> Result<SavedSets, StoreError> {
        let raw = self.jar.read()?;
        let Some(encoded) = cookie::find_cookie(&raw, &self.settings.name) else {
            return Ok(SavedSets::new());
        };
        if encoded.is_empty() {
            return Ok(SavedSets::new());
        }

        let json = cookie::decode_component(encoded)?;
        decode_sets(&json)
    }

    /// Load saved sets; malformed or absent data yields none
    pub fn load(&self) -> SavedSets {
        match self.try_load() {
            Ok(sets) => {
                log::info!("Loaded {} saved sets", sets.len());
                sets
            }
            Err(e) => {
                log::warn!("Ignoring stored sets: {}", e);
                SavedSets::new()
            }
        }
    }

    /// Write saved sets, resetting the expiry
    pub fn try_save(&mut self, sets: &SavedSets) -> Result<(), StoreError> {
        let json = serde_json::to_string(sets.as_slice()).map_err(StoreError::Encode)?;
        let cookie = format!(
            "{}={}; expires={}; path={}; SameSite={}",
            self.settings.name,
            cookie::encode_component(&json),
            cookie::expires_after(Utc::now(), self.settings.expiry_days),
            self.settings.path,
            self.settings.same_site,
        );
        self.jar.write(&cookie)
    }

    /// Best-effort save; failures are logged only
    pub fn save(&mut self, sets: &SavedSets) {
        match self.try_save(sets) {
            Ok(()) => log::info!("Saved sets persisted ({} sets)", sets.len()),
            Err(e) => log::error!("Failed to persist saved sets: {}", e),
        }
    }

    /// Expire the cookie immediately
    pub fn clear(&mut self) {
        let cookie = format!(
            "{}=; expires={}; path={}",
            self.settings.name,
            cookie::EPOCH_EXPIRES,
            self.settings.path,
        );
        match self.jar.write(&cookie) {
            Ok(()) => log::info!("Saved sets cleared"),
            Err(e) => log::error!("Failed to clear saved sets: {}", e),
        }
    }
}
