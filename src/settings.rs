//! Widget settings
//!
//! Every field has a default; a JSON override may name any subset.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Spin and toast timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Preview reshuffle period while spinning (ms)
    pub preview_tick_ms: u32,
    /// Time from pressing generate to the real draw (ms)
    pub spin_ms: u32,
    /// How long a toast stays up (ms)
    pub toast_ms: u32,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            preview_tick_ms: PREVIEW_TICK_MS,
            spin_ms: SPIN_DURATION_MS,
            toast_ms: TOAST_DURATION_MS,
        }
    }
}

/// Where and how saved sets are kept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieSettings {
    pub name: String,
    pub expiry_days: u32,
    pub path: String,
    pub same_site: String,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: COOKIE_NAME.to_string(),
            expiry_days: COOKIE_EXPIRY_DAYS,
            path: "/".to_string(),
            same_site: "Lax".to_string(),
        }
    }
}

/// Downloaded ticket naming: `<prefix>_<YYYYMMDD>_<count><suffix>.png`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    pub file_prefix: String,
    pub file_suffix: String,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            file_prefix: "로또".to_string(),
            file_suffix: "게임".to_string(),
        }
    }
}

/// All widget settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub timing: TimingSettings,
    pub cookie: CookieSettings,
    pub download: DownloadSettings,
}

impl Settings {
    /// Parse a (possibly partial) JSON override over the defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// LocalStorage key for overrides
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "lucky_lotto_settings";

    /// Load overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native builds read overrides from a file, see `main`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.timing.preview_tick_ms, 100);
        assert_eq!(s.timing.spin_ms, 2000);
        assert_eq!(s.timing.toast_ms, 3000);
        assert_eq!(s.cookie.name, "lottoSets");
        assert_eq!(s.cookie.expiry_days, 30);
    }

    #[test]
    fn test_partial_override() {
        let s = Settings::from_json(r#"{"timing": {"spin_ms": 500}, "cookie": {"name": "x"}}"#)
            .unwrap();
        assert_eq!(s.timing.spin_ms, 500);
        assert_eq!(s.timing.toast_ms, 3000);
        assert_eq!(s.cookie.name, "x");
        assert_eq!(s.cookie.path, "/");
        assert_eq!(s.download, DownloadSettings::default());
    }

    #[test]
    fn test_bad_override_errors() {
        assert!(Settings::from_json(r#"{"timing": {"spin_ms": "slow"}}"#).is_err());
    }
}
