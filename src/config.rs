//! App configuration flags
//!
//! Supplied by the host as key/value pairs (or a JSON object). Cached in
//! LocalStorage on the web build; read from the `NEUROCASUAL_CONFIG`
//! environment variable natively. The core only consults the insight flag.

use serde::{Deserialize, Serialize};

/// Errors from parsing host-supplied configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// Feature flags (ads flags are carried for the host; only the insight flag
/// affects the core)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    // === Ads ===
    pub global_ads_enabled: bool,
    pub banner_enabled: bool,
    pub interstitial_enabled: bool,
    pub rewarded_enabled: bool,
    pub aggressive_ads_enabled: bool,
    /// Minimum seconds between two ads
    pub min_gap_seconds: u32,
    pub max_ads_per_session: u32,

    // === Post-session ===
    /// Request a reflective insight when a session ends
    pub insight_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            global_ads_enabled: false,
            banner_enabled: false,
            interstitial_enabled: false,
            rewarded_enabled: false,
            aggressive_ads_enabled: false,
            min_gap_seconds: 60,
            max_ads_per_session: 3,
            insight_enabled: true,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

impl AppConfig {
    /// Parse a JSON object; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build from string key/value pairs; unknown keys are ignored
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            match key {
                "global_ads_enabled" => config.global_ads_enabled = parse_bool(key, value)?,
                "banner_enabled" => config.banner_enabled = parse_bool(key, value)?,
                "interstitial_enabled" => config.interstitial_enabled = parse_bool(key, value)?,
                "rewarded_enabled" => config.rewarded_enabled = parse_bool(key, value)?,
                "aggressive_ads_enabled" => config.aggressive_ads_enabled = parse_bool(key, value)?,
                "insight_enabled" => config.insight_enabled = parse_bool(key, value)?,
                "min_gap_seconds" => config.min_gap_seconds = parse_u32(key, value)?,
                "max_ads_per_session" => config.max_ads_per_session = parse_u32(key, value)?,
                _ => log::debug!("Ignoring unknown config key {}", key),
            }
        }
        Ok(config)
    }

    /// Whether the host should ask for a post-session insight
    pub fn should_request_insight(&self) -> bool {
        self.insight_enabled
    }

    /// Whether an interstitial may follow the session summary
    pub fn interstitial_after_session(&self) -> bool {
        self.global_ads_enabled && self.interstitial_enabled
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neurocasual_config";
    /// Environment variable holding a JSON config (native only)
    #[allow(dead_code)]
    const ENV_VAR: &'static str = "NEUROCASUAL_CONFIG";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Cache config in LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
            }
        }
    }

    /// Load config from the environment (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(json) = std::env::var(Self::ENV_VAR) else {
            log::info!("Using default config");
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded config from {}", Self::ENV_VAR);
                config
            }
            Err(e) => {
                log::warn!("Ignoring {}: {}", Self::ENV_VAR, e);
                Self::default()
            }
        }
    }
}
