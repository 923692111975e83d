//! Game settings and preferences
//!
//! Persisted separately from stats in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::{
    BRIDGE_DEFAULT_ROWS, BRIDGE_MAX_ROWS, BRIDGE_MIN_ROWS, CANVAS_SIZE, QUIZ_SESSION_LENGTH,
    ROPE_PROBLEM_COUNT,
};
use crate::platform;
use crate::reaction::GAME_DURATION;
use crate::shooter::clamp_level;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Sessions ===
    /// Problems per arithmetic quiz
    pub quiz_length: usize,
    /// Rows on the glass bridge (4..=10)
    pub bridge_rows: usize,
    /// Problems drawn for a tug of war
    pub rope_problems: usize,
    /// Red light game clock (seconds)
    pub reaction_duration: u32,
    /// Level a new shooter game starts on (1..=50)
    pub shooter_start_level: u32,

    // === Tracing ===
    /// Side of the square tracing canvas
    pub canvas_size: f32,

    // === Feedback ===
    /// Vibrate on correct/wrong/success/fail
    pub haptics: bool,

    /// Fixed RNG seed for reproducible sessions
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quiz_length: QUIZ_SESSION_LENGTH,
            bridge_rows: BRIDGE_DEFAULT_ROWS,
            rope_problems: ROPE_PROBLEM_COUNT,
            reaction_duration: GAME_DURATION,
            shooter_start_level: 1,
            canvas_size: CANVAS_SIZE,
            haptics: true,
            seed: None,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "squid_math_settings";

    /// Bridge rows within the playable range
    pub fn effective_bridge_rows(&self) -> usize {
        self.bridge_rows.clamp(BRIDGE_MIN_ROWS, BRIDGE_MAX_ROWS)
    }

    /// Shooter start level within the playable range
    pub fn effective_shooter_level(&self) -> u32 {
        clamp_level(self.shooter_start_level)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Load settings from storage, falling back to defaults
    pub fn load() -> Self {
        if let Some(json) = platform::storage_get(Self::STORAGE_KEY) {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring stored settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to storage
    pub fn save(&self) {
        if let Ok(json) = self.to_json()
            && platform::storage_set(Self::STORAGE_KEY, &json)
        {
            log::info!("Settings saved");
        }
    }
}
