//! Game settings and tuning
//!
//! Persisted in LocalStorage as JSON. Missing fields take their defaults so
//! older saved settings keep loading after new knobs are added.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Gameplay ===
    /// Ball speed restored on every racket hit (m/s)
    pub ball_speed: f32,
    /// Racket movement speed (m/s)
    pub racket_speed: f32,

    // === Physics ===
    /// Fixed physics timestep (seconds)
    pub time_step: f32,
    /// Velocity solver iterations per step
    pub velocity_iterations: usize,
    /// Position solver iterations per step
    pub position_iterations: usize,

    // === Debug ===
    /// Publish contact separation readouts
    pub show_readouts: bool,
    /// Draw collider outlines over the sprites
    pub debug_draw: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ball_speed: BALL_SPEED,
            racket_speed: RACKET_SPEED,

            time_step: SIM_DT,
            velocity_iterations: VELOCITY_ITERATIONS,
            position_iterations: POSITION_ITERATIONS,

            show_readouts: true,
            debug_draw: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "brick_racket_settings";

    /// Upper bound for the physics timestep
    pub const MAX_TIME_STEP: f32 = 0.1;

    /// Parse settings JSON, then sanitize
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::sanitized)
    }

    /// Replace out-of-range values with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Settings::default();

        if !(self.ball_speed.is_finite() && self.ball_speed > 0.0) {
            log::warn!("Invalid ball_speed {}, using {}", self.ball_speed, defaults.ball_speed);
            self.ball_speed = defaults.ball_speed;
        }
        if !(self.racket_speed.is_finite() && self.racket_speed >= 0.0) {
            log::warn!(
                "Invalid racket_speed {}, using {}",
                self.racket_speed,
                defaults.racket_speed
            );
            self.racket_speed = defaults.racket_speed;
        }
        if !(self.time_step > 0.0 && self.time_step <= Self::MAX_TIME_STEP) {
            log::warn!("Invalid time_step {}, using {}", self.time_step, defaults.time_step);
            self.time_step = defaults.time_step;
        }
        if self.velocity_iterations == 0 {
            self.velocity_iterations = defaults.velocity_iterations;
        }
        if self.position_iterations == 0 {
            self.position_iterations = defaults.position_iterations;
        }

        self
    }

    /// Load settings from LocalStorage (WASM only)
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
                    Err(e) => log::warn!("Ignoring saved settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
