//! Gameplay settings
//!
//! Persisted as JSON in LocalStorage on the web build.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How many fixed physics steps a frame runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StepMode {
    /// Exactly one fixed step per frame; physics speed follows the display rate
    #[default]
    PerFrame,
    /// Accumulate real elapsed time and run as many fixed steps as fit
    Accumulated,
}

impl StepMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepMode::PerFrame => "PerFrame",
            StepMode::Accumulated => "Accumulated",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "perframe" | "per-frame" | "fixed" => Some(StepMode::PerFrame),
            "accumulated" | "realtime" => Some(StepMode::Accumulated),
            _ => None,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Cube edge length
    pub block_size: f32,
    /// Horizontal distance of one nudge
    pub move_step: f32,
    /// Spawn point
    pub spawn_x: f32,
    pub spawn_height: f32,
    /// Seconds before the first piece appears
    pub initial_spawn_delay: f32,
    /// Oldest committed pieces are evicted beyond this count (`None` = never)
    pub max_active_pieces: Option<usize>,
    /// Frame stepping policy
    pub step_mode: StepMode,
    /// Gravity vector
    pub gravity: [f32; 3],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            block_size: BLOCK_SIZE,
            move_step: BLOCK_SIZE,
            spawn_x: SPAWN_X,
            spawn_height: SPAWN_HEIGHT,
            initial_spawn_delay: 0.5,
            max_active_pieces: Some(DEFAULT_MAX_ACTIVE_PIECES),
            step_mode: StepMode::PerFrame,
            gravity: GRAVITY,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "tetris_tower_settings";

    /// Settings that spawn the first piece immediately
    pub fn immediate() -> Self {
        Self {
            initial_spawn_delay: 0.0,
            ..Self::default()
        }
    }

    /// Parse settings JSON, falling back to defaults on any error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring invalid settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
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
