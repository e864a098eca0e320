//! Game settings and preferences
//!
//! Persisted as one JSON blob next to the best score.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_PARTICLES;
use crate::persistence::{KeyValueStore, StorageError};
use crate::sim::CharacterKind;

/// How rendered frames map to simulation ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TickMode {
    /// 60 Hz fixed timestep, independent of refresh rate
    #[default]
    Fixed,
    /// One tick per rendered frame; game speed follows the display
    PerFrame,
}

impl TickMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TickMode::Fixed => "Fixed",
            TickMode::PerFrame => "PerFrame",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fixed" => Some(TickMode::Fixed),
            "perframe" | "per-frame" | "frame" => Some(TickMode::PerFrame),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Cosmetic player variant
    pub character: CharacterKind,
    pub tick_mode: TickMode,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,

    // === Visual Effects ===
    /// Particle effects (bursts and character trails)
    pub particles: bool,
    pub max_particles: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            character: CharacterKind::Classic,
            tick_mode: TickMode::Fixed,
            master_volume: 0.8,
            muted: false,
            particles: true,
            max_particles: MAX_PARTICLES,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "neo_flappy_settings";

    /// Effective particle count cap
    pub fn effective_max_particles(&self) -> usize {
        if self.particles { self.max_particles } else { 0 }
    }

    /// Volume after mute is applied
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0)
        }
    }

    /// Load settings, falling back to defaults when missing or corrupt
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring corrupt settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Failed to read settings: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        let result = serde_json::to_string(self)
            .map_err(StorageError::from)
            .and_then(|json| store.set(Self::STORAGE_KEY, &json));
        match result {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}
