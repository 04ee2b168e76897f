//! Player preferences
//!
//! Persisted separately from the leaderboard in its own storage slot.

use serde::{Deserialize, Serialize};

use crate::consts::SETTINGS_KEY;
use crate::persistence::KeyValueStore;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Background music on/off
    pub music_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (no red flash on FRED hits)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.3,
            mute_on_blur: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Flip the background music flag, returning the new value
    pub fn toggle_music(&mut self) -> bool {
        self.music_enabled = !self.music_enabled;
        self.music_enabled
    }

    /// Effective red pulse on FRED hits (respects reduced_motion)
    pub fn effective_red_pulse(&self) -> bool {
        !self.reduced_motion
    }

    /// Keep volumes in range after loading
    fn clamp_volumes(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self
    }

    /// Load settings from a store, defaulting on absence or corruption
    pub fn load(store: &dyn KeyValueStore) -> Self {
        if let Some(json) = store.get_item(SETTINGS_KEY) {
            match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings.clamp_volumes();
                }
                Err(e) => log::warn!("Settings unreadable ({}), using defaults", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to a store
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        if let Ok(json) = serde_json::to_string(self) {
            if store.set_item(SETTINGS_KEY, &json) {
                log::info!("Settings saved");
            }
        }
    }
}
