//! Game settings and preferences
//!
//! Persisted separately from the high score in LocalStorage. UI-facing, not
//! gameplay-authoritative, but `sound_enabled` gates all audio side effects.

use serde::{Deserialize, Serialize};

/// Player preferences
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Settings {
    /// Gates every synthesized tone
    pub sound_enabled: bool,
    /// Whether the settings panel is open
    pub show_settings: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            show_settings: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "math_asteroids_settings";

    pub fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
        self.save();
    }

    pub fn toggle_panel(&mut self) {
        self.show_settings = !self.show_settings;
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
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
