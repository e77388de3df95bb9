//! Best-score persistence
//!
//! A single integer in LocalStorage, read at startup and written only when a
//! finished run beats it. Storage failures are swallowed; a missing or
//! malformed value falls back to 0.

/// The session's best score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore(pub u32);

impl HighScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "math_asteroids_highscore";

    /// Record a finished run. Persists and returns true only on a new best.
    pub fn record(&mut self, score: u32) -> bool {
        if score > self.0 {
            self.0 = score;
            self.save();
            true
        } else {
            false
        }
    }

    /// Load the stored best score (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(raw)) = storage.get_item(Self::STORAGE_KEY) {
                match raw.parse::<u32>() {
                    Ok(score) => {
                        log::info!("Loaded high score: {}", score);
                        return Self(score);
                    }
                    Err(_) => log::warn!("Stored high score unreadable, starting at 0"),
                }
            }
        }

        Self(0)
    }

    /// Persist the best score (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.0.to_string());
            log::info!("High score saved: {}", self.0);
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self(0)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
