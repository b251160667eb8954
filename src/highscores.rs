//! Persisted best score
//!
//! Stored in LocalStorage as a plain integer string. Anything missing or
//! unparseable reads back as zero; the game never fails over a bad record.

/// The session's best score across runs
#[derive(Debug, Clone, Copy, Default)]
pub struct HighScore {
    pub best: u32,
}

impl HighScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "dragon_glide_high_score";

    pub fn new() -> Self {
        Self { best: 0 }
    }

    /// Record a score; returns true when it sets a new best
    pub fn observe(&mut self, score: u32) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Decode a stored value, treating garbage as an empty record
    fn parse_stored(raw: &str) -> u32 {
        raw.trim().parse().unwrap_or(0)
    }

    /// Load the best score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(raw)) = storage.get_item(Self::STORAGE_KEY) {
                let best = Self::parse_stored(&raw);
                log::info!("Loaded high score: {}", best);
                return Self { best };
            }
        }

        log::info!("No stored high score, starting at zero");
        Self::new()
    }

    /// Save the best score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.best.to_string());
            log::info!("High score saved: {}", self.best);
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
