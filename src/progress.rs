//! Best progress per level
//!
//! Each level keeps the highest percentage ever reached. Persisted to
//! LocalStorage, one key per level.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Max-so-far progress percent per level index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStore {
    best: BTreeMap<usize, u32>,
    /// A best was raised since the last save
    #[serde(skip)]
    unsaved: bool,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// LocalStorage key for a level (used only in wasm32)
    pub fn storage_key(level_index: usize) -> String {
        format!("highScore_level_{level_index}")
    }

    /// Record a reached percentage. Returns true if it's a new best.
    pub fn report(&mut self, level_index: usize, percent: u32) -> bool {
        let percent = percent.min(100);
        let best = self.best.entry(level_index).or_insert(0);
        if percent > *best {
            *best = percent;
            self.unsaved = true;
            log::info!("New best for level {}: {}%", level_index, percent);
            true
        } else {
            false
        }
    }

    /// Best percentage for a level (0 if never played)
    pub fn best(&self, level_index: usize) -> u32 {
        self.best.get(&level_index).copied().unwrap_or(0)
    }

    pub fn has_unsaved(&self) -> bool {
        self.unsaved
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.best.iter().map(|(&i, &p)| (i, p))
    }

    /// Load the first `level_count` levels from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load(level_count: usize) -> Self {
        let mut store = Self::new();
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            for i in 0..level_count {
                if let Ok(Some(value)) = storage.get_item(&Self::storage_key(i)) {
                    match value.trim().parse::<u32>() {
                        Ok(percent) => {
                            store.best.insert(i, percent.min(100));
                        }
                        Err(e) => log::warn!("Ignoring stored progress '{}' for level {}: {}", value, i, e),
                    }
                }
            }
        }

        log::info!("Loaded progress for {} levels", store.best.len());
        store
    }

    /// Save every level's best to LocalStorage if anything changed (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&mut self) {
        if !self.unsaved {
            return;
        }
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            for (i, percent) in self.iter() {
                if storage
                    .set_item(&Self::storage_key(i), &percent.to_string())
                    .is_err()
                {
                    log::warn!("Failed to save progress for level {}", i);
                }
            }
        }
        self.unsaved = false;
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(_level_count: usize) -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&mut self) {
        // Nothing to write natively
        self.unsaved = false;
    }
}
