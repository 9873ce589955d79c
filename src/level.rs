//! Level catalog
//!
//! Levels are static data: a seed for the spawner, pacing parameters and the
//! cyclic list of movement modes visited every ten score points.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::Mode;

/// Mode a portal switches the player into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeTarget {
    Cube,
    Ship,
    Ufo,
    Wave,
    /// Cube with inverted gravity; its portal always fires
    CubeUpsideDown,
}

impl ModeTarget {
    /// Movement mode behind this target
    pub fn mode(self) -> Mode {
        match self {
            ModeTarget::Cube | ModeTarget::CubeUpsideDown => Mode::Cube,
            ModeTarget::Ship => Mode::Ship,
            ModeTarget::Ufo => Mode::Ufo,
            ModeTarget::Wave => Mode::Wave,
        }
    }

    /// Target matching the player's current mode and orientation
    pub fn current(mode: Mode, upside_down: bool) -> Self {
        match mode {
            Mode::Cube if upside_down => ModeTarget::CubeUpsideDown,
            Mode::Cube => ModeTarget::Cube,
            Mode::Ship => ModeTarget::Ship,
            Mode::Ufo => ModeTarget::Ufo,
            Mode::Wave => ModeTarget::Wave,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModeTarget::Cube => "cube",
            ModeTarget::Ship => "ship",
            ModeTarget::Ufo => "ufo",
            ModeTarget::Wave => "wave",
            ModeTarget::CubeUpsideDown => "cube_upside_down",
        }
    }
}

/// Difficulty tier shown on the level card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Harder,
    Insane,
}

/// Platform decoration (renderer only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformStyle {
    #[default]
    Grid,
    Bricks,
    Glow,
    Metal,
    Checkered,
}

/// Spawner pacing parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelParams {
    /// Multiplier on every spawn delay (smaller = denser)
    pub gap: f32,
    pub complexity: u32,
}

/// A single level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub name: String,
    pub stars: u8,
    pub difficulty: Difficulty,
    pub seed: u32,
    /// Background hue in degrees
    pub hue: f32,
    /// Score needed to complete the level
    pub duration: u32,
    pub params: LevelParams,
    #[serde(default)]
    pub platform_style: PlatformStyle,
    pub mode_sequence: Vec<ModeTarget>,
}

impl Level {
    /// Portal target for a score, cycling through the mode sequence
    pub fn mode_for_score(&self, score: u32) -> Option<ModeTarget> {
        if self.mode_sequence.is_empty() {
            return None;
        }
        let slot = (score / crate::consts::PORTAL_INTERVAL) as usize;
        Some(self.mode_sequence[slot % self.mode_sequence.len()])
    }

    /// Progress percentage for a score (0-100)
    pub fn progress_percent(&self, score: u32) -> u32 {
        if self.duration == 0 {
            return 100;
        }
        ((score as u64 * 100 / self.duration as u64) as u32).min(100)
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let reason = if !(self.params.gap.is_finite() && self.params.gap > 0.0) {
            Some("gap must be a positive number")
        } else if self.duration == 0 {
            Some("duration must be at least 1")
        } else if self.mode_sequence.is_empty() {
            Some("mode sequence is empty")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(ConfigError::InvalidLevel {
                index,
                name: self.name.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

/// Ordered list of levels, indexed by integer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelCatalog {
    /// Build a catalog, rejecting levels the spawner can't run
    pub fn new(levels: Vec<Level>) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        for (index, level) in levels.iter().enumerate() {
            level.validate(index)?;
        }
        Ok(Self { levels })
    }

    /// Load a catalog in the `LEVELS_DATA` JSON shape
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let levels: Vec<Level> = serde_json::from_str(json)?;
        let catalog = Self::new(levels)?;
        log::info!("Loaded {} levels from JSON", catalog.len());
        Ok(catalog)
    }

    /// The five stock levels
    pub fn builtin() -> Self {
        use ModeTarget::*;

        let level = |name: &str,
                     stars: u8,
                     difficulty: Difficulty,
                     seed: u32,
                     hue: f32,
                     gap: f32,
                     complexity: u32,
                     platform_style: PlatformStyle,
                     mode_sequence: [ModeTarget; 5]| Level {
            name: name.to_string(),
            stars,
            difficulty,
            seed,
            hue,
            duration: 60,
            params: LevelParams { gap, complexity },
            platform_style,
            mode_sequence: mode_sequence.to_vec(),
        };

        Self {
            levels: vec![
                level(
                    "Stereo Madness",
                    1,
                    Difficulty::Easy,
                    1001,
                    200.0,
                    1.6,
                    1,
                    PlatformStyle::Grid,
                    [Cube, Ship, Ufo, Wave, CubeUpsideDown],
                ),
                level(
                    "Back on Track",
                    3,
                    Difficulty::Normal,
                    2002,
                    280.0,
                    1.3,
                    2,
                    PlatformStyle::Bricks,
                    [Ship, Ufo, Cube, Wave, CubeUpsideDown],
                ),
                level(
                    "Polargeist",
                    5,
                    Difficulty::Hard,
                    3003,
                    120.0,
                    1.1,
                    3,
                    PlatformStyle::Glow,
                    [Cube, Wave, Ufo, Ship, CubeUpsideDown],
                ),
                level(
                    "Dry Out",
                    7,
                    Difficulty::Harder,
                    4004,
                    30.0,
                    0.9,
                    4,
                    PlatformStyle::Metal,
                    [Wave, Ship, Cube, Ufo, CubeUpsideDown],
                ),
                level(
                    "Base After Base",
                    10,
                    Difficulty::Insane,
                    5005,
                    0.0,
                    0.8,
                    5,
                    PlatformStyle::Checkered,
                    [Ufo, Cube, Ship, Wave, CubeUpsideDown],
                ),
            ],
        }
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }
}
