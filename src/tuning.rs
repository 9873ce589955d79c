//! Physics and pacing tuning
//!
//! One coherent rule set. All speeds are per reference tick (dt = 1.0).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Data-driven simulation constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    /// Viewport width; new obstacles appear at this x
    pub viewport_width: f32,
    /// Viewport height
    pub viewport_height: f32,
    /// Height of the ground band below the floor line
    pub ground_height: f32,
    /// Leftward scroll of every entity per tick
    pub scroll_speed: f32,

    // === Cube / UFO ===
    pub gravity: f32,
    pub jump_force: f32,
    pub ufo_jump_force: f32,
    /// Airborne cube spin (radians per tick)
    pub rotation_speed: f32,

    // === Ship ===
    pub ship_thrust: f32,
    pub ship_gravity: f32,
    pub ship_max_speed: f32,

    // === Wave ===
    pub wave_speed: f32,

    // === Input forgiveness ===
    /// Ticks an early press is remembered
    pub jump_buffer_ticks: f32,
    /// Ticks after leaving the ground that still count as grounded
    pub coyote_ticks: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            ground_height: 240.0,
            scroll_speed: 8.0,

            gravity: 1.1,
            jump_force: 16.0,
            ufo_jump_force: 16.0,
            rotation_speed: 0.108,

            ship_thrust: 0.85,
            ship_gravity: 0.6,
            ship_max_speed: 12.0,

            wave_speed: 8.0,

            jump_buffer_ticks: 15.0,
            coyote_ticks: 15.0,
        }
    }
}

impl Tuning {
    /// Y of the floor line (top of the ground band)
    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.viewport_height - self.ground_height
    }

    /// Parse tuning overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        log::info!(
            "Tuning loaded (floor at {}, scroll {})",
            tuning.floor_y(),
            tuning.scroll_speed
        );
        Ok(tuning)
    }
}
