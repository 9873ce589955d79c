//! Neon Dash - A side-scrolling reflex platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, run state)
//! - `level`: Level catalog (seeds, pacing, mode sequences)
//! - `tuning`: Data-driven physics and pacing constants
//! - `progress`: Best progress per level, persisted to LocalStorage
//! - `game`: Host-facing session (input latch, frame clock, run lifecycle)
//! - `snapshot`: Read-only views handed to the renderer
//! - `effects`: Cosmetic particles (never feed back into the simulation)

pub mod effects;
pub mod error;
pub mod game;
pub mod level;
pub mod progress;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use error::{ConfigError, GameError};
pub use game::Game;
pub use level::{Level, LevelCatalog, LevelParams, ModeTarget};
pub use progress::ProgressStore;
pub use snapshot::Snapshot;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Length of one reference frame in milliseconds (dt = 1.0)
    pub const REFERENCE_FRAME_MS: f64 = 16.66;
    /// Wall-clock delta cap per frame (~6 reference frames)
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Reference ticks per score point
    pub const TICKS_PER_SCORE: f32 = 60.0;
    /// Score points between mode portals
    pub const PORTAL_INTERVAL: u32 = 10;

    /// Player box
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    /// Fixed horizontal position of the player's left edge
    pub const PLAYER_X: f32 = 100.0;

    /// Spike footprint
    pub const SPIKE_WIDTH: f32 = 40.0;
    pub const SPIKE_HEIGHT: f32 = 60.0;

    /// Orb footprint
    pub const ORB_SIZE: f32 = 40.0;

    /// Jump pad footprint
    pub const PAD_WIDTH: f32 = 40.0;
    pub const PAD_HEIGHT: f32 = 10.0;

    /// Portal footprint and the blocking pillar above it
    pub const PORTAL_WIDTH: f32 = 50.0;
    pub const PORTAL_HEIGHT: f32 = 80.0;
    pub const PORTAL_PILLAR_OFFSET: f32 = 10.0;
    pub const PORTAL_PILLAR_WIDTH: f32 = 30.0;

    /// Floating pillar used by non-cube modes
    pub const FLOATING_PILLAR_SIZE: f32 = 50.0;

    /// Platforms accept a landing when the player's feet are at most this far below the top
    pub const LANDING_TOLERANCE: f32 = 15.0;

    /// Impulse multipliers relative to the standard jump
    pub const PAD_BOOST: f32 = 1.5;
    pub const BLUE_ORB_BOOST: f32 = 1.25;
    pub const RED_ORB_BOOST: f32 = 1.5;

    /// Orb spawns allowed per run (the gap-jump variant's orb doesn't count)
    pub const MAX_ORBS_PER_RUN: u32 = 2;
    /// Platforms in a row before a spike is forced
    pub const PLATFORM_RUN_CAP: u32 = 8;

    /// Tick at which the first spawn happens
    pub const FIRST_SPAWN_TICK: f32 = 50.0;

    /// Wave trail samples kept for rendering
    pub const TRAIL_LENGTH: usize = 50;
}
