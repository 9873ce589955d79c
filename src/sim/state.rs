//! Simulation state and core types
//!
//! Everything a run mutates lives in one owned `SimulationState` that each
//! component receives explicitly.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::registry::{EntityRegistry, OrbType, Rect};
use super::rng::SpawnRng;
use crate::consts::*;
use crate::level::{Level, ModeTarget};
use crate::tuning::Tuning;

/// Movement mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Gravity + single jump from the ground
    #[default]
    Cube,
    /// Hold to thrust upward
    Ship,
    /// Tap to hop, even in mid-air
    Ufo,
    /// Fixed-speed diagonal, direction follows hold
    Wave,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Cube => "cube",
            Mode::Ship => "ship",
            Mode::Ufo => "ufo",
            Mode::Wave => "wave",
        }
    }
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No run loaded (level select)
    Menu,
    Running,
    Paused,
    /// Player died
    GameOver,
    /// Score reached the level's duration
    LevelComplete,
}

/// Things that happened during a tick, drained by the host for audio/UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    OrbUsed { orb: OrbType },
    PadUsed,
    PortalEntered { target: ModeTarget },
    ScoreChanged { score: u32, progress: u32 },
    Died { pos: Vec2 },
    LevelCompleted,
}

/// Early-press and late-press forgiveness
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JumpBuffer {
    /// Ticks left on a remembered press
    pub buffer: f32,
    /// Ticks left in which the cube still counts as grounded
    pub coyote: f32,
}

impl JumpBuffer {
    /// Remember a press for `window` ticks
    pub fn press(&mut self, window: f32) {
        self.buffer = window;
    }

    /// A press is waiting to be used
    #[inline]
    pub fn is_active(&self) -> bool {
        self.buffer > 0.0
    }

    /// Use up the pending press (and any coyote grace)
    pub fn consume(&mut self) {
        self.buffer = 0.0;
        self.coyote = 0.0;
    }

    pub fn decay(&mut self, dt: f32) {
        if self.buffer > 0.0 {
            self.buffer = (self.buffer - dt).max(0.0);
        }
    }
}

/// The player avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (positive is down)
    pub vel_y: f32,
    pub on_ground: bool,
    /// Rotation in radians; cube landings snap it to a right angle
    pub angle: f32,
    /// Recent centre points in wave mode (oldest first)
    #[serde(skip)]
    pub trail: VecDeque<Vec2>,
}

impl Player {
    /// Player standing on the floor at the fixed x
    pub fn on_floor(floor_y: f32) -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, floor_y - PLAYER_HEIGHT),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            vel_y: 0.0,
            on_ground: true,
            angle: 0.0,
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Upward impulse of `force`, relative to the current gravity direction
    pub fn launch(&mut self, force: f32, gravity_sign: f32) {
        self.vel_y = -force * gravity_sign;
        self.on_ground = false;
    }

    /// Record current centre to the wave trail
    pub fn record_trail(&mut self) {
        self.trail.push_back(self.center());
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }
}

/// Complete state of one run (deterministic apart from `events`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub tuning: Tuning,
    /// Index of the level in the catalog
    pub level_index: usize,
    pub phase: GamePhase,

    /// Accumulated ticks
    pub game_time: f32,
    /// One point per `TICKS_PER_SCORE`
    pub score: u32,
    /// Percent of the level's duration reached (0-100)
    pub progress: u32,

    pub mode: Mode,
    /// Cube gravity is inverted
    pub upside_down: bool,

    // === Spawner bookkeeping ===
    /// Score at which the last mode portal was placed
    pub points_since_portal: u32,
    /// Tick at which the spawner acts next
    pub next_spawn_time: f32,
    /// A portal is due on the next spawn
    pub waiting_for_portal: bool,
    /// Consecutive platforms placed
    pub platform_run: u32,
    pub last_platform_y: f32,
    pub orbs_spawned: u32,
    pub rng: SpawnRng,

    /// `None` once the player has died
    pub player: Option<Player>,
    pub jump: JumpBuffer,
    pub entities: EntityRegistry,

    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl SimulationState {
    /// Fresh run of `level`, seeded from the level
    pub fn new(level_index: usize, level: &Level, tuning: Tuning) -> Self {
        let floor = tuning.floor_y();
        Self {
            tuning,
            level_index,
            phase: GamePhase::Running,
            game_time: 0.0,
            score: 0,
            progress: 0,
            mode: Mode::Cube,
            upside_down: false,
            points_since_portal: 0,
            next_spawn_time: FIRST_SPAWN_TICK,
            waiting_for_portal: false,
            platform_run: 0,
            last_platform_y: floor,
            orbs_spawned: 0,
            rng: SpawnRng::new(level.seed),
            player: Some(Player::on_floor(floor)),
            jump: JumpBuffer::default(),
            entities: EntityRegistry::new(),
            events: Vec::new(),
        }
    }

    /// +1 normally, -1 for the upside-down cube
    #[inline]
    pub fn gravity_sign(&self) -> f32 {
        if self.mode == Mode::Cube && self.upside_down {
            -1.0
        } else {
            1.0
        }
    }

    /// Mode plus orientation, comparable with portal targets
    pub fn mode_target(&self) -> ModeTarget {
        ModeTarget::current(self.mode, self.upside_down)
    }

    /// Switch modes through a portal
    pub fn enter_portal(&mut self, target: ModeTarget) {
        let previous = self.mode;
        self.mode = target.mode();
        self.upside_down = match target {
            ModeTarget::CubeUpsideDown => !self.upside_down,
            _ => false,
        };
        if let Some(player) = self.player.as_mut() {
            if previous != self.mode {
                player.trail.clear();
            }
            player.on_ground = false;
        }
        log::info!(
            "Mode {} -> {} (upside down: {})",
            previous.as_str(),
            self.mode.as_str(),
            self.upside_down
        );
    }

    /// Terminal death transition; discards the player
    pub fn kill_player(&mut self) {
        if let Some(player) = self.player.take() {
            log::info!(
                "Died at score {} ({}%) in {} mode",
                self.score,
                self.progress,
                self.mode.as_str()
            );
            self.events.push(GameEvent::Died {
                pos: player.center(),
            });
        }
        self.phase = GamePhase::GameOver;
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_level_complete(&self) -> bool {
        self.phase == GamePhase::LevelComplete
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
