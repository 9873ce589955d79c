//! Host-facing session
//!
//! Owns the level catalog, the current run and everything around it that is
//! not part of the deterministic core: input latching, wall-clock frame
//! timing, progress reporting and cosmetic effects.

use glam::Vec2;

use crate::consts::{MAX_FRAME_MS, REFERENCE_FRAME_MS};
use crate::effects::{DEATH_BURST_COUNT, Effects};
use crate::error::GameError;
use crate::level::LevelCatalog;
use crate::progress::ProgressStore;
use crate::sim::{GameEvent, GamePhase, SimulationState, TickInput, tick};
use crate::snapshot::{LevelSummary, Snapshot};
use crate::tuning::Tuning;

/// Collects jump input between ticks
#[derive(Debug, Clone, Copy, Default)]
pub struct InputLatch {
    pressed: bool,
    held: bool,
}

impl InputLatch {
    pub fn press(&mut self) {
        self.pressed = true;
        self.held = true;
    }

    pub fn release(&mut self) {
        self.held = false;
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Input for the next tick; clears the press edge
    pub fn take(&mut self) -> TickInput {
        let input = TickInput {
            jump_pressed: self.pressed,
            jump_held: self.held,
        };
        self.pressed = false;
        input
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Converts animation-frame timestamps into reference-frame deltas
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    /// Delta since the previous frame in reference frames (0 on the first)
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_MS) / REFERENCE_FRAME_MS,
            None => 0.0,
        };
        self.last = Some(now_ms);
        dt as f32
    }

    /// Forget the previous timestamp so the next frame has dt = 0
    pub fn reset(&mut self) {
        self.last = None;
    }
}

pub struct Game {
    catalog: LevelCatalog,
    tuning: Tuning,
    progress: ProgressStore,
    /// `None` while in the menu
    sim: Option<SimulationState>,
    input: InputLatch,
    clock: FrameClock,
    effects: Effects,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(LevelCatalog::builtin(), Tuning::default(), ProgressStore::new())
    }
}

impl Game {
    pub fn new(catalog: LevelCatalog, tuning: Tuning, progress: ProgressStore) -> Self {
        Self {
            catalog,
            tuning,
            progress,
            sim: None,
            input: InputLatch::default(),
            clock: FrameClock::default(),
            effects: Effects::new(),
        }
    }

    // === Lifecycle ===

    /// Begin a fresh run of level `index`
    pub fn start(&mut self, index: usize) -> Result<(), GameError> {
        let level = self.catalog.get(index).ok_or(GameError::UnknownLevel {
            index,
            count: self.catalog.len(),
        })?;
        log::info!(
            "Starting level {} '{}' (seed {}, duration {})",
            index,
            level.name,
            level.seed,
            level.duration
        );
        self.sim = Some(SimulationState::new(index, level, self.tuning));
        self.input.reset();
        self.clock.reset();
        self.effects.clear();
        Ok(())
    }

    /// Start the current level over
    pub fn restart(&mut self) -> Result<(), GameError> {
        let index = self.level_index().ok_or(GameError::NotStarted)?;
        log::info!("Restarting level {}", index);
        self.start(index)
    }

    /// Next level in the catalog, or back to the menu after the last one
    pub fn advance_to_next_level(&mut self) -> Result<(), GameError> {
        let next = self.level_index().ok_or(GameError::NotStarted)? + 1;
        if next < self.catalog.len() {
            self.start(next)
        } else {
            log::info!("No level after {}; returning to menu", next - 1);
            self.show_menu();
            Ok(())
        }
    }

    /// Leave the run; progress reached so far is kept
    pub fn show_menu(&mut self) {
        self.progress.save();
        self.sim = None;
        self.input.reset();
        self.effects.clear();
    }

    /// Running -> Paused; ignored in any other phase
    pub fn pause(&mut self) {
        if let Some(sim) = self.sim.as_mut() {
            if sim.phase == GamePhase::Running {
                sim.phase = GamePhase::Paused;
                log::debug!("Paused");
            }
        }
    }

    /// Paused -> Running; the next frame gets dt = 0
    pub fn resume(&mut self) {
        if let Some(sim) = self.sim.as_mut() {
            if sim.phase == GamePhase::Paused {
                sim.phase = GamePhase::Running;
                self.clock.reset();
                log::debug!("Resumed");
            }
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase() {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => {}
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.sim.as_ref().map_or(GamePhase::Menu, |s| s.phase)
    }

    pub fn level_index(&self) -> Option<usize> {
        self.sim.as_ref().map(|s| s.level_index)
    }

    // === Input ===

    pub fn on_jump_press(&mut self) {
        self.input.press();
    }

    pub fn on_jump_release(&mut self) {
        self.input.release();
    }

    pub fn is_jump_held(&self) -> bool {
        self.input.is_held()
    }

    // === Frame ===

    /// Advance by the wall-clock time since the last frame
    pub fn frame(&mut self, timestamp_ms: f64) -> Vec<GameEvent> {
        let dt = self.clock.advance(timestamp_ms);
        self.step(dt)
    }

    /// Advance by `dt` reference frames; returns the run's events
    pub fn step(&mut self, dt: f32) -> Vec<GameEvent> {
        let input = self.input.take();
        let Some(sim) = self.sim.as_mut() else {
            return Vec::new();
        };

        let level_index = sim.level_index;
        tick(sim, self.catalog.get(level_index), &input, dt);

        let events = sim.drain_events();
        let mut finished = false;
        for event in &events {
            match *event {
                GameEvent::ScoreChanged { progress, .. } => {
                    self.progress.report(level_index, progress);
                }
                GameEvent::Died { pos } => {
                    self.effects.burst(pos, DEATH_BURST_COUNT);
                    finished = true;
                }
                GameEvent::LevelCompleted => finished = true,
                _ => {}
            }
        }
        if finished {
            self.progress.save();
        }

        if sim.phase != GamePhase::Paused {
            self.effects.update(dt);
        }
        events
    }

    // === Views ===

    pub fn snapshot(&self) -> Snapshot {
        match self.sim.as_ref() {
            Some(sim) => Snapshot::capture(
                sim,
                self.catalog.get(sim.level_index),
                self.effects.particles(),
            ),
            None => Snapshot::menu(
                Vec2::new(self.tuning.viewport_width, self.tuning.viewport_height),
                self.tuning.floor_y(),
            ),
        }
    }

    /// Level-select rows with each level's best progress
    pub fn level_summaries(&self) -> Vec<LevelSummary> {
        self.catalog
            .iter()
            .enumerate()
            .map(|(index, level)| LevelSummary {
                index,
                name: level.name.clone(),
                stars: level.stars,
                difficulty: level.difficulty,
                best_percent: self.progress.best(index),
            })
            .collect()
    }

    pub fn sim(&self) -> Option<&SimulationState> {
        self.sim.as_ref()
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }
}
