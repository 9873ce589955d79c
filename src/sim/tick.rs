//! Simulation tick
//!
//! Advances one run by `dt` reference frames. The order inside a tick is
//! fixed: clock and score, completion, spawning, physics, collision, pruning.

use super::state::{GameEvent, GamePhase, SimulationState};
use super::{collision, physics, spawner};
use crate::consts::TICKS_PER_SCORE;
use crate::level::Level;

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump was pressed since the previous tick (edge)
    pub jump_pressed: bool,
    /// Jump is currently held down (level)
    pub jump_held: bool,
}

/// Advance the run by `dt` reference frames
///
/// `level` is the definition the run was started from. Without it the run
/// still moves and collides but never spawns or completes.
pub fn tick(state: &mut SimulationState, level: Option<&Level>, input: &TickInput, dt: f32) {
    if state.phase != GamePhase::Running {
        return;
    }

    state.game_time += dt;

    let elapsed = (state.game_time / TICKS_PER_SCORE).floor() as u32;
    if elapsed > state.score {
        state.score += 1;
        if let Some(level) = level {
            state.progress = level.progress_percent(state.score);
        }
        state.events.push(GameEvent::ScoreChanged {
            score: state.score,
            progress: state.progress,
        });
    }

    if let Some(level) = level {
        if state.score >= level.duration {
            state.phase = GamePhase::LevelComplete;
            state.events.push(GameEvent::LevelCompleted);
            log::info!("Level '{}' complete at score {}", level.name, state.score);
            return;
        }
    }

    spawner::maybe_spawn(state, level);
    physics::step(state, input, dt);
    collision::resolve(state);

    let pruned = state.entities.prune_offscreen();
    if pruned > 0 {
        log::trace!("Pruned {} entities, {} live", pruned, state.entities.len());
    }
}
