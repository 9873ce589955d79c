//! Procedural obstacle spawner
//!
//! Runs whenever `game_time` passes `next_spawn_time`, placing new entities at
//! the right edge of the viewport. Every random choice comes from the
//! level-seeded `SpawnRng`, so a level replays identically. Obstacle delays
//! are in ticks scaled by the level's `gap`; portal timing is fixed so the
//! portal always reaches the player before the next group arrives.

use super::registry::{EntityKind, OrbType, Rect};
use super::state::{Mode, SimulationState};
use crate::consts::*;
use crate::level::{Level, ModeTarget};

/// Run-up ticks between deciding on a portal and placing it
const PORTAL_RUN_UP: f32 = 60.0;
/// Extra clearance after a portal before the next spawn
const PORTAL_CLEARANCE: f32 = 60.0;
/// Non-cube obstacle cadence
const NON_CUBE_DELAY: f32 = 20.0;
const SPIKE_DELAY: f32 = 40.0;
const ORB_DELAY: f32 = 100.0;
const PAD_DELAY: f32 = 100.0;
/// Pause after a plain platform, on top of its width
const PLATFORM_DELAY: f32 = 12.0;

/// Spikes laid under an orb
const ORB_SPIKE_RUN: usize = 5;
/// Height of an orb above the floor
const ORB_HEIGHT: f32 = 140.0;
/// Platform raised behind a jump pad
const PAD_PLATFORM_OFFSET: f32 = 200.0;
const PAD_PLATFORM_WIDTH: f32 = 200.0;

/// Orb-assisted gap jump: spike run, yellow orb, then the platform
const GAP_JUMP_CHANCE: f32 = 0.2;
const GAP_JUMP_LENGTH: f32 = 400.0;
const GAP_JUMP_SPIKE_OFFSET: f32 = 96.0;
const GAP_JUMP_ORB_OFFSET: f32 = 54.0;
const GAP_JUMP_ORB_DROP: f32 = 50.0;
const GAP_JUMP_PLATFORM_OFFSET: f32 = 244.0;

/// Cube category bands
const SPIKE_BAND: f32 = 0.3;
const PLATFORM_BAND: f32 = 0.8;
const ORB_BAND: f32 = 0.92;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CubeSpawn {
    Spike,
    Platform,
    Orb,
    Pad,
}

/// Place the next obstacle group if it's due
pub fn maybe_spawn(state: &mut SimulationState, level: Option<&Level>) {
    if state.game_time >= state.next_spawn_time {
        spawn(state, level);
    }
}

/// Place the next obstacle group and schedule the one after
pub fn spawn(state: &mut SimulationState, level: Option<&Level>) {
    let Some(level) = level else {
        log::warn!(
            "No level data for index {}; skipping spawn",
            state.level_index
        );
        return;
    };
    let gap = level.params.gap;
    if !(gap.is_finite() && gap > 0.0) {
        log::warn!("Level '{}' has invalid gap {}; skipping spawn", level.name, gap);
        return;
    }

    if try_portal(state, level) {
        return;
    }

    let delay = match state.mode {
        Mode::Cube => spawn_cube(state),
        Mode::Ship | Mode::Ufo | Mode::Wave => spawn_non_cube(state),
    };
    state.next_spawn_time = state.game_time + delay * gap;
}

/// Mode-portal gating. Returns true if this call was spent on the portal.
fn try_portal(state: &mut SimulationState, level: &Level) -> bool {
    let score = state.score;
    if score == 0 || score / PORTAL_INTERVAL <= state.points_since_portal / PORTAL_INTERVAL {
        return false;
    }
    let Some(target) = level.mode_for_score(score) else {
        log::warn!("Level '{}' has no mode sequence; no portal", level.name);
        return false;
    };
    if target == state.mode_target() && target != ModeTarget::CubeUpsideDown {
        return false;
    }

    let tuning = state.tuning;
    if !state.waiting_for_portal {
        state.waiting_for_portal = true;
        state.next_spawn_time = state.game_time + PORTAL_RUN_UP;
        log::debug!("Portal to {} queued at score {}", target.as_str(), score);
        return true;
    }

    let floor = tuning.floor_y();
    let x = tuning.viewport_width;
    if flips_gravity(state, target) {
        // The player crosses the playfield while still inside the portal's
        // column, so the gate spans it instead of a pillar
        state.entities.insert(
            EntityKind::Portal {
                target,
                triggered: false,
            },
            Rect::new(x, 0.0, PORTAL_WIDTH, floor),
        );
    } else {
        state.entities.insert(
            EntityKind::Portal {
                target,
                triggered: false,
            },
            Rect::new(x, floor - PORTAL_HEIGHT, PORTAL_WIDTH, PORTAL_HEIGHT),
        );
        // Blocks everything above the portal so it can't be flown around
        state.entities.insert(
            EntityKind::Pillar,
            Rect::new(
                x + PORTAL_PILLAR_OFFSET,
                0.0,
                PORTAL_PILLAR_WIDTH,
                floor - PORTAL_HEIGHT,
            ),
        );
    }
    state.points_since_portal = score;
    state.waiting_for_portal = false;
    state.next_spawn_time =
        state.game_time + tuning.viewport_width / tuning.scroll_speed + PORTAL_CLEARANCE;
    log::info!("Portal to {} placed at score {}", target.as_str(), score);
    true
}

/// Entering a portal to `target` turns gravity over
fn flips_gravity(state: &SimulationState, target: ModeTarget) -> bool {
    state.upside_down || target == ModeTarget::CubeUpsideDown
}

/// Ship/UFO/wave: floor spike, ceiling spike or a floating block
fn spawn_non_cube(state: &mut SimulationState) -> f32 {
    let floor = state.tuning.floor_y();
    let x = state.tuning.viewport_width;
    let r = state.rng.next_f32();

    if r < 1.0 / 3.0 {
        state.entities.insert(
            EntityKind::Spike { flipped: false },
            Rect::new(x, floor - SPIKE_HEIGHT, SPIKE_WIDTH, SPIKE_HEIGHT),
        );
    } else if r < 2.0 / 3.0 {
        state.entities.insert(
            EntityKind::Spike { flipped: true },
            Rect::new(x, 0.0, SPIKE_WIDTH, SPIKE_HEIGHT),
        );
    } else {
        let y = state.rng.next_f32() * (floor - 200.0) + 100.0;
        state.entities.insert(
            EntityKind::Pillar,
            Rect::new(x, y, FLOATING_PILLAR_SIZE, FLOATING_PILLAR_SIZE),
        );
    }
    NON_CUBE_DELAY
}

/// Cube mode; returns the unscaled delay
fn spawn_cube(state: &mut SimulationState) -> f32 {
    let mut kind = match state.rng.next_f32() {
        r if r < SPIKE_BAND => CubeSpawn::Spike,
        r if r < PLATFORM_BAND => CubeSpawn::Platform,
        r if r < ORB_BAND => CubeSpawn::Orb,
        _ => CubeSpawn::Pad,
    };
    if kind == CubeSpawn::Orb && state.orbs_spawned >= MAX_ORBS_PER_RUN {
        kind = CubeSpawn::Spike;
    }
    if kind == CubeSpawn::Platform && state.platform_run >= PLATFORM_RUN_CAP {
        kind = CubeSpawn::Spike;
        state.platform_run = 0;
    }

    let mut placer = CubePlacer::new(state);
    match kind {
        CubeSpawn::Spike => {
            placer.spike(0.0);
            SPIKE_DELAY
        }
        CubeSpawn::Pad => {
            let floor = placer.floor;
            placer.place(
                EntityKind::JumpPad { triggered: false },
                Rect::new(placer.x, floor - PAD_HEIGHT, PAD_WIDTH, PAD_HEIGHT),
            );
            placer.place(
                EntityKind::Platform,
                Rect::new(
                    placer.x + PAD_PLATFORM_OFFSET,
                    floor * 0.5,
                    PAD_PLATFORM_WIDTH,
                    floor * 0.5,
                ),
            );
            PAD_DELAY
        }
        CubeSpawn::Orb => {
            placer.state.orbs_spawned += 1;
            let orb = roll_orb_type(placer.state);
            let floor = placer.floor;
            placer.place(
                EntityKind::Orb { orb, used: false },
                Rect::new(placer.x, floor - ORB_HEIGHT, ORB_SIZE, ORB_SIZE),
            );
            for i in 0..ORB_SPIKE_RUN {
                placer.spike(-60.0 + i as f32 * SPIKE_WIDTH);
            }
            ORB_DELAY
        }
        CubeSpawn::Platform => spawn_platform(placer),
    }
}

/// Chained platforms step upward from the previous one
fn spawn_platform(mut placer: CubePlacer<'_>) -> f32 {
    let floor = placer.floor;
    let x = placer.x;
    let speed = placer.state.tuning.scroll_speed;

    let width = placer.state.rng.next_f32() * 60.0 + 60.0;
    let y = if placer.state.platform_run == 0 {
        floor - 20.0
    } else {
        placer.state.last_platform_y - (placer.state.rng.next_f32() * 20.0 + 35.0)
    };
    let top = y.max(floor * 0.5);
    placer.state.last_platform_y = top;

    let gap_jump =
        placer.state.platform_run > 0 && placer.state.rng.next_f32() < GAP_JUMP_CHANCE;
    let delay = if gap_jump {
        placer.place(
            EntityKind::Orb {
                orb: OrbType::Yellow,
                used: false,
            },
            Rect::new(
                x + GAP_JUMP_ORB_OFFSET,
                top + GAP_JUMP_ORB_DROP,
                ORB_SIZE,
                ORB_SIZE,
            ),
        );
        let spikes = (GAP_JUMP_LENGTH / SPIKE_WIDTH).ceil() as usize;
        for i in 0..spikes {
            placer.spike(-GAP_JUMP_SPIKE_OFFSET + i as f32 * SPIKE_WIDTH);
        }
        placer.place(
            EntityKind::Platform,
            Rect::new(x + GAP_JUMP_PLATFORM_OFFSET, top, width, floor - top),
        );
        (width + GAP_JUMP_PLATFORM_OFFSET) / speed
    } else {
        placer.place(EntityKind::Platform, Rect::new(x, top, width, floor - top));
        width / speed + PLATFORM_DELAY
    };

    placer.state.platform_run += 1;
    delay
}

/// Red 10%, then blue 30% of the rest, else yellow
fn roll_orb_type(state: &mut SimulationState) -> OrbType {
    if state.rng.next_f32() < 0.1 {
        OrbType::Red
    } else if state.rng.next_f32() < 0.3 {
        OrbType::Blue
    } else {
        OrbType::Yellow
    }
}

/// Inserts cube-mode geometry, mirrored when gravity is inverted
struct CubePlacer<'a> {
    state: &'a mut SimulationState,
    floor: f32,
    x: f32,
    mirror: bool,
}

impl<'a> CubePlacer<'a> {
    fn new(state: &'a mut SimulationState) -> Self {
        let floor = state.tuning.floor_y();
        let x = state.tuning.viewport_width;
        let mirror = state.upside_down;
        Self {
            state,
            floor,
            x,
            mirror,
        }
    }

    fn place(&mut self, kind: EntityKind, rect: Rect) -> u32 {
        let (kind, rect) = if self.mirror {
            let kind = match kind {
                EntityKind::Spike { flipped } => EntityKind::Spike { flipped: !flipped },
                other => other,
            };
            (kind, rect.mirrored(self.floor))
        } else {
            (kind, rect)
        };
        self.state.entities.insert(kind, rect)
    }

    /// Floor spike at `dx` from the spawn edge
    fn spike(&mut self, dx: f32) -> u32 {
        let floor = self.floor;
        let x = self.x;
        self.place(
            EntityKind::Spike { flipped: false },
            Rect::new(x + dx, floor - SPIKE_HEIGHT, SPIKE_WIDTH, SPIKE_HEIGHT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Difficulty, LevelCatalog, LevelParams, ModeTarget, PlatformStyle};
    use crate::sim::registry::Entity;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn level_with(sequence: Vec<ModeTarget>) -> Level {
        Level {
            name: "Test".to_string(),
            stars: 1,
            difficulty: Difficulty::Easy,
            seed: 1001,
            hue: 0.0,
            duration: 60,
            params: LevelParams {
                gap: 1.0,
                complexity: 1,
            },
            platform_style: PlatformStyle::Grid,
            mode_sequence: sequence,
        }
    }

    fn state_for(level: &Level) -> SimulationState {
        SimulationState::new(0, level, Tuning::default())
    }

    /// Drive only the spawner, jumping the clock straight to each due time
    fn spawn_sequence(level: &Level, calls: usize) -> Vec<(f32, Vec<Entity>)> {
        let mut state = state_for(level);
        let mut out = Vec::new();
        for _ in 0..calls {
            state.game_time = state.next_spawn_time;
            let before = state.entities.len();
            spawn(&mut state, Some(level));
            let placed = state.entities.as_slice()[before..].to_vec();
            out.push((state.next_spawn_time, placed));
        }
        out
    }

    #[test]
    fn test_same_seed_same_placements() {
        let level = LevelCatalog::builtin().get(0).unwrap().clone();
        let a = spawn_sequence(&level, 200);
        let b = spawn_sequence(&level, 200);
        assert_eq!(a, b);
        assert!(a.iter().any(|(_, placed)| !placed.is_empty()));

        let mut other = level.clone();
        other.seed = 9999;
        assert_ne!(a, spawn_sequence(&other, 200));
    }

    #[test]
    fn test_delays_scale_with_gap() {
        let mut level = level_with(vec![ModeTarget::Cube]);
        let mut state = state_for(&level);
        state.game_time = 100.0;
        spawn(&mut state, Some(&level));
        let base = state.next_spawn_time - 100.0;

        level.params.gap = 2.0;
        let mut state = state_for(&level);
        state.game_time = 100.0;
        spawn(&mut state, Some(&level));
        let doubled = state.next_spawn_time - 100.0;
        assert!((doubled - base * 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_portal_is_queued_then_placed() {
        let level = level_with(vec![ModeTarget::Ship]);
        let mut state = state_for(&level);
        state.score = 10;
        state.game_time = 700.0;

        spawn(&mut state, Some(&level));
        assert!(state.waiting_for_portal);
        assert!(state.entities.is_empty());
        assert_eq!(state.next_spawn_time, 760.0);

        state.game_time = state.next_spawn_time;
        spawn(&mut state, Some(&level));
        assert!(!state.waiting_for_portal);
        assert_eq!(state.points_since_portal, 10);

        let portals: Vec<_> = state
            .entities
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::Portal { .. }))
            .collect();
        assert_eq!(portals.len(), 1);
        assert_eq!(
            portals[0].kind,
            EntityKind::Portal {
                target: ModeTarget::Ship,
                triggered: false
            }
        );
        let pillars = state
            .entities
            .iter()
            .filter(|e| e.kind == EntityKind::Pillar)
            .count();
        assert_eq!(pillars, 1);
        assert_eq!(state.entities.len(), 2);

        // Pillar spans from the ceiling down to the portal top
        let pillar = state.entities.as_slice()[1].rect;
        assert_eq!(pillar.top(), 0.0);
        assert_eq!(pillar.bottom(), portals[0].rect.top());
        assert_eq!(state.next_spawn_time, 760.0 + 1280.0 / 8.0 + 60.0);

        // Same ten-point band: no second portal
        state.score = 15;
        state.game_time = state.next_spawn_time;
        spawn(&mut state, Some(&level));
        let portals = state
            .entities
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::Portal { .. }))
            .count();
        assert_eq!(portals, 1);
    }

    #[test]
    fn test_portal_timing_ignores_gap() {
        let mut level = level_with(vec![ModeTarget::Ship]);
        level.params.gap = 2.5;
        let mut state = state_for(&level);
        state.score = 10;
        state.game_time = 700.0;

        spawn(&mut state, Some(&level));
        assert_eq!(state.next_spawn_time, 760.0);
        state.game_time = state.next_spawn_time;
        spawn(&mut state, Some(&level));
        assert_eq!(state.next_spawn_time, 760.0 + 1280.0 / 8.0 + 60.0);

        // Ordinary spawns after it are paced by the gap again
        state.mode = Mode::Ship;
        state.game_time = state.next_spawn_time;
        let before = state.game_time;
        spawn(&mut state, Some(&level));
        assert_eq!(state.next_spawn_time, before + 20.0 * 2.5);
    }

    /// Queue and place the portal due at `score`
    fn place_portal(state: &mut SimulationState, level: &Level, score: u32) {
        state.score = score;
        state.game_time = state.next_spawn_time;
        spawn(state, Some(level));
        assert!(state.waiting_for_portal);
        state.game_time = state.next_spawn_time;
        spawn(state, Some(level));
        assert!(!state.waiting_for_portal);
    }

    #[test]
    fn test_flip_portal_spans_the_playfield() {
        let level = level_with(vec![ModeTarget::CubeUpsideDown]);
        let mut state = state_for(&level);
        place_portal(&mut state, &level, 10);

        let floor = state.tuning.floor_y();
        assert_eq!(state.entities.len(), 1);
        let portal = state.entities.iter().next().unwrap();
        assert!(matches!(portal.kind, EntityKind::Portal { .. }));
        assert_eq!(portal.rect.top(), 0.0);
        assert_eq!(portal.rect.bottom(), floor);
    }

    #[test]
    fn test_inverted_player_gets_no_pillar() {
        let level = level_with(vec![ModeTarget::Ship]);
        let mut state = state_for(&level);
        state.upside_down = true;
        place_portal(&mut state, &level, 10);

        assert!(!state.entities.iter().any(|e| e.kind == EntityKind::Pillar));
        let portal = state.entities.iter().next().unwrap();
        assert_eq!(
            portal.kind,
            EntityKind::Portal {
                target: ModeTarget::Ship,
                triggered: false
            }
        );
        assert_eq!(portal.rect.top(), 0.0);
        assert_eq!(portal.rect.bottom(), state.tuning.floor_y());
    }

    #[test]
    fn test_no_portal_when_already_in_target_mode() {
        let level = level_with(vec![ModeTarget::Cube]);
        let mut state = state_for(&level);
        state.score = 10;
        state.game_time = 700.0;
        spawn(&mut state, Some(&level));
        assert!(!state.waiting_for_portal);
        assert!(
            !state
                .entities
                .iter()
                .any(|e| matches!(e.kind, EntityKind::Portal { .. }))
        );
    }

    #[test]
    fn test_upside_down_portal_always_fires() {
        let level = level_with(vec![ModeTarget::CubeUpsideDown]);
        let mut state = state_for(&level);
        state.mode = Mode::Cube;
        state.upside_down = true;
        state.score = 10;
        spawn(&mut state, Some(&level));
        assert!(state.waiting_for_portal);
    }

    #[test]
    fn test_non_cube_spawns_single_hazard() {
        let level = level_with(vec![ModeTarget::Ship]);
        let mut state = state_for(&level);
        state.mode = Mode::Ship;
        for _ in 0..50 {
            state.game_time = state.next_spawn_time;
            let before = state.entities.len();
            spawn(&mut state, Some(&level));
            assert_eq!(state.entities.len(), before + 1);
            assert_eq!(state.next_spawn_time, state.game_time + 20.0);
        }
        let floor = state.tuning.floor_y();
        for e in state.entities.iter() {
            match e.kind {
                EntityKind::Spike { flipped: true } => assert_eq!(e.rect.top(), 0.0),
                EntityKind::Spike { flipped: false } => assert_eq!(e.rect.bottom(), floor),
                EntityKind::Pillar => {
                    assert!(e.rect.top() >= 100.0 && e.rect.top() < floor - 100.0)
                }
                other => panic!("unexpected {:?} in ship mode", other),
            }
        }
    }

    #[test]
    fn test_orb_cap_per_run() {
        let level = level_with(vec![ModeTarget::Cube]);
        let mut state = state_for(&level);
        for _ in 0..2000 {
            state.game_time = state.next_spawn_time;
            spawn(&mut state, Some(&level));
        }
        assert!(state.orbs_spawned <= MAX_ORBS_PER_RUN);
    }

    #[test]
    fn test_platform_run_is_capped() {
        let level = level_with(vec![ModeTarget::Cube]);
        let mut state = state_for(&level);
        for _ in 0..200 {
            state.platform_run = PLATFORM_RUN_CAP;
            state.game_time = state.next_spawn_time;
            let before = state.entities.len();
            spawn(&mut state, Some(&level));
            let placed = &state.entities.as_slice()[before..];
            let has_platform = placed.iter().any(|e| e.kind == EntityKind::Platform);
            let has_pad = placed
                .iter()
                .any(|e| matches!(e.kind, EntityKind::JumpPad { .. }));
            // Only a jump pad's landing platform may appear
            assert!(!has_platform || has_pad);
            assert!(state.platform_run <= PLATFORM_RUN_CAP);
        }
    }

    #[test]
    fn test_chained_platforms_step_up() {
        let level = level_with(vec![ModeTarget::Cube]);
        let mut state = state_for(&level);
        let floor = state.tuning.floor_y();
        state.platform_run = 1;
        state.last_platform_y = floor - 20.0;

        let mut placer = CubePlacer::new(&mut state);
        placer.x = 1280.0;
        spawn_platform(placer);

        assert!(state.last_platform_y <= floor - 55.0);
        assert!(state.last_platform_y >= floor - 75.0);
        let platform = state
            .entities
            .iter()
            .find(|e| e.kind == EntityKind::Platform)
            .unwrap();
        assert_eq!(platform.rect.top(), state.last_platform_y);
        // Platforms reach down to the floor
        assert!((platform.rect.bottom() - floor).abs() < 1e-3);
        assert_eq!(state.platform_run, 2);
    }

    #[test]
    fn test_platforms_never_climb_above_half_floor() {
        let level = level_with(vec![ModeTarget::Cube]);
        let mut state = state_for(&level);
        let floor = state.tuning.floor_y();
        state.platform_run = 3;
        state.last_platform_y = floor * 0.5 + 1.0;
        spawn_platform(CubePlacer::new(&mut state));
        assert_eq!(state.last_platform_y, floor * 0.5);
    }

    #[test]
    fn test_upside_down_mirrors_cube_hazards() {
        let level = level_with(vec![ModeTarget::Cube]);
        let mut state = state_for(&level);
        state.upside_down = true;
        let mut placer = CubePlacer::new(&mut state);
        placer.spike(0.0);
        let spike = state.entities.iter().next().unwrap();
        assert_eq!(spike.kind, EntityKind::Spike { flipped: true });
        assert_eq!(spike.rect.top(), 0.0);
    }

    #[test]
    fn test_missing_level_is_a_no_op() {
        let level = level_with(vec![ModeTarget::Cube]);
        let mut state = state_for(&level);
        state.game_time = 100.0;
        let rng_before = state.rng;
        spawn(&mut state, None);
        assert!(state.entities.is_empty());
        assert_eq!(state.rng, rng_before);
        assert_eq!(state.next_spawn_time, FIRST_SPAWN_TICK);
    }

    #[test]
    fn test_empty_mode_sequence_skips_portal() {
        let level = level_with(Vec::new());
        let mut state = state_for(&level);
        state.score = 10;
        spawn(&mut state, Some(&level));
        assert!(!state.waiting_for_portal);
        assert!(!state.entities.is_empty());
    }

    proptest! {
        #[test]
        fn spawner_is_deterministic_for_any_seed(seed in any::<u32>()) {
            let mut level = level_with(vec![ModeTarget::Cube, ModeTarget::Wave]);
            level.seed = seed;
            prop_assert_eq!(spawn_sequence(&level, 60), spawn_sequence(&level, 60));
        }

        #[test]
        fn spawns_never_move_the_clock_backwards(seed in any::<u32>()) {
            let mut level = level_with(vec![ModeTarget::Cube]);
            level.seed = seed;
            let seq = spawn_sequence(&level, 100);
            for pair in seq.windows(2) {
                prop_assert!(pair[1].0 > pair[0].0);
            }
        }
    }
}
