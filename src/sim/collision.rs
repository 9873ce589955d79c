//! Player vs entity collision
//!
//! Every live entity is tested against the player box once per tick, in
//! insertion order, and resolved by kind. Death ends the pass.

use super::registry::{EntityKind, Rect};
use super::state::{GameEvent, Player, SimulationState};
use crate::consts::{LANDING_TOLERANCE, PAD_BOOST};

/// Resolve all player/entity overlaps for this tick
pub fn resolve(state: &mut SimulationState) {
    let gravity_sign = state.gravity_sign();
    let jump_force = state.tuning.jump_force;

    let Some(player) = state.player.as_mut() else {
        return;
    };

    let mut died = false;
    let mut portal = None;

    for entity in state.entities.iter_mut() {
        if !player.rect().overlaps(&entity.rect) {
            continue;
        }

        match &mut entity.kind {
            EntityKind::Spike { .. } | EntityKind::Pillar => died = true,
            EntityKind::Platform => {
                if !land_on(player, &entity.rect, gravity_sign) {
                    died = true;
                }
            }
            EntityKind::Orb { orb, used } => {
                if !*used && state.jump.is_active() {
                    *used = true;
                    player.launch(jump_force * orb.boost(), gravity_sign);
                    // Don't let the same press also fire a ground jump
                    state.jump.consume();
                    state.events.push(GameEvent::OrbUsed { orb: *orb });
                }
            }
            EntityKind::JumpPad { triggered } => {
                if !*triggered {
                    *triggered = true;
                    player.launch(jump_force * PAD_BOOST, gravity_sign);
                    state.jump.coyote = 0.0;
                    state.events.push(GameEvent::PadUsed);
                }
            }
            EntityKind::Portal { target, triggered } => {
                if !*triggered {
                    *triggered = true;
                    portal = Some(*target);
                    state.events.push(GameEvent::PortalEntered { target: *target });
                }
            }
        }

        if died {
            break;
        }
    }

    if died {
        state.kill_player();
    } else if let Some(target) = portal {
        state.enter_portal(target);
    }
}

/// Land on a platform if coming from the gravity side; false means a lethal hit
fn land_on(player: &mut Player, platform: &Rect, gravity_sign: f32) -> bool {
    let rect = player.rect();
    if gravity_sign > 0.0 {
        if rect.bottom() <= platform.top() + LANDING_TOLERANCE && player.vel_y >= 0.0 {
            player.pos.y = platform.top() - player.size.y;
            player.vel_y = 0.0;
            player.on_ground = true;
            return true;
        }
    } else if rect.top() >= platform.bottom() - LANDING_TOLERANCE && player.vel_y <= 0.0 {
        player.pos.y = platform.bottom();
        player.vel_y = 0.0;
        player.on_ground = true;
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::level::{LevelCatalog, ModeTarget};
    use crate::sim::registry::OrbType;
    use crate::sim::state::{GamePhase, Mode};
    use crate::tuning::Tuning;

    fn state() -> SimulationState {
        let catalog = LevelCatalog::builtin();
        SimulationState::new(0, catalog.get(0).unwrap(), Tuning::default())
    }

    /// Put the player's top-left at (100, y) moving at `vel_y`
    fn place_player(state: &mut SimulationState, y: f32, vel_y: f32) {
        let player = state.player.as_mut().unwrap();
        player.pos.y = y;
        player.vel_y = vel_y;
        player.on_ground = false;
    }

    /// Entity box around the player's column
    fn at_player(y: f32, w: f32, h: f32) -> Rect {
        Rect::new(PLAYER_X - 10.0, y, w, h)
    }

    #[test]
    fn test_spike_kills() {
        let mut state = state();
        state.entities.insert(
            EntityKind::Spike { flipped: false },
            at_player(420.0, SPIKE_WIDTH, SPIKE_HEIGHT),
        );
        resolve(&mut state);
        assert!(state.player.is_none());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(matches!(state.events[..], [GameEvent::Died { .. }]));
    }

    #[test]
    fn test_no_overlap_no_effect() {
        let mut state = state();
        state.entities.insert(
            EntityKind::Spike { flipped: false },
            Rect::new(PLAYER_X + PLAYER_WIDTH, 420.0, SPIKE_WIDTH, SPIKE_HEIGHT),
        );
        resolve(&mut state);
        assert!(state.player.is_some());
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_land_on_platform_from_above() {
        let mut state = state();
        // Feet 10px into a platform whose top is at 300
        place_player(&mut state, 260.0, 5.0);
        state
            .entities
            .insert(EntityKind::Platform, at_player(300.0, 120.0, 180.0));
        resolve(&mut state);

        let player = state.player.as_ref().unwrap();
        assert_eq!(player.pos.y, 300.0 - PLAYER_HEIGHT);
        assert_eq!(player.vel_y, 0.0);
        assert!(player.on_ground);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_resting_on_platform_counts_as_landing() {
        let mut state = state();
        place_player(&mut state, 250.5, 0.0);
        state
            .entities
            .insert(EntityKind::Platform, at_player(300.0, 120.0, 180.0));
        resolve(&mut state);
        assert!(state.player.as_ref().unwrap().on_ground);
    }

    #[test]
    fn test_platform_underside_kills() {
        let mut state = state();
        // Rising into the bottom of a floating platform
        place_player(&mut state, 290.0, -8.0);
        state
            .entities
            .insert(EntityKind::Platform, at_player(250.0, 120.0, 60.0));
        resolve(&mut state);
        assert!(state.player.is_none());
        assert!(state.is_game_over());
    }

    #[test]
    fn test_platform_side_hit_kills() {
        let mut state = state();
        // Feet 40px below the top: ran into the wall
        place_player(&mut state, 290.0, 0.0);
        state
            .entities
            .insert(EntityKind::Platform, at_player(300.0, 120.0, 180.0));
        resolve(&mut state);
        assert!(state.player.is_none());
    }

    #[test]
    fn test_upside_down_lands_on_underside() {
        let mut state = state();
        state.enter_portal(ModeTarget::CubeUpsideDown);
        place_player(&mut state, 95.0, -3.0);
        state
            .entities
            .insert(EntityKind::Platform, at_player(0.0, 120.0, 100.0));
        resolve(&mut state);
        let player = state.player.as_ref().unwrap();
        assert_eq!(player.pos.y, 100.0);
        assert!(player.on_ground);
    }

    #[test]
    fn test_red_orb_boost_applies_once() {
        let mut state = state();
        place_player(&mut state, 200.0, 3.0);
        state.jump.press(Tuning::default().jump_buffer_ticks);
        let id = state.entities.insert(
            EntityKind::Orb {
                orb: OrbType::Red,
                used: false,
            },
            at_player(210.0, ORB_SIZE, ORB_SIZE),
        );
        resolve(&mut state);

        let jump_force = Tuning::default().jump_force;
        assert_eq!(state.player.as_ref().unwrap().vel_y, -1.5 * jump_force);
        assert_eq!(
            state.entities.get(id).unwrap().kind,
            EntityKind::Orb {
                orb: OrbType::Red,
                used: true
            }
        );
        assert!(!state.jump.is_active());

        // Still overlapping and pressing again: nothing more
        state.player.as_mut().unwrap().vel_y = 2.0;
        state.jump.press(15.0);
        resolve(&mut state);
        assert_eq!(state.player.as_ref().unwrap().vel_y, 2.0);
        let orb_events = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::OrbUsed { .. }))
            .count();
        assert_eq!(orb_events, 1);
    }

    #[test]
    fn test_orb_boost_by_colour() {
        for (orb, mult) in [
            (OrbType::Yellow, 1.0),
            (OrbType::Blue, 1.25),
            (OrbType::Red, 1.5),
        ] {
            let mut state = state();
            place_player(&mut state, 200.0, 0.0);
            state.jump.press(15.0);
            state.entities.insert(
                EntityKind::Orb { orb, used: false },
                at_player(210.0, ORB_SIZE, ORB_SIZE),
            );
            resolve(&mut state);
            assert_eq!(state.player.as_ref().unwrap().vel_y, -16.0 * mult);
        }
    }

    #[test]
    fn test_orb_needs_jump_input() {
        let mut state = state();
        place_player(&mut state, 200.0, 3.0);
        let id = state.entities.insert(
            EntityKind::Orb {
                orb: OrbType::Yellow,
                used: false,
            },
            at_player(210.0, ORB_SIZE, ORB_SIZE),
        );
        resolve(&mut state);
        assert_eq!(state.player.as_ref().unwrap().vel_y, 3.0);
        assert!(matches!(
            state.entities.get(id).unwrap().kind,
            EntityKind::Orb { used: false, .. }
        ));
    }

    #[test]
    fn test_jump_pad_without_input() {
        let mut state = state();
        state.entities.insert(
            EntityKind::JumpPad { triggered: false },
            at_player(470.0, PAD_WIDTH, PAD_HEIGHT),
        );
        resolve(&mut state);
        assert_eq!(state.player.as_ref().unwrap().vel_y, -24.0);
        assert!(!state.player.as_ref().unwrap().on_ground);

        state.player.as_mut().unwrap().vel_y = 1.0;
        resolve(&mut state);
        assert_eq!(state.player.as_ref().unwrap().vel_y, 1.0);
    }

    #[test]
    fn test_portal_triggers_once() {
        let mut state = state();
        let id = state.entities.insert(
            EntityKind::Portal {
                target: ModeTarget::Ship,
                triggered: false,
            },
            at_player(400.0, PORTAL_WIDTH, PORTAL_HEIGHT),
        );
        resolve(&mut state);
        assert_eq!(state.mode, Mode::Ship);
        assert!(matches!(
            state.entities.get(id).unwrap().kind,
            EntityKind::Portal {
                triggered: true,
                ..
            }
        ));

        // Overlap persists; a different mode must survive it
        state.mode = Mode::Wave;
        resolve(&mut state);
        resolve(&mut state);
        assert_eq!(state.mode, Mode::Wave);
        let portal_events = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::PortalEntered { .. }))
            .count();
        assert_eq!(portal_events, 1);
    }

    #[test]
    fn test_death_stops_the_pass() {
        let mut state = state();
        place_player(&mut state, 200.0, 0.0);
        state.jump.press(15.0);
        state.entities.insert(
            EntityKind::Spike { flipped: true },
            at_player(190.0, SPIKE_WIDTH, SPIKE_HEIGHT),
        );
        let orb = state.entities.insert(
            EntityKind::Orb {
                orb: OrbType::Yellow,
                used: false,
            },
            at_player(210.0, ORB_SIZE, ORB_SIZE),
        );
        resolve(&mut state);
        assert!(state.player.is_none());
        assert!(matches!(
            state.entities.get(orb).unwrap().kind,
            EntityKind::Orb { used: false, .. }
        ));
    }

    #[test]
    fn test_dead_player_is_a_no_op() {
        let mut state = state();
        state.kill_player();
        state.events.clear();
        state.entities.insert(
            EntityKind::Spike { flipped: false },
            at_player(420.0, SPIKE_WIDTH, SPIKE_HEIGHT),
        );
        resolve(&mut state);
        assert!(state.events.is_empty());
    }
}
