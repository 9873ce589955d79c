//! Per-mode player movement
//!
//! Each tick: latch the jump press into the buffer, move the player according
//! to its mode, clamp against floor and ceiling, then scroll the world.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use super::state::{GameEvent, JumpBuffer, Mode, Player, SimulationState};
use super::tick::TickInput;
use crate::tuning::Tuning;

/// Advance the player and scroll every entity by one tick of `dt`
pub fn step(state: &mut SimulationState, input: &TickInput, dt: f32) {
    let tuning = state.tuning;
    if input.jump_pressed {
        state.jump.press(tuning.jump_buffer_ticks);
    }

    let gravity_sign = state.gravity_sign();
    if let Some(player) = state.player.as_mut() {
        let jumped = match state.mode {
            Mode::Cube => step_cube(player, &mut state.jump, &tuning, gravity_sign, dt),
            Mode::Ship => {
                step_ship(player, input.jump_held, &tuning, dt);
                state.jump.decay(dt);
                false
            }
            Mode::Ufo => step_ufo(player, &mut state.jump, &tuning, dt),
            Mode::Wave => {
                step_wave(player, input.jump_held, &tuning, dt);
                state.jump.decay(dt);
                false
            }
        };
        if jumped {
            state.events.push(GameEvent::Jumped);
        }
        resolve_bounds(player, state.mode, gravity_sign, tuning.floor_y());
    }

    state.entities.scroll(tuning.scroll_speed * dt);
}

/// Returns true if a jump executed
fn step_cube(
    player: &mut Player,
    jump: &mut JumpBuffer,
    tuning: &Tuning,
    gravity_sign: f32,
    dt: f32,
) -> bool {
    if player.on_ground {
        jump.coyote = tuning.coyote_ticks;
    } else {
        jump.coyote = (jump.coyote - dt).max(0.0);
    }

    player.vel_y += tuning.gravity * gravity_sign * dt;

    let grounded = player.on_ground || jump.coyote > 0.0;
    let jumped = jump.is_active() && grounded;
    if jumped {
        player.launch(tuning.jump_force, gravity_sign);
        jump.consume();
    } else {
        jump.decay(dt);
    }

    player.pos.y += player.vel_y * dt;

    if player.on_ground {
        player.angle = (player.angle / FRAC_PI_2).round() * FRAC_PI_2;
    } else {
        player.angle += tuning.rotation_speed * gravity_sign * dt;
    }
    jumped
}

fn step_ship(player: &mut Player, held: bool, tuning: &Tuning, dt: f32) {
    if held {
        player.vel_y -= tuning.ship_thrust * dt;
    } else {
        player.vel_y += tuning.ship_gravity * dt;
    }
    player.vel_y = player
        .vel_y
        .clamp(-tuning.ship_max_speed, tuning.ship_max_speed);
    player.pos.y += player.vel_y * dt;
    // Bank with vertical speed
    player.angle = player.vel_y * 0.1;
}

/// Returns true if a hop executed
fn step_ufo(player: &mut Player, jump: &mut JumpBuffer, tuning: &Tuning, dt: f32) -> bool {
    player.vel_y += tuning.gravity * dt;
    // No ground requirement
    let jumped = jump.is_active();
    if jumped {
        player.launch(tuning.ufo_jump_force, 1.0);
        jump.consume();
    }
    player.pos.y += player.vel_y * dt;
    player.angle = if player.vel_y < 0.0 { -0.2 } else { 0.1 };
    jumped
}

fn step_wave(player: &mut Player, held: bool, tuning: &Tuning, dt: f32) {
    player.vel_y = if held {
        -tuning.wave_speed
    } else {
        tuning.wave_speed
    };
    player.pos.y += player.vel_y * dt;
    player.angle = if player.vel_y < 0.0 {
        -FRAC_PI_4
    } else {
        FRAC_PI_4
    };
    player.record_trail();
}

/// Clamp to the playfield; the surface gravity points at becomes ground
fn resolve_bounds(player: &mut Player, mode: Mode, gravity_sign: f32, floor: f32) {
    player.on_ground = false;

    if player.pos.y + player.size.y > floor {
        player.pos.y = floor - player.size.y;
        if mode == Mode::Wave {
            player.angle = 0.0;
        } else {
            player.vel_y = 0.0;
        }
        player.on_ground = gravity_sign > 0.0;
    }

    if player.pos.y < 0.0 {
        player.pos.y = 0.0;
        if mode == Mode::Wave {
            player.angle = 0.0;
        } else if player.vel_y < 0.0 {
            player.vel_y = 0.0;
        }
        player.on_ground = gravity_sign < 0.0;
    }
}
