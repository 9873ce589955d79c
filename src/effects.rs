//! Cosmetic particles
//!
//! Uses its own unseeded generator so nothing here can disturb the spawn
//! sequence. The simulation never reads particle state.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

/// Particles released when the player dies
pub const DEATH_BURST_COUNT: usize = 50;

const MAX_SPEED: f32 = 5.0;
const MIN_SIZE: f32 = 4.0;
const SIZE_RANGE: f32 = 8.0;
const LIFE_DECAY: f32 = 0.05;
const SIZE_DECAY: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// 1.0 when spawned, gone at 0
    pub life: f32,
}

#[derive(Debug, Clone)]
pub struct Effects {
    rng: Pcg32,
    particles: Vec<Particle>,
}

impl Default for Effects {
    fn default() -> Self {
        Self::new()
    }
}

impl Effects {
    /// Generator seeded from the OS
    pub fn new() -> Self {
        Self::from_rng(Pcg32::from_rng(&mut rand::rng()))
    }

    /// Reproducible particles, for tests
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(Pcg32::seed_from_u64(seed))
    }

    fn from_rng(rng: Pcg32) -> Self {
        Self {
            rng,
            particles: Vec::with_capacity(DEATH_BURST_COUNT),
        }
    }

    /// Spray `count` particles from `center`
    pub fn burst(&mut self, center: Vec2, count: usize) {
        for _ in 0..count {
            let vel = Vec2::new(
                self.rng.random_range(-MAX_SPEED..MAX_SPEED),
                self.rng.random_range(-MAX_SPEED..MAX_SPEED),
            );
            let size = self.rng.random::<f32>() * SIZE_RANGE + MIN_SIZE;
            self.particles.push(Particle {
                pos: center,
                vel,
                size,
                life: 1.0,
            });
        }
    }

    /// Move and fade; drops spent particles
    pub fn update(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.pos += p.vel * dt;
            p.life -= LIFE_DECAY * dt;
            p.size -= SIZE_DECAY * dt;
        }
        self.particles.retain(|p| p.life > 0.0 && p.size > 0.0);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
