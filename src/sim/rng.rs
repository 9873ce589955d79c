//! Level-seeded spawn RNG
//!
//! A 32-bit linear congruential generator. Only the spawner draws from it, so
//! a level always produces the same obstacle sequence regardless of frame timing.

use serde::{Deserialize, Serialize};

const LCG_A: u32 = 1_664_525;
const LCG_C: u32 = 1_013_904_223;
/// 2^32
const LCG_M: f64 = 4_294_967_296.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRng {
    state: u32,
}

impl SpawnRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Internal state (after the most recent draw)
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Next value in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        self.state = self.state.wrapping_mul(LCG_A).wrapping_add(LCG_C);
        // Narrowing can round values just below 1.0 up to 1.0
        ((self.state as f64 / LCG_M) as f32).min(1.0 - f32::EPSILON)
    }
}
