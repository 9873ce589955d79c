//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied `dt` only, no wall clock
//! - Seeded LCG only
//! - Stable iteration order (entity insertion order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod physics;
pub mod registry;
pub mod rng;
pub mod spawner;
pub mod state;
pub mod tick;

pub use registry::{Entity, EntityKind, EntityRegistry, OrbType, Rect};
pub use rng::SpawnRng;
pub use state::{GameEvent, GamePhase, JumpBuffer, Mode, Player, SimulationState};
pub use tick::{TickInput, tick};
