//! Live obstacles, platforms, orbs, pads and portals
//!
//! Entities are kept in insertion order. The spawner only inserts, physics only
//! scrolls, collision only flips `used`/`triggered` flags.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::level::ModeTarget;

/// Axis-aligned box, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap; touching edges don't count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Reflect vertically across the band [0, floor]
    pub fn mirrored(&self, floor: f32) -> Rect {
        Rect {
            pos: Vec2::new(self.pos.x, floor - self.bottom()),
            size: self.size,
        }
    }
}

/// Orb colours, weakest to strongest boost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbType {
    Yellow,
    Blue,
    Red,
}

impl OrbType {
    /// Impulse as a multiple of the standard jump force
    pub fn boost(self) -> f32 {
        use crate::consts::{BLUE_ORB_BOOST, RED_ORB_BOOST};
        match self {
            OrbType::Yellow => 1.0,
            OrbType::Blue => BLUE_ORB_BOOST,
            OrbType::Red => RED_ORB_BOOST,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Triangle hazard; `flipped` hangs from the ceiling
    Spike { flipped: bool },
    /// Solid top you can land on; lethal from the side or below
    Platform,
    /// Solid lethal block
    Pillar,
    Orb { orb: OrbType, used: bool },
    JumpPad { triggered: bool },
    Portal { target: ModeTarget, triggered: bool },
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Spike { .. } => "spike",
            EntityKind::Platform => "platform",
            EntityKind::Pillar => "pillar",
            EntityKind::Orb { .. } => "orb",
            EntityKind::JumpPad { .. } => "pad",
            EntityKind::Portal { .. } => "portal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub rect: Rect,
}

/// Insertion-ordered entity store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    next_id: u32,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Add an entity, returning its id
    pub fn insert(&mut self, kind: EntityKind, rect: Rect) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.push(Entity { id, kind, rect });
        id
    }

    pub fn get(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    /// Move every entity left by `dx`
    pub fn scroll(&mut self, dx: f32) {
        for entity in &mut self.entities {
            entity.rect.pos.x -= dx;
        }
    }

    /// Drop entities fully past the left edge of the viewport; returns how many
    pub fn prune_offscreen(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| e.rect.right() >= 0.0);
        before - self.entities.len()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}
