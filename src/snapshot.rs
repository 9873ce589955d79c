//! Read-only views for the renderer
//!
//! Built once per frame from the session. Nothing here is fed back into the
//! simulation; the renderer may serialize it straight to JS.

use glam::Vec2;
use serde::Serialize;

use crate::effects::Particle;
use crate::level::{Difficulty, Level, PlatformStyle};
use crate::sim::{Entity, EntityKind, GamePhase, Mode, OrbType, SimulationState};

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub size: Vec2,
    pub angle: f32,
    pub on_ground: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityView {
    pub id: u32,
    pub kind: &'static str,
    pub pos: Vec2,
    pub size: Vec2,
    /// Kind-specific detail (orb colour, portal target, spike orientation)
    pub variant: Option<&'static str>,
    /// Orb used or pad/portal triggered
    pub spent: bool,
}

impl From<&Entity> for EntityView {
    fn from(entity: &Entity) -> Self {
        let (variant, spent) = match entity.kind {
            EntityKind::Spike { flipped } => (Some(if flipped { "down" } else { "up" }), false),
            EntityKind::Platform | EntityKind::Pillar => (None, false),
            EntityKind::Orb { orb, used } => {
                let colour = match orb {
                    OrbType::Yellow => "yellow",
                    OrbType::Blue => "blue",
                    OrbType::Red => "red",
                };
                (Some(colour), used)
            }
            EntityKind::JumpPad { triggered } => (None, triggered),
            EntityKind::Portal { target, triggered } => (Some(target.as_str()), triggered),
        };
        Self {
            id: entity.id,
            kind: entity.kind.name(),
            pos: entity.rect.pos,
            size: entity.rect.size,
            variant,
            spent,
        }
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub level_index: Option<usize>,
    pub level_name: Option<String>,
    /// Background hue in degrees
    pub hue: f32,
    pub platform_style: PlatformStyle,
    pub viewport: Vec2,
    pub floor_y: f32,
    pub mode: Mode,
    pub upside_down: bool,
    pub score: u32,
    pub progress: u32,
    pub player: Option<PlayerView>,
    pub entities: Vec<EntityView>,
    /// Wave trail, oldest first
    pub trail: Vec<Vec2>,
    pub particles: Vec<Particle>,
}

impl Snapshot {
    /// Menu frame: no run loaded
    pub fn menu(viewport: Vec2, floor_y: f32) -> Self {
        Self {
            phase: GamePhase::Menu,
            level_index: None,
            level_name: None,
            hue: 0.0,
            platform_style: PlatformStyle::default(),
            viewport,
            floor_y,
            mode: Mode::Cube,
            upside_down: false,
            score: 0,
            progress: 0,
            player: None,
            entities: Vec::new(),
            trail: Vec::new(),
            particles: Vec::new(),
        }
    }

    /// Frame of a live (or finished) run
    pub fn capture(sim: &SimulationState, level: Option<&Level>, particles: &[Particle]) -> Self {
        let tuning = &sim.tuning;
        let player = sim.player.as_ref();
        Self {
            phase: sim.phase,
            level_index: Some(sim.level_index),
            level_name: level.map(|l| l.name.clone()),
            hue: level.map(|l| l.hue).unwrap_or(0.0),
            platform_style: level.map(|l| l.platform_style).unwrap_or_default(),
            viewport: Vec2::new(tuning.viewport_width, tuning.viewport_height),
            floor_y: tuning.floor_y(),
            mode: sim.mode,
            upside_down: sim.upside_down,
            score: sim.score,
            progress: sim.progress,
            player: player.map(|p| PlayerView {
                pos: p.pos,
                size: p.size,
                angle: p.angle,
                on_ground: p.on_ground,
            }),
            entities: sim.entities.iter().map(EntityView::from).collect(),
            trail: player
                .map(|p| p.trail.iter().copied().collect())
                .unwrap_or_default(),
            particles: particles.to_vec(),
        }
    }
}

/// One row of the level-select menu
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelSummary {
    pub index: usize,
    pub name: String,
    pub stars: u8,
    pub difficulty: Difficulty,
    pub best_percent: u32,
}
