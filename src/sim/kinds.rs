//! Object and tile kinds
//!
//! Each kind has a static definition table and a `think` routine that drains
//! the receiver's signal queue once per tick. The set of kinds is closed.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::boundary::Boundary;
use super::entity::Entity;
use super::map::Tile;
use super::signal::{Command, HitTarget, Signal, SignalQueue};

/// Hitpoints a baddie starts with
pub const BADDIE_HITPOINTS: i32 = 30;
/// Damage a baddie takes from one bullet
pub const BULLET_DAMAGE: i32 = 15;

/// Outward-facing edges of a 40x40 box: bottom, left, right, top
const BADDIE_BOUNDS: [Boundary; 4] = [
    Boundary::line(40, 40, 0, 40),
    Boundary::line(0, 40, 0, 0),
    Boundary::line(40, 0, 40, 40),
    Boundary::line(0, 0, 40, 0),
];

const BULLET_BOUNDS: [Boundary; 1] = [Boundary::rect(0, 0, 9, 6)];

const SENSOR_BOUNDS: [Boundary; 1] = [Boundary::rect(0, 0, 16, 16)];

/// Static properties shared by every object of a kind
#[derive(Debug, Clone, Copy)]
pub struct ObjectDef {
    pub mass: i32,
    pub size: IVec2,
    pub elasticity: f32,
    pub solid: bool,
    /// Local-space boundaries, origin at the top left corner
    pub bounds: &'static [Boundary],
}

/// Static properties shared by every tile of a kind
#[derive(Debug, Clone, Copy)]
pub struct TileDef {
    pub solid: bool,
    /// Active tiles receive signals and think every tick
    pub active: bool,
}

static BADDIE_DEF: ObjectDef = ObjectDef {
    mass: 1,
    size: IVec2::new(40, 40),
    elasticity: 1.0,
    solid: true,
    bounds: &BADDIE_BOUNDS,
};

static BULLET_DEF: ObjectDef = ObjectDef {
    mass: 1,
    size: IVec2::new(9, 6),
    elasticity: 0.0,
    solid: true,
    bounds: &BULLET_BOUNDS,
};

static SENSOR_DEF: ObjectDef = ObjectDef {
    mass: 1,
    size: IVec2::new(16, 16),
    elasticity: 0.0,
    solid: false,
    bounds: &SENSOR_BOUNDS,
};

static PLAIN_DEF: TileDef = TileDef {
    solid: true,
    active: false,
};

static TRIGGER_DEF: TileDef = TileDef {
    solid: false,
    active: true,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Falls under gravity, dies after two bullet hits
    Baddie,
    /// Dies on the first thing it hits
    Bullet,
    /// Passes through everything, counting what it touches
    Sensor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Solid scenery that does nothing
    Plain,
    /// Non-solid, counts what passes through it
    Trigger,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 3] = [ObjectKind::Baddie, ObjectKind::Bullet, ObjectKind::Sensor];

    pub fn def(self) -> &'static ObjectDef {
        match self {
            ObjectKind::Baddie => &BADDIE_DEF,
            ObjectKind::Bullet => &BULLET_DEF,
            ObjectKind::Sensor => &SENSOR_DEF,
        }
    }

    /// Fresh per-object state
    pub fn initial_state(self) -> KindState {
        match self {
            ObjectKind::Baddie => KindState::Baddie {
                hitpoints: BADDIE_HITPOINTS,
            },
            ObjectKind::Bullet => KindState::Bullet,
            ObjectKind::Sensor => KindState::Sensor { hits: 0 },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Baddie => "baddie",
            ObjectKind::Bullet => "bullet",
            ObjectKind::Sensor => "sensor",
        }
    }
}

impl TileKind {
    pub fn def(self) -> &'static TileDef {
        match self {
            TileKind::Plain => &PLAIN_DEF,
            TileKind::Trigger => &TRIGGER_DEF,
        }
    }

    pub fn initial_state(self) -> TileState {
        match self {
            TileKind::Plain => TileState::Inert,
            TileKind::Trigger => TileState::Trigger { hits: 0 },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TileKind::Plain => "plain",
            TileKind::Trigger => "trigger",
        }
    }
}

/// Per-object mutable state owned by the kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KindState {
    Baddie { hitpoints: i32 },
    Bullet,
    Sensor { hits: u32 },
}

/// Per-tile mutable state owned by the kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileState {
    Inert,
    Trigger { hits: u32 },
}

/// What a think routine may touch besides its own receiver
pub struct ThinkContext<'a> {
    pub dt: f32,
    pub gravity: f32,
    pub commands: &'a mut SignalQueue<Command>,
}

/// Drain an object's signals and run its per-tick behavior
pub fn think_object(entity: &mut Entity, ctx: &mut ThinkContext<'_>) {
    let signals: Vec<Signal> = entity.signals.drain().collect();
    match entity.kind {
        ObjectKind::Baddie => {
            for signal in signals {
                if let Signal::Hit(HitTarget::Object(ObjectKind::Bullet)) = signal {
                    damage(entity, BULLET_DAMAGE, ctx.commands);
                }
            }
            // Fall
            entity.vel += Vec2::new(0.0, ctx.gravity * ctx.dt);
        }
        ObjectKind::Bullet => {
            let hit_something = signals.iter().any(|s| {
                matches!(
                    s,
                    Signal::Hit(HitTarget::Object(_)) | Signal::Hit(HitTarget::Tile(TileKind::Plain))
                )
            });
            if hit_something {
                entity.kill(ctx.commands);
            }
        }
        ObjectKind::Sensor => {
            let hits = signals.iter().filter(|s| matches!(s, Signal::Hit(_))).count() as u32;
            if let KindState::Sensor { hits: total } = &mut entity.state {
                *total += hits;
            }
        }
    }
}

fn damage(entity: &mut Entity, amount: i32, commands: &mut SignalQueue<Command>) {
    if let KindState::Baddie { hitpoints } = &mut entity.state {
        *hitpoints -= amount;
        if *hitpoints <= 0 {
            log::debug!("{:?} destroyed", entity.id);
            entity.kill(commands);
        } else {
            log::debug!("{:?} hit, {} hitpoints left", entity.id, hitpoints);
        }
    }
}

/// Drain an active tile's signals
pub fn think_tile(tile: &mut Tile) {
    let hits = tile
        .signals
        .drain()
        .filter(|s| matches!(s, Signal::Hit(_)))
        .count() as u32;
    if let TileState::Trigger { hits: total } = &mut tile.state {
        *total += hits;
    }
}
