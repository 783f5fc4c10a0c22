//! Frame step
//!
//! Advances the world by one step in a fixed order: move everything, resolve
//! collisions for everything, let tiles and entities think, then apply the
//! spawns and kills they asked for.

use glam::Vec2;

use super::driver::process_collisions;
use super::entity::EntityId;
use super::world::World;
use crate::consts::FINE_SCALE;

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Entities whose position changed during integration
    pub moved: usize,
    /// Entities that found at least one collision
    pub collided: usize,
    /// Collision responses applied across all entities
    pub responses: u32,
    /// Entities whose resolution loop hit the cap
    pub exhausted: usize,
    pub spawned: usize,
    pub killed: usize,
}

/// Integrate one entity's velocity over `dt`.
///
/// Movement below one unit accumulates in the entity's fine position until it
/// adds up to a whole unit. Entities stop at the layer edges: the position is
/// clamped and the velocity component that pushed it out is zeroed. Returns
/// true if the position changed.
pub fn move_entity(world: &mut World, id: EntityId, dt: f32) -> bool {
    let Some(e) = world.entity(id) else {
        return false;
    };
    if e.vel == Vec2::ZERO {
        return false;
    }
    let Some(extent) = world.map().real_extent(e.layer()) else {
        return false;
    };

    let old = e.pos();
    let mut vel = e.vel;
    let mut fine = (e.fine.as_vec2() + e.vel * dt * FINE_SCALE as f32).as_ivec2();
    let mut pos = old + fine / FINE_SCALE;
    fine %= FINE_SCALE;

    if pos.x < 0 {
        pos.x = 0;
        vel.x = 0.0;
    } else if pos.x >= extent.x {
        pos.x = extent.x - 1;
        vel.x = 0.0;
    }
    if pos.y < 0 {
        pos.y = 0;
        vel.y = 0.0;
    } else if pos.y >= extent.y {
        pos.y = extent.y - 1;
        vel.y = 0.0;
    }

    if let Some(e) = world.entity_mut(id) {
        e.fine = fine;
        e.vel = vel;
    }
    world.set_position(id, pos).is_ok() && pos != old
}

/// Advance the world by `dt` seconds (clamped to the configured maximum)
pub fn tick(world: &mut World, dt: f32) -> TickSummary {
    let dt = dt.min(world.settings().max_dt).max(0.0);
    let ids = world.entity_ids();
    let mut summary = TickSummary::default();

    // All movement before any collision
    for &id in &ids {
        if move_entity(world, id, dt) {
            summary.moved += 1;
        }
    }

    for &id in &ids {
        let report = process_collisions(world, id, dt);
        if report.hits() > 0 {
            summary.collided += 1;
        }
        summary.responses += report.responses();
        if report.tiles.exhausted || report.objects.exhausted {
            summary.exhausted += 1;
        }
    }

    // All physics before any think
    world.think_tiles();
    world.think_entities(dt);

    let commit = world.apply_commands();
    summary.spawned = commit.spawned;
    summary.killed = commit.killed;

    if summary.spawned > 0 || summary.killed > 0 {
        log::debug!(
            "Tick: {} spawned, {} killed, {} live",
            summary.spawned,
            summary.killed,
            world.len()
        );
    }

    summary
}
