//! Per-entity collision processing
//!
//! Each moving entity gets a tile pass and then an object pass. A pass
//! notifies every participant of every collision, then resolves solid
//! collisions one at a time, re-querying after each, until none remain or
//! the loop cap is hit.

use super::detect::{Collision, Target};
use super::entity::EntityId;
use super::geometry::Sweep;
use super::query::{list_object_collisions, list_tile_collisions};
use super::response::{find_solid_collision, respond};
use super::signal::{HitTarget, Signal};
use super::world::World;

/// Outcome of one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Collisions found by the first query, each of which sent hit signals
    pub hits: usize,
    /// Responses applied
    pub responses: u32,
    /// True if the pass stopped on the loop cap with solid collisions left
    pub exhausted: bool,
}

/// Outcome of both passes for one entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub tiles: ResolutionReport,
    pub objects: ResolutionReport,
}

impl CollisionReport {
    pub fn hits(&self) -> usize {
        self.tiles.hits + self.objects.hits
    }

    pub fn responses(&self) -> u32 {
        self.tiles.responses + self.objects.responses
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Tiles,
    Objects,
}

impl Pass {
    fn query(self, world: &World, id: EntityId, sweep: &Sweep) -> Vec<Collision> {
        match self {
            Pass::Tiles => list_tile_collisions(world, id, sweep),
            Pass::Objects => list_object_collisions(world, id, sweep),
        }
    }
}

/// Detect, notify and resolve collisions for one entity this step
pub fn process_collisions(world: &mut World, id: EntityId, dt: f32) -> CollisionReport {
    let sweep = world.sweep(dt);
    CollisionReport {
        tiles: run_pass(world, id, &sweep, Pass::Tiles),
        objects: run_pass(world, id, &sweep, Pass::Objects),
    }
}

fn run_pass(world: &mut World, id: EntityId, sweep: &Sweep, pass: Pass) -> ResolutionReport {
    let mut report = ResolutionReport::default();
    match world.entity(id) {
        Some(e) if e.vel != glam::Vec2::ZERO => {}
        _ => return report,
    }

    let mut collisions = pass.query(world, id, sweep);
    report.hits = collisions.len();
    for c in &collisions {
        send_hits(world, id, c);
    }

    let cap = world.settings().max_resolution_loops;
    loop {
        let Some(solid) = find_solid_collision(world, id, &collisions).copied() else {
            break;
        };
        if report.responses >= cap {
            report.exhausted = true;
            log::debug!(
                "{:?}: {:?} pass gave up after {} responses",
                id,
                pass,
                report.responses
            );
            break;
        }
        respond(world, id, &solid, sweep);
        report.responses += 1;
        collisions = pass.query(world, id, sweep);
    }

    report
}

/// Tell both sides of a collision about it
fn send_hits(world: &mut World, id: EntityId, collision: &Collision) {
    let Some(me) = world.entity(id) else {
        return;
    };
    let (kind, layer) = (me.kind, me.layer());

    match collision.other {
        Target::Object(other) => {
            let Some(other_kind) = world.entity(other).map(|o| o.kind) else {
                return;
            };
            world.send_signal(id, Signal::Hit(HitTarget::Object(other_kind)));
            world.send_signal(other, Signal::Hit(HitTarget::Object(kind)));
        }
        Target::Tile(cell) => {
            let Some(tile_kind) = world.map().tile(layer, cell).map(|t| t.kind) else {
                return;
            };
            world.send_signal(id, Signal::Hit(HitTarget::Tile(tile_kind)));
            world.send_tile_signal(layer, cell, Signal::Hit(HitTarget::Object(kind)));
        }
    }
}
