//! Collision queries for one moving entity
//!
//! Objects are found through the sector grid, tiles through the entity's
//! bounding box. Both lists come back newest-found first.

use glam::IVec2;

use super::detect::{Collision, Target, test_collision};
use super::boundary::Body;
use super::entity::EntityId;
use super::geometry::Sweep;
use super::world::World;

/// Collisions with other entities in nearby sectors of the same layer
pub fn list_object_collisions(world: &World, id: EntityId, sweep: &Sweep) -> Vec<Collision> {
    let Some(entity) = world.entity(id) else {
        return Vec::new();
    };
    let Some(grid) = world.sector_grid(entity.layer()) else {
        return Vec::new();
    };

    let body = entity.body();
    let mut found = Vec::new();

    for other_id in grid.query_around(entity.pos(), world.settings().sector_range) {
        if other_id == id {
            continue;
        }
        let Some(other) = world.entity(other_id) else {
            continue;
        };
        if let Some(c) = test_collision(&body, &other.body(), Target::Object(other_id), sweep) {
            found.push(c);
        }
    }

    found.reverse();
    found
}

/// Collisions with tiles under the entity's bounding box
pub fn list_tile_collisions(world: &World, id: EntityId, sweep: &Sweep) -> Vec<Collision> {
    let Some(entity) = world.entity(id) else {
        return Vec::new();
    };
    let layer_index = entity.layer();
    let map = world.map();
    let Some(layer) = map.layer(layer_index) else {
        return Vec::new();
    };

    let body = entity.body();
    let last = layer.size() - IVec2::ONE;
    let lo = map.real_to_map(entity.top_left()).max(IVec2::ZERO);
    let hi = map.real_to_map(entity.bottom_right()).min(last);
    let mut found = Vec::new();

    for y in lo.y..=hi.y {
        for x in lo.x..=hi.x {
            let cell = IVec2::new(x, y);
            let Some(tile) = layer.tile(cell) else {
                continue;
            };
            let tile_body = Body::fixed(&tile.bounds, map.map_to_real(cell));
            if let Some(c) = test_collision(&body, &tile_body, Target::Tile(cell), sweep) {
                found.push(c);
            }
        }
    }

    found.reverse();
    found
}

/// Tile collisions followed by object collisions
pub fn list_all_collisions(world: &World, id: EntityId, sweep: &Sweep) -> Vec<Collision> {
    let mut all = list_tile_collisions(world, id, sweep);
    all.extend(list_object_collisions(world, id, sweep));
    all
}
