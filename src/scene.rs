//! Demo scene
//!
//! A single walled layer with a floor, a few platforms and trigger tiles,
//! populated with falling baddies, bullets flying across it and a sensor.
//! The same seed always builds the same scene.

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::error::WorldError;
use crate::settings::CollisionSettings;
use crate::sim::{EntityId, ObjectKind, TileKind, TileMap, World};

/// What to put in the demo scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub seed: u64,
    /// Layer size in cells
    pub size: IVec2,
    pub baddies: usize,
    pub bullets: usize,
    pub platforms: usize,
    pub triggers: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            size: IVec2::new(40, 12),
            baddies: 6,
            bullets: 10,
            platforms: 3,
            triggers: 4,
        }
    }
}

/// Lay out the tiles: walls on both sides, a floor, platforms and triggers
fn build_map(config: &SceneConfig, tile_size: IVec2, rng: &mut Pcg32) -> Result<TileMap, WorldError> {
    if config.size.x < 8 || config.size.y < 8 {
        return Err(WorldError::InvalidSettings(format!(
            "scene must be at least 8x8 cells, got {}",
            config.size
        )));
    }

    let mut map = TileMap::new(tile_size);
    let layer = map.add_layer(config.size);
    let last = config.size - IVec2::ONE;

    map.fill(layer, IVec2::new(0, last.y), last, TileKind::Plain)?;
    map.fill(layer, IVec2::ZERO, IVec2::new(0, last.y), TileKind::Plain)?;
    map.fill(layer, IVec2::new(last.x, 0), last, TileKind::Plain)?;

    // Platforms sit on the middle row, below the spawn band
    let row = config.size.y / 2;
    for _ in 0..config.platforms {
        let start = rng.random_range(2..last.x - 5);
        let len = rng.random_range(2..5);
        map.fill(layer, IVec2::new(start, row), IVec2::new(start + len, row), TileKind::Plain)?;
    }

    for _ in 0..config.triggers {
        let cell = IVec2::new(rng.random_range(1..last.x), last.y - 1);
        map.place(layer, cell, TileKind::Trigger)?;
    }

    Ok(map)
}

/// Build the world and spawn its population. Entities are committed before
/// returning.
pub fn build_scene(config: &SceneConfig, settings: CollisionSettings) -> Result<World, WorldError> {
    let mut rng = Pcg32::seed_from_u64(config.seed);
    let map = build_map(config, settings.tile_size, &mut rng)?;
    let triggers = trigger_cells(&map).len();
    let tile = settings.tile_size;
    let mut world = World::new(map, settings)?;

    // Spawn band: between the walls, above the platform row
    let min_x = tile.x * 2;
    let max_x = tile.x * (config.size.x - 2);
    let band_top = tile.y + 20;
    let band_bottom = tile.y * (config.size.y / 2) - 20;

    for _ in 0..config.baddies {
        let pos = IVec2::new(rng.random_range(min_x..max_x), band_top);
        let vel = Vec2::new(rng.random_range(-100.0..100.0), 0.0);
        world.spawn(ObjectKind::Baddie, 0, pos, vel)?;
    }

    for _ in 0..config.bullets {
        let pos = IVec2::new(
            rng.random_range(min_x..max_x),
            rng.random_range(band_top..band_bottom.max(band_top + 1)),
        );
        let speed = rng.random_range(300.0..600.0);
        let dir = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        world.spawn(ObjectKind::Bullet, 0, pos, Vec2::new(speed * dir, 0.0))?;
    }

    // One sensor sweeping the floor
    let floor_y = tile.y * (config.size.y - 1) - 9;
    world.spawn(ObjectKind::Sensor, 0, IVec2::new(min_x, floor_y), Vec2::new(200.0, 0.0))?;

    let commit = world.apply_commands();
    log::info!(
        "Scene built with seed {:#x}: {} entities, {} triggers on a {} cell layer",
        config.seed,
        commit.spawned,
        triggers,
        config.size
    );
    Ok(world)
}

/// Cells of layer 0 holding trigger tiles, row by row
pub fn trigger_cells(map: &TileMap) -> Vec<IVec2> {
    map.layer(0)
        .map(|l| {
            l.occupied()
                .filter(|(_, t)| t.kind == TileKind::Trigger)
                .map(|(cell, _)| cell)
                .collect()
        })
        .unwrap_or_default()
}

/// Ids of the live entities of `kind`
pub fn census(world: &World, kind: ObjectKind) -> Vec<EntityId> {
    world
        .entities()
        .filter(|e| e.kind == kind)
        .map(|e| e.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_population() {
        let config = SceneConfig::default();
        let world = build_scene(&config, CollisionSettings::default()).unwrap();
        assert_eq!(census(&world, ObjectKind::Baddie).len(), config.baddies);
        assert_eq!(census(&world, ObjectKind::Bullet).len(), config.bullets);
        assert_eq!(census(&world, ObjectKind::Sensor).len(), 1);
        assert_eq!(world.pending_commands(), 0);
    }

    #[test]
    fn test_scene_is_walled() {
        let config = SceneConfig::default();
        let world = build_scene(&config, CollisionSettings::default()).unwrap();
        let last = config.size - IVec2::ONE;
        for y in 0..config.size.y {
            assert!(world.map().tile(0, IVec2::new(0, y)).is_some());
            assert!(world.map().tile(0, IVec2::new(last.x, y)).is_some());
        }
        for x in 0..config.size.x {
            assert_eq!(
                world.map().tile(0, IVec2::new(x, last.y)).map(|t| t.kind),
                Some(TileKind::Plain)
            );
        }
    }

    #[test]
    fn test_triggers_sit_above_the_floor() {
        let config = SceneConfig::default();
        let world = build_scene(&config, CollisionSettings::default()).unwrap();
        let cells = trigger_cells(world.map());
        // Placements may land on the same cell
        assert!(!cells.is_empty() && cells.len() <= config.triggers);
        assert!(cells.iter().all(|c| c.y == config.size.y - 2));
    }

    #[test]
    fn test_same_seed_same_scene() {
        let config = SceneConfig::default();
        let a = build_scene(&config, CollisionSettings::default()).unwrap();
        let b = build_scene(&config, CollisionSettings::default()).unwrap();
        let positions = |w: &World| w.entities().map(|e| (e.pos(), e.vel)).collect::<Vec<_>>();
        assert_eq!(positions(&a), positions(&b));
    }

    #[test]
    fn test_tiny_scene_rejected() {
        let config = SceneConfig {
            size: IVec2::new(4, 4),
            ..SceneConfig::default()
        };
        assert!(matches!(
            build_scene(&config, CollisionSettings::default()),
            Err(WorldError::InvalidSettings(_))
        ));
    }
}
