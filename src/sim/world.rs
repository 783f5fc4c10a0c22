//! World: the single owner of all simulation state
//!
//! Entities, one sector grid per layer, the tile map, the global command
//! queue and the settings all live here and are passed explicitly.

use std::collections::BTreeMap;

use glam::{IVec2, Vec2};

use super::entity::{Entity, EntityId};
use super::geometry::Sweep;
use super::kinds::{ObjectKind, ThinkContext, think_object, think_tile};
use super::map::{Tile, TileMap};
use super::sector::SectorGrid;
use super::signal::{Command, Signal, SignalQueue};
use crate::error::WorldError;
use crate::settings::CollisionSettings;

/// What one command commit did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub spawned: usize,
    pub killed: usize,
}

#[derive(Debug)]
pub struct World {
    settings: CollisionSettings,
    map: TileMap,
    /// Ordered by id, which is creation order
    entities: BTreeMap<EntityId, Entity>,
    /// One per map layer
    sectors: Vec<SectorGrid>,
    commands: SignalQueue<Command>,
    next_id: u32,
}

impl World {
    /// Build a world over `map`. The map's tile size must match the settings.
    pub fn new(map: TileMap, settings: CollisionSettings) -> Result<Self, WorldError> {
        settings.validate()?;
        if map.tile_size() != settings.tile_size {
            return Err(WorldError::InvalidSettings(format!(
                "map tile size {} does not match settings tile size {}",
                map.tile_size(),
                settings.tile_size
            )));
        }

        let sectors = map
            .layers()
            .iter()
            .map(|l| SectorGrid::new(l.size() * map.tile_size(), settings.sector_size))
            .collect::<Vec<_>>();

        log::info!(
            "World created: {} layers, sector grids {:?}",
            map.layer_count(),
            sectors.iter().map(|g| g.dims()).collect::<Vec<_>>()
        );

        Ok(Self {
            settings,
            map,
            entities: BTreeMap::new(),
            sectors,
            commands: SignalQueue::new(),
            next_id: 1,
        })
    }

    pub fn settings(&self) -> &CollisionSettings {
        &self.settings
    }

    pub fn map(&self) -> &TileMap {
        &self.map
    }

    /// Tiles can be changed in place; the layer layout cannot
    pub fn tile_mut(&mut self, layer: usize, cell: IVec2) -> Option<&mut Tile> {
        self.map.tile_mut(layer, cell)
    }

    /// Timestep and rounding bias for a collision sweep of `dt` seconds
    pub fn sweep(&self, dt: f32) -> Sweep {
        Sweep::new(dt, self.settings.sweep_epsilon)
    }

    pub fn sector_grid(&self, layer: usize) -> Option<&SectorGrid> {
        self.sectors.get(layer)
    }

    // === Entities ===

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Position and layer stay read-only through this; use
    /// [`World::set_position`] to move an entity.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Live entities by id
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Snapshot of the current ids, safe to iterate while mutating the world
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Commands waiting for the next commit
    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Queue a new entity. The id is valid immediately but the entity only
    /// appears at the next commit.
    pub fn spawn(
        &mut self,
        kind: ObjectKind,
        layer: usize,
        pos: IVec2,
        vel: Vec2,
    ) -> Result<EntityId, WorldError> {
        let extent = self.map.real_extent(layer).ok_or(WorldError::LayerOutOfRange {
            layer,
            count: self.map.layer_count(),
        })?;
        if pos.x < 0 || pos.y < 0 || pos.x >= extent.x || pos.y >= extent.y {
            return Err(WorldError::OutOfBounds {
                what: "spawn position",
                pos,
                layer,
                extent,
            });
        }

        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.commands
            .push(Command::Spawn(Box::new(Entity::new(id, kind, layer, pos, vel))));
        log::debug!("Queued spawn of {} {:?} at {} on layer {}", kind.name(), id, pos, layer);
        Ok(id)
    }

    /// Request removal at the next commit. Repeated requests are ignored.
    pub fn kill(&mut self, id: EntityId) -> Result<(), WorldError> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(WorldError::UnknownEntity(id))?;
        entity.kill(&mut self.commands);
        Ok(())
    }

    /// Apply queued spawns and kills in order
    pub fn apply_commands(&mut self) -> CommitSummary {
        let mut summary = CommitSummary::default();
        while let Some(command) = self.commands.poll() {
            match command {
                Command::Spawn(entity) => {
                    let (id, layer, pos) = (entity.id, entity.layer(), entity.pos());
                    if let Some(grid) = self.sectors.get_mut(layer) {
                        grid.insert(id, pos);
                    }
                    self.entities.insert(id, *entity);
                    summary.spawned += 1;
                }
                Command::Kill(id) => match self.entities.remove(&id) {
                    Some(entity) => {
                        if let Some(grid) = self.sectors.get_mut(entity.layer()) {
                            grid.remove(id, entity.pos());
                        }
                        log::debug!("Removed {} {:?}", entity.kind.name(), id);
                        summary.killed += 1;
                    }
                    None => log::debug!("Kill for {:?} ignored, already gone", id),
                },
            }
        }
        summary
    }

    /// Move an entity, keeping its sector membership in step
    pub fn set_position(&mut self, id: EntityId, pos: IVec2) -> Result<(), WorldError> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(WorldError::UnknownEntity(id))?;
        if let Some(grid) = self.sectors.get_mut(entity.layer()) {
            grid.relocate(id, entity.pos(), pos);
        }
        entity.set_pos_unchecked(pos);
        Ok(())
    }

    pub fn set_velocity(&mut self, id: EntityId, vel: Vec2) -> Result<(), WorldError> {
        self.entities
            .get_mut(&id)
            .ok_or(WorldError::UnknownEntity(id))?
            .vel = vel;
        Ok(())
    }

    /// Queue a signal on an entity; false if it does not exist
    pub fn send_signal(&mut self, id: EntityId, signal: Signal) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.send(signal);
                true
            }
            None => false,
        }
    }

    /// Queue a signal on a tile; false unless the tile exists and is active
    pub fn send_tile_signal(&mut self, layer: usize, cell: IVec2, signal: Signal) -> bool {
        self.map.send_signal(layer, cell, signal)
    }

    // === Think ===

    /// Let every active tile drain its signals
    pub fn think_tiles(&mut self) {
        for tile in self.map.active_tiles_mut() {
            think_tile(tile);
        }
    }

    /// Let every entity drain its signals and act, in id order
    pub fn think_entities(&mut self, dt: f32) {
        let mut ctx = ThinkContext {
            dt,
            gravity: self.settings.gravity,
            commands: &mut self.commands,
        };
        for entity in self.entities.values_mut() {
            think_object(entity, &mut ctx);
        }
    }

    /// Apply pending commands, then drop every entity
    pub fn teardown(&mut self) {
        let summary = self.apply_commands();
        let count = self.entities.len();
        self.entities.clear();
        for grid in &mut self.sectors {
            grid.clear();
        }
        log::info!(
            "World torn down: {} entities dropped ({} spawned, {} killed at teardown)",
            count,
            summary.spawned,
            summary.killed
        );
    }
}
