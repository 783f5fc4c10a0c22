//! Collision engine settings
//!
//! Loaded from JSON by the demo binary; everything has a default.

use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::WorldError;

/// Tunables for the world, the sector index and the resolution loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionSettings {
    /// Tile dimensions in world units
    pub tile_size: IVec2,
    /// Sector cell dimensions in world units
    pub sector_size: IVec2,
    /// How many sectors on each side of an entity's own sector are searched
    pub sector_range: IVec2,
    /// Responses allowed per collision pass before giving up
    pub max_resolution_loops: u32,
    /// Rounding bias applied to swept travel
    pub sweep_epsilon: f32,
    /// Downward acceleration applied by falling kinds (units/s²)
    pub gravity: f32,
    /// Longest step a single tick will simulate (seconds)
    pub max_dt: f32,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            tile_size: IVec2::new(TILE_W, TILE_H),
            sector_size: IVec2::new(SECTOR_W, SECTOR_H),
            sector_range: IVec2::new(SECTOR_RANGE_X, SECTOR_RANGE_Y),
            max_resolution_loops: MAX_RESOLUTION_LOOPS,
            sweep_epsilon: SWEEP_EPSILON,
            gravity: GRAVITY,
            max_dt: MAX_DT,
        }
    }
}

impl CollisionSettings {
    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self, WorldError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, WorldError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorldError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), WorldError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Reject values the world cannot be built with
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.tile_size.x <= 0 || self.tile_size.y <= 0 {
            return Err(WorldError::InvalidSettings(format!(
                "tile size must be positive, got {}",
                self.tile_size
            )));
        }
        if self.sector_size.x <= 0 || self.sector_size.y <= 0 {
            return Err(WorldError::InvalidSettings(format!(
                "sector size must be positive, got {}",
                self.sector_size
            )));
        }
        if self.sector_range.x < 0 || self.sector_range.y < 0 {
            return Err(WorldError::InvalidSettings(format!(
                "sector range must not be negative, got {}",
                self.sector_range
            )));
        }
        if !(self.sweep_epsilon.is_finite() && self.sweep_epsilon >= 0.0) {
            return Err(WorldError::InvalidSettings(format!(
                "sweep epsilon must be a non-negative number, got {}",
                self.sweep_epsilon
            )));
        }
        if !(self.max_dt.is_finite() && self.max_dt > 0.0) {
            return Err(WorldError::InvalidSettings(format!(
                "max dt must be positive, got {}",
                self.max_dt
            )));
        }
        Ok(())
    }
}
