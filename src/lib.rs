//! Tile Collide - swept collision detection and response for tile worlds
//!
//! Core modules:
//! - `sim`: Geometry, sector index, collision detection/response, tick
//! - `settings`: Data-driven collision tuning
//! - `error`: Construction and API misuse errors
//! - `scene`: Seeded demo scene used by the binary

pub mod error;
pub mod scene;
pub mod settings;
pub mod sim;

pub use error::WorldError;
pub use settings::CollisionSettings;
pub use sim::{World, tick};

/// Engine configuration constants
pub mod consts {
    /// Tile dimensions in world units
    pub const TILE_W: i32 = 32;
    pub const TILE_H: i32 = 32;

    /// Sector grid cell dimensions
    pub const SECTOR_W: i32 = 300;
    pub const SECTOR_H: i32 = 150;
    /// Sectors searched on each side of the entity's own sector
    pub const SECTOR_RANGE_X: i32 = 2;
    pub const SECTOR_RANGE_Y: i32 = 2;

    /// Responses allowed per entity per pass before giving up
    pub const MAX_RESOLUTION_LOOPS: u32 = 15;
    /// Extra distance added to sweep travel before rounding
    pub const SWEEP_EPSILON: f32 = 1.0;

    /// Downward acceleration for kinds that fall (units/s²)
    pub const GRAVITY: f32 = 1000.0;
    /// Longest step a single tick will integrate
    pub const MAX_DT: f32 = 0.01;
    /// Fixed step used by the demo binary
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Fine position units per world unit
    pub const FINE_SCALE: i32 = 1000;
}
