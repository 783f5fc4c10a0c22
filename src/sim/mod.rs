//! Collision simulation module
//!
//! Everything that moves, collides and reacts lives here. The step is
//! deterministic:
//! - Caller-supplied timestep, clamped to the configured maximum
//! - Stable iteration order (by entity ID)
//! - Structural changes deferred to the command queue
//! - No rendering or platform dependencies

pub mod boundary;
pub mod detect;
pub mod driver;
pub mod entity;
pub mod geometry;
pub mod kinds;
pub mod map;
pub mod query;
pub mod response;
pub mod sector;
pub mod signal;
pub mod tick;
pub mod world;

pub use boundary::{Body, Boundary};
pub use detect::{Collision, SweptEndpoint, Target, test_collision};
pub use driver::{CollisionReport, ResolutionReport, process_collisions};
pub use entity::{Entity, EntityId};
pub use geometry::{Circle, Line, Rect, Sweep};
pub use kinds::{KindState, ObjectKind, TileKind, TileState};
pub use map::{Layer, Tile, TileMap};
pub use query::{list_all_collisions, list_object_collisions, list_tile_collisions};
pub use response::{find_solid_collision, respond};
pub use sector::SectorGrid;
pub use signal::{Command, HitTarget, Signal, SignalQueue};
pub use tick::{TickSummary, move_entity, tick};
pub use world::{CommitSummary, World};
