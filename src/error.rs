//! Error types for world construction and configuration

use glam::IVec2;

use crate::sim::EntityId;

/// Errors returned by the world, map and settings APIs.
///
/// Per-frame collision work never fails; it reports through logs and
/// empty results instead.
#[derive(thiserror::Error, Debug)]
pub enum WorldError {
    /// Layer index past the end of the map
    #[error("layer {layer} out of range (map has {count} layers)")]
    LayerOutOfRange { layer: usize, count: usize },

    /// Position or cell outside a layer
    #[error("{what} {pos} is outside layer {layer} (extent {extent})")]
    OutOfBounds {
        what: &'static str,
        pos: IVec2,
        layer: usize,
        extent: IVec2,
    },

    /// No live entity has this id
    #[error("unknown entity {0:?}")]
    UnknownEntity(EntityId),

    /// Settings that would make the world unusable
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Malformed settings JSON
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Settings file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
