//! Boundary shapes attached to entities and tiles
//!
//! Boundaries are stored in local coordinates (origin at the owner's top
//! left corner) and only mapped into world coordinates when a pair is tested.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::geometry::{Circle, Line, Rect};

/// One collision shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Boundary {
    Line(Line),
    Rect(Rect),
    /// Accepted in boundary lists, never collided
    Circle(Circle),
}

impl Boundary {
    pub const fn line(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Boundary::Line(Line::new(IVec2::new(x1, y1), IVec2::new(x2, y2)))
    }

    pub const fn rect(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Boundary::Rect(Rect::new(IVec2::new(x1, y1), IVec2::new(x2, y2)))
    }

    /// Map this boundary into the frame whose origin is `offset`
    pub fn translated(&self, offset: IVec2) -> Self {
        match self {
            Boundary::Line(l) => Boundary::Line(l.translated(offset)),
            Boundary::Rect(r) => Boundary::Rect(r.translated(offset)),
            Boundary::Circle(c) => Boundary::Circle(Circle::new(c.center + offset, c.radius)),
        }
    }

    pub fn is_circle(&self) -> bool {
        matches!(self, Boundary::Circle(_))
    }

    /// Short name for log messages
    pub fn shape_name(&self) -> &'static str {
        match self {
            Boundary::Line(_) => "line",
            Boundary::Rect(_) => "rect",
            Boundary::Circle(_) => "circle",
        }
    }
}

/// A boundary list seen from one side of a collision test: where its local
/// origin sits in the world and how fast it moves.
#[derive(Debug, Clone, Copy)]
pub struct Body<'a> {
    pub bounds: &'a [Boundary],
    /// World position of the local origin (top left corner)
    pub origin: IVec2,
    pub velocity: Vec2,
}

impl<'a> Body<'a> {
    pub fn new(bounds: &'a [Boundary], origin: IVec2, velocity: Vec2) -> Self {
        Self {
            bounds,
            origin,
            velocity,
        }
    }

    /// A body that never moves (tiles)
    pub fn fixed(bounds: &'a [Boundary], origin: IVec2) -> Self {
        Self::new(bounds, origin, Vec2::ZERO)
    }
}
