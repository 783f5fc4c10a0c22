//! Pairwise boundary tests
//!
//! One moving body (A) is tested against one other body (B), an entity or a
//! tile. Both are reduced to A moving at the relative velocity against a
//! stationary B. Lines are tested by sweeping their endpoints over the step;
//! rectangles against rectangles by plain overlap.

use glam::{IVec2, Vec2};

use super::boundary::{Body, Boundary};
use super::entity::EntityId;
use super::geometry::{Line, Rect, Sweep, normal, segments_intersect};

/// The other side of a collision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Weak reference, resolved through the world
    Object(EntityId),
    /// Tile cell on the moving entity's layer
    Tile(IVec2),
}

/// Which path produced a swept line hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweptEndpoint {
    /// The moving line's first endpoint crossed the stationary line
    MovingFirst,
    /// The moving line's second endpoint crossed the stationary line
    MovingSecond,
    /// The stationary line's first endpoint, swept forward, crossed the moving line
    StationaryFirst,
    /// The stationary line's second endpoint, swept forward, crossed the moving line
    StationarySecond,
}

/// A detected contact. Boundaries are world-space copies of the pair that
/// hit; a rectangle tested against a line is recorded as the edge that hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub a: Boundary,
    pub b: Boundary,
    pub other: Target,
    /// Set for line/line records
    pub endpoint: Option<SweptEndpoint>,
}

/// Swept test of a moving line against a stationary one.
///
/// Lines whose normals do not face each other never collide. Otherwise the
/// paths of the moving endpoints over the step are tested first, then the
/// stationary endpoints swept the opposite way (equivalently, forward from
/// the moving line's point of view).
pub fn swept_line_hit(moving: Line, stationary: Line, rel: Vec2, sweep: &Sweep) -> Option<SweptEndpoint> {
    if normal(moving).dot(normal(stationary)) >= 0.0 {
        return None;
    }

    let travel = sweep.travel(rel);

    if segments_intersect(Line::new(moving.p1 - travel, moving.p1), stationary) {
        return Some(SweptEndpoint::MovingFirst);
    }
    if segments_intersect(Line::new(moving.p2 - travel, moving.p2), stationary) {
        return Some(SweptEndpoint::MovingSecond);
    }
    if segments_intersect(Line::new(stationary.p1, stationary.p1 + travel), moving) {
        return Some(SweptEndpoint::StationaryFirst);
    }
    if segments_intersect(Line::new(stationary.p2, stationary.p2 + travel), moving) {
        return Some(SweptEndpoint::StationarySecond);
    }
    None
}

/// Edges of a moving rectangle that lead its motion, vertical first
fn leading_edges(r: Rect, rel: Vec2) -> impl Iterator<Item = Line> {
    let vertical = if rel.y > 0.0 {
        // Bottom
        Some(Line::new(r.p2, IVec2::new(r.p1.x, r.p2.y)))
    } else if rel.y < 0.0 {
        // Top
        Some(Line::new(r.p1, IVec2::new(r.p2.x, r.p1.y)))
    } else {
        None
    };
    let horizontal = if rel.x > 0.0 {
        // Right
        Some(Line::new(IVec2::new(r.p2.x, r.p1.y), r.p2))
    } else if rel.x < 0.0 {
        // Left
        Some(Line::new(IVec2::new(r.p1.x, r.p2.y), r.p1))
    } else {
        None
    };
    vertical.into_iter().chain(horizontal)
}

/// Edges of a stationary rectangle that face something moving at `rel`,
/// vertical first
fn facing_edges(r: Rect, rel: Vec2) -> impl Iterator<Item = Line> {
    let vertical = if rel.y > 0.0 {
        // Top
        Some(Line::new(r.p1, IVec2::new(r.p2.x, r.p1.y)))
    } else if rel.y < 0.0 {
        // Bottom
        Some(Line::new(r.p2, IVec2::new(r.p1.x, r.p2.y)))
    } else {
        None
    };
    let horizontal = if rel.x > 0.0 {
        // Left
        Some(Line::new(IVec2::new(r.p1.x, r.p2.y), r.p1))
    } else if rel.x < 0.0 {
        // Right
        Some(Line::new(IVec2::new(r.p2.x, r.p1.y), r.p2))
    } else {
        None
    };
    vertical.into_iter().chain(horizontal)
}

fn line_record(a: Line, b: Line, other: Target, endpoint: SweptEndpoint) -> Collision {
    Collision {
        a: Boundary::Line(a),
        b: Boundary::Line(b),
        other,
        endpoint: Some(endpoint),
    }
}

/// Test one world-space boundary pair
fn test_pair(a: Boundary, b: Boundary, rel: Vec2, other: Target, sweep: &Sweep) -> Option<Collision> {
    match (a, b) {
        (_, Boundary::Circle(_)) | (Boundary::Circle(_), _) => {
            log::warn!(
                "Circle boundaries are not collidable ({} vs {})",
                a.shape_name(),
                b.shape_name()
            );
            None
        }
        (Boundary::Line(al), Boundary::Line(bl)) => {
            if rel.dot(normal(bl)) >= 0.0 || rel.dot(normal(al)) <= 0.0 {
                return None;
            }
            swept_line_hit(al, bl, rel, sweep).map(|e| line_record(al, bl, other, e))
        }
        (Boundary::Rect(ar), Boundary::Line(bl)) => {
            if rel.dot(normal(bl)) >= 0.0 {
                return None;
            }
            leading_edges(ar, rel).find_map(|edge| {
                swept_line_hit(edge, bl, rel, sweep).map(|e| line_record(edge, bl, other, e))
            })
        }
        (Boundary::Rect(ar), Boundary::Rect(br)) => ar.overlaps(&br).then_some(Collision {
            a,
            b,
            other,
            endpoint: None,
        }),
        (Boundary::Line(al), Boundary::Rect(br)) => {
            if rel.dot(normal(al)) <= 0.0 {
                return None;
            }
            facing_edges(br, rel).find_map(|edge| {
                swept_line_hit(al, edge, rel, sweep).map(|e| line_record(al, edge, other, e))
            })
        }
    }
}

/// First collision between any boundary of `a` and any boundary of `b`,
/// trying A's boundaries in order, and for each of them B's in order.
pub fn test_collision(a: &Body<'_>, b: &Body<'_>, other: Target, sweep: &Sweep) -> Option<Collision> {
    let rel = a.velocity - b.velocity;
    a.bounds.iter().find_map(|ab| {
        let ab = ab.translated(a.origin);
        b.bounds
            .iter()
            .find_map(|bb| test_pair(ab, bb.translated(b.origin), rel, other, sweep))
    })
}
