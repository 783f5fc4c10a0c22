//! Integer geometry kernel
//!
//! World coordinates are integers, velocities and travelled distances are
//! floats. Everything here is division-free where it can be, and rounds to
//! the nearest integer (ties to even) where it cannot.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// A line segment between two integer points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub p1: IVec2,
    pub p2: IVec2,
}

impl Line {
    pub const fn new(p1: IVec2, p2: IVec2) -> Self {
        Self { p1, p2 }
    }

    /// `p2 - p1`
    #[inline]
    pub fn delta(&self) -> IVec2 {
        self.p2 - self.p1
    }

    /// The same segment shifted by `offset`
    #[inline]
    pub fn translated(&self, offset: IVec2) -> Self {
        Self::new(self.p1 + offset, self.p2 + offset)
    }
}

/// An axis-aligned rectangle. `p2` must be below and to the right of `p1`,
/// otherwise the rectangle is inside out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub p1: IVec2,
    pub p2: IVec2,
}

impl Rect {
    pub const fn new(p1: IVec2, p2: IVec2) -> Self {
        Self { p1, p2 }
    }

    #[inline]
    pub fn translated(&self, offset: IVec2) -> Self {
        Self::new(self.p1 + offset, self.p2 + offset)
    }

    /// Inclusive overlap test: touching edges count as overlapping
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.p2.x < other.p1.x
            || self.p2.y < other.p1.y
            || self.p1.x > other.p2.x
            || self.p1.y > other.p2.y)
    }
}

/// A circle. Carried in boundary lists but never collided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    pub center: IVec2,
    pub radius: i32,
}

impl Circle {
    pub const fn new(center: IVec2, radius: i32) -> Self {
        Self { center, radius }
    }
}

/// Orientation of the turn p0 -> p1 -> p2.
///
/// Returns +1 for counterclockwise and -1 for clockwise. For collinear
/// points: -1 if p0 lies between p2 and p1, +1 if p1 lies between p0 and p2,
/// and 0 if p2 lies between p0 and p1.
pub fn orientation(p0: IVec2, p1: IVec2, p2: IVec2) -> i32 {
    let (dx1, dy1) = ((p1.x - p0.x) as i64, (p1.y - p0.y) as i64);
    let (dx2, dy2) = ((p2.x - p0.x) as i64, (p2.y - p0.y) as i64);

    let lhs = dx1 * dy2;
    let rhs = dy1 * dx2;
    if lhs > rhs {
        return 1;
    }
    if lhs < rhs {
        return -1;
    }

    if dx1 * dx2 < 0 || dy1 * dy2 < 0 {
        return -1;
    }
    if dx1 * dx1 + dy1 * dy1 < dx2 * dx2 + dy2 * dy2 {
        return 1;
    }
    0
}

/// True if each segment's endpoints straddle (or touch) the other segment
pub fn segments_intersect(l1: Line, l2: Line) -> bool {
    orientation(l1.p1, l1.p2, l2.p1) * orientation(l1.p1, l1.p2, l2.p2) <= 0
        && orientation(l2.p1, l2.p2, l1.p1) * orientation(l2.p1, l2.p2, l1.p2) <= 0
}

/// Slope equality by cross multiplication (zero-length lines count as parallel)
pub fn are_parallel(l1: Line, l2: Line) -> bool {
    let (d1, d2) = (l1.delta(), l2.delta());
    d1.y as i64 * d2.x as i64 == d2.y as i64 * d1.x as i64
}

#[inline]
fn rint(x: f32) -> i32 {
    x.round_ties_even() as i32
}

/// Point where two intersecting lines cross.
///
/// Parallel lines have no single crossing point; in that case the endpoint of
/// `l1` nearest to `l2` is returned: `l1.p1` if `l1.p2` lies beyond `l2` on
/// either axis, otherwise `l1.p2`.
pub fn intersection_point(l1: Line, l2: Line) -> IVec2 {
    if are_parallel(l1, l2) {
        let beyond = (l1.p2.x < l2.p1.x && l1.p2.x < l2.p2.x)
            || (l1.p2.x > l2.p2.x && l1.p2.x > l2.p1.x)
            || (l1.p2.y > l2.p1.y && l1.p2.y > l2.p2.y)
            || (l1.p2.y < l2.p1.y && l1.p2.y < l2.p2.y);
        return if beyond { l1.p1 } else { l1.p2 };
    }

    let (d1, d2) = (l1.delta().as_vec2(), l2.delta().as_vec2());
    let (a1, a2) = (l1.p1.as_vec2(), l2.p1.as_vec2());

    // Vertical lines first, so no slope below divides by zero
    if d1.x == 0.0 {
        if d2.y == 0.0 {
            return IVec2::new(l1.p1.x, l2.p1.y);
        }
        let x = l1.p2.x;
        let m2 = d2.y / d2.x;
        let b2 = a2.y - m2 * a2.x;
        return IVec2::new(x, rint(m2 * x as f32 + b2));
    }
    if d2.x == 0.0 {
        if d1.y == 0.0 {
            return IVec2::new(l2.p1.x, l1.p1.y);
        }
        let x = l2.p2.x;
        let m1 = d1.y / d1.x;
        let b1 = a1.y - m1 * a1.x;
        return IVec2::new(x, rint(m1 * x as f32 + b1));
    }

    if d1.y == 0.0 {
        let y = l1.p2.y;
        let m2 = d2.y / d2.x;
        let b2 = a2.y - m2 * a2.x;
        return IVec2::new(rint((y as f32 - b2) / m2), y);
    }
    if d2.y == 0.0 {
        let y = l2.p2.y;
        let m1 = d1.y / d1.x;
        let b1 = a1.y - m1 * a1.x;
        return IVec2::new(rint((y as f32 - b1) / m1), y);
    }

    let m1 = d1.y / d1.x;
    let m2 = d2.y / d2.x;
    let b1 = a1.y - m1 * a1.x;
    let b2 = a2.y - m2 * a2.x;

    IVec2::new(
        rint((b2 - b1) / (m1 - m2)),
        rint((b1 - b2 * (m1 / m2)) / (1.0 - m1 / m2)),
    )
}

/// Euclidean length of a segment
#[inline]
pub fn length(line: Line) -> f32 {
    line.delta().as_vec2().length()
}

/// Unit normal of a line: the direction vector rotated by swapping and
/// negating its components. With screen coordinates (y down) this points to
/// the left of p1 -> p2.
///
/// A zero-length line has no normal; the zero vector is returned so that no
/// velocity is ever considered to be approaching it.
#[inline]
pub fn normal(line: Line) -> Vec2 {
    Vec2::new(
        (line.p2.y - line.p1.y) as f32,
        (line.p1.x - line.p2.x) as f32,
    )
    .normalize_or_zero()
}

/// Round away from zero with a bias of `epsilon`, so that a fast, thin
/// boundary's path is never truncated short of what it actually crossed.
#[inline]
pub fn approx(x: f32, epsilon: f32) -> i32 {
    if x > 0.0 {
        rint(x + epsilon)
    } else if x < 0.0 {
        rint(x - epsilon)
    } else {
        0
    }
}

/// Timestep and rounding bias for one collision sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    /// Seconds simulated this step
    pub dt: f32,
    /// Bias applied by [`approx`]
    pub epsilon: f32,
}

impl Sweep {
    pub fn new(dt: f32, epsilon: f32) -> Self {
        Self { dt, epsilon }
    }

    /// Biased integer distance travelled along one axis at `speed`
    #[inline]
    pub fn travel_axis(&self, speed: f32) -> i32 {
        approx(speed * self.dt, self.epsilon)
    }

    /// Biased integer displacement at `velocity`
    #[inline]
    pub fn travel(&self, velocity: Vec2) -> IVec2 {
        IVec2::new(self.travel_axis(velocity.x), self.travel_axis(velocity.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x1: i32, y1: i32, x2: i32, y2: i32) -> Line {
        Line::new(IVec2::new(x1, y1), IVec2::new(x2, y2))
    }

    #[test]
    fn test_orientation_turns() {
        let o = IVec2::ZERO;
        assert_eq!(orientation(o, IVec2::new(10, 0), IVec2::new(10, 10)), 1);
        assert_eq!(orientation(o, IVec2::new(10, 0), IVec2::new(10, -10)), -1);
    }

    #[test]
    fn test_orientation_collinear() {
        let o = IVec2::ZERO;
        // p0 between p2 and p1
        assert_eq!(orientation(o, IVec2::new(5, 0), IVec2::new(-5, 0)), -1);
        // p2 between p0 and p1
        assert_eq!(orientation(o, IVec2::new(10, 0), IVec2::new(5, 0)), 0);
        // p1 between p0 and p2
        assert_eq!(orientation(o, IVec2::new(5, 0), IVec2::new(10, 0)), 1);
    }

    #[test]
    fn test_segments_intersect() {
        assert!(segments_intersect(line(0, 0, 10, 10), line(0, 10, 10, 0)));
        assert!(!segments_intersect(line(0, 0, 10, 0), line(0, 5, 10, 5)));
        // Touching at an endpoint counts
        assert!(segments_intersect(line(0, 0, 10, 0), line(10, 0, 10, 10)));
        // Collinear but disjoint
        assert!(!segments_intersect(line(0, 0, 5, 0), line(6, 0, 10, 0)));
    }

    #[test]
    fn test_are_parallel() {
        assert!(are_parallel(line(0, 0, 10, 5), line(3, 3, 23, 13)));
        assert!(!are_parallel(line(0, 0, 10, 5), line(0, 0, 5, 10)));
        assert!(are_parallel(line(0, 0, 0, 5), line(4, 1, 4, -7)));
    }

    #[test]
    fn test_intersection_axis_aligned() {
        let vertical = line(5, -10, 5, 10);
        let horizontal = line(-10, 3, 10, 3);
        assert_eq!(intersection_point(vertical, horizontal), IVec2::new(5, 3));
        assert_eq!(intersection_point(horizontal, vertical), IVec2::new(5, 3));
    }

    #[test]
    fn test_intersection_vertical_and_sloped() {
        let vertical = line(4, 0, 4, 20);
        let sloped = line(0, 0, 10, 10);
        assert_eq!(intersection_point(vertical, sloped), IVec2::new(4, 4));
    }

    #[test]
    fn test_intersection_horizontal_and_sloped() {
        let horizontal = line(0, 6, 20, 6);
        let sloped = line(0, 0, 10, 10);
        assert_eq!(intersection_point(horizontal, sloped), IVec2::new(6, 6));
        assert_eq!(intersection_point(sloped, horizontal), IVec2::new(6, 6));
    }

    #[test]
    fn test_intersection_general() {
        let a = line(0, 0, 10, 10);
        let b = line(0, 10, 10, 0);
        assert_eq!(intersection_point(a, b), IVec2::new(5, 5));
    }

    #[test]
    fn test_intersection_parallel_returns_endpoint() {
        // l1.p2 lies past l2 on x, so the far endpoint p1 is returned
        let l1 = line(0, 0, 20, 0);
        let l2 = line(5, 0, 10, 0);
        assert_eq!(intersection_point(l1, l2), IVec2::new(0, 0));

        // l1.p2 within l2's extent
        let l1 = line(0, 0, 7, 0);
        assert_eq!(intersection_point(l1, l2), IVec2::new(7, 0));
    }

    #[test]
    fn test_normal_directions() {
        // Top edge of a box, left to right: normal points up (y down screen)
        let n = normal(line(0, 0, 10, 0));
        assert_eq!(n, Vec2::new(0.0, -1.0));
        // Right edge, top to bottom: normal points right
        let n = normal(line(10, 0, 10, 10));
        assert_eq!(n, Vec2::new(1.0, 0.0));
        // Degenerate line
        assert_eq!(normal(line(3, 3, 3, 3)), Vec2::ZERO);
    }

    #[test]
    fn test_length() {
        assert!((length(line(0, 0, 3, 4)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_approx_biases_away_from_zero() {
        assert_eq!(approx(0.2, 1.0), 1);
        assert_eq!(approx(-0.2, 1.0), -1);
        assert_eq!(approx(0.0, 1.0), 0);
        assert_eq!(approx(3.4, 1.0), 4);
        // 1.5 rounds to even
        assert_eq!(approx(0.5, 1.0), 2);
        assert_eq!(approx(1.5, 1.0), 2);
    }

    #[test]
    fn test_sweep_travel() {
        let sweep = Sweep::new(0.01, 1.0);
        assert_eq!(sweep.travel(Vec2::new(260.0, -100.0)), IVec2::new(4, -2));
        assert_eq!(sweep.travel(Vec2::ZERO), IVec2::ZERO);
    }
}
