//! Collision response
//!
//! Turns a detected collision into position and velocity corrections for the
//! moving entity (and the other entity, when there is one) and tells both
//! sides what happened through impulse signals.

use glam::{IVec2, Vec2};

use super::boundary::Boundary;
use super::detect::{Collision, SweptEndpoint, Target};
use super::entity::EntityId;
use super::geometry::{Line, Rect, Sweep, approx, intersection_point, normal};
use super::kinds::{ObjectKind, TileKind};
use super::signal::{HitTarget, Signal};
use super::world::World;
use crate::error::WorldError;

/// First collision in `list` that should physically block `id`. Non-solid
/// entities are never blocked.
pub fn find_solid_collision<'c>(world: &World, id: EntityId, list: &'c [Collision]) -> Option<&'c Collision> {
    let entity = world.entity(id)?;
    if !entity.solid {
        return None;
    }
    let layer = entity.layer();
    list.iter().find(|c| match c.other {
        Target::Object(other) => world.entity(other).is_some_and(|o| o.solid),
        Target::Tile(cell) => world.map().tile(layer, cell).is_some_and(|t| t.solid),
    })
}

/// Surface normal and penetration depth of one contact
#[derive(Debug, Clone, Copy, PartialEq)]
struct Contact {
    normal: Vec2,
    depth: IVec2,
}

/// Overlapping rectangles.
///
/// On each axis the depth is measured from A's leading side; that axis was
/// struck if A travelled at least that far this step. When both axes qualify,
/// the step is rewound along the dominant axis to where its overlap began,
/// and the other axis' travel at that point decides which side was hit.
fn rect_contact(a: Rect, b: Rect, rel: Vec2, sweep: &Sweep) -> Contact {
    let t = sweep.travel(rel);
    let mut n = IVec2::ZERO;
    let mut depth = IVec2::ZERO;

    if rel.x > 0.0 {
        depth.x = a.p2.x - b.p1.x;
        if t.x >= depth.x {
            n.x = -1;
        }
    } else if rel.x < 0.0 {
        depth.x = a.p1.x - b.p2.x;
        if t.x <= depth.x {
            n.x = 1;
        }
    }

    if rel.y > 0.0 {
        depth.y = a.p2.y - b.p1.y;
        if t.y >= depth.y {
            n.y = -1;
        }
    } else if rel.y < 0.0 {
        depth.y = a.p1.y - b.p2.y;
        if t.y <= depth.y {
            n.y = 1;
        }
    }

    if n.x != 0 && n.y != 0 {
        if t.x.abs() >= t.y.abs() {
            // Travel on y by the time x began to overlap
            let dy = rewound_travel(t.x, depth.x, t.y, sweep);
            if n.y == -1 {
                if depth.y > dy {
                    n.y = 0;
                } else {
                    n.x = 0;
                }
            } else if depth.y < dy {
                n.y = 0;
            } else {
                n.x = 0;
            }
        } else {
            let dx = rewound_travel(t.y, depth.y, t.x, sweep);
            if n.x == -1 {
                if depth.x > dx {
                    n.x = 0;
                } else {
                    n.y = 0;
                }
            } else if depth.x < dx {
                n.x = 0;
            } else {
                n.y = 0;
            }
        }
    }

    Contact {
        normal: n.as_vec2(),
        depth,
    }
}

/// `approx((t_major - d_major) * t_minor / t_major)`, divided in floating
/// point so the fraction survives until the bias is applied
fn rewound_travel(t_major: i32, d_major: i32, t_minor: i32, sweep: &Sweep) -> i32 {
    if t_major == 0 {
        return 0;
    }
    approx((t_major - d_major) as f32 * t_minor as f32 / t_major as f32, sweep.epsilon)
}

/// Line pair from a swept hit: rebuild the path that crossed, find where it
/// crossed, and measure how far past that point it went.
fn line_contact(
    a: Line,
    b: Line,
    endpoint: Option<SweptEndpoint>,
    rel: Vec2,
    sweep: &Sweep,
) -> Contact {
    let t = sweep.travel(rel);
    let depth = match endpoint {
        Some(SweptEndpoint::MovingFirst) => {
            let path = Line::new(a.p1 - t, a.p1);
            path.p2 - intersection_point(path, b)
        }
        Some(SweptEndpoint::MovingSecond) => {
            let path = Line::new(a.p2 - t, a.p2);
            path.p2 - intersection_point(path, b)
        }
        Some(SweptEndpoint::StationaryFirst) => {
            let path = Line::new(b.p1, b.p1 + t);
            intersection_point(path, a) - path.p1
        }
        Some(SweptEndpoint::StationarySecond) => {
            // Only the y delta is measured, and it lands in x
            let path = Line::new(b.p2, b.p2 + t);
            let p = intersection_point(path, a);
            IVec2::new(p.y - path.p1.y, 0)
        }
        None => {
            log::error!("Line collision reached response without a swept endpoint");
            IVec2::ZERO
        }
    };

    Contact {
        normal: normal(b),
        depth,
    }
}

#[inline]
fn rint(v: Vec2) -> IVec2 {
    IVec2::new(v.x.round_ties_even() as i32, v.y.round_ties_even() as i32)
}

/// One side of the collision as seen by the response
#[derive(Debug, Clone, Copy)]
enum Other {
    Object {
        id: EntityId,
        kind: ObjectKind,
        pos: IVec2,
        vel: Vec2,
        mass: i32,
        elasticity: f32,
    },
    Tile {
        cell: IVec2,
        kind: TileKind,
    },
}

/// Resolve one collision for entity `id`. Returns false when nothing was
/// corrected (missing participants or unsupported boundary pairs).
pub fn respond(world: &mut World, id: EntityId, collision: &Collision, sweep: &Sweep) -> bool {
    match try_respond(world, id, collision, sweep) {
        Ok(applied) => applied,
        Err(e) => {
            log::error!("Collision response for {:?} failed: {}", id, e);
            false
        }
    }
}

fn try_respond(
    world: &mut World,
    id: EntityId,
    collision: &Collision,
    sweep: &Sweep,
) -> Result<bool, WorldError> {
    let a = world.entity(id).ok_or(WorldError::UnknownEntity(id))?;
    let (layer, kind_a, pos_a, va, ma, ka) = (a.layer(), a.kind, a.pos(), a.vel, a.mass, a.elasticity);

    let other = match collision.other {
        Target::Object(bid) => {
            let b = world.entity(bid).ok_or(WorldError::UnknownEntity(bid))?;
            Other::Object {
                id: bid,
                kind: b.kind,
                pos: b.pos(),
                vel: b.vel,
                mass: b.mass,
                elasticity: b.elasticity,
            }
        }
        Target::Tile(cell) => match world.map().tile(layer, cell) {
            Some(tile) => Other::Tile {
                cell,
                kind: tile.kind,
            },
            None => return Ok(false),
        },
    };

    // Tiles never move and bounce perfectly
    let (vb, kb) = match other {
        Other::Object { vel, elasticity, .. } => (vel, elasticity),
        Other::Tile { .. } => (Vec2::ZERO, 1.0),
    };
    let k = ka * kb;
    let rel = va - vb;

    let (contact, is_rect) = match (collision.a, collision.b) {
        (Boundary::Rect(ar), Boundary::Rect(br)) => (rect_contact(ar, br, rel, sweep), true),
        (Boundary::Line(al), Boundary::Line(bl)) => {
            (line_contact(al, bl, collision.endpoint, rel, sweep), false)
        }
        (a, b) => {
            log::warn!(
                "No response for {} vs {} collision",
                a.shape_name(),
                b.shape_name()
            );
            return Ok(false);
        }
    };
    let n = contact.normal;
    let d = contact.depth;

    match other {
        Other::Object {
            id: bid,
            kind: kind_b,
            pos: pos_b,
            mass: mb,
            ..
        } => {
            let p = (1.0 + k) * (va.dot(n) - vb.dot(n)) / (ma + mb) as f32;
            let impulse_a = -p * mb as f32 * n;
            let impulse_b = p * ma as f32 * n;

            let (new_a, new_b) = if is_rect {
                let step = n.as_ivec2() * (d.abs() / 2 + IVec2::ONE);
                (pos_a + step, pos_b - step)
            } else {
                let nudge = rint(n);
                (pos_a - d / 2 + nudge, pos_b + d / 2 - nudge)
            };

            log::debug!(
                "{:?} vs {:?}: normal {}, depth {}, impulses {} / {}",
                id,
                bid,
                n,
                d,
                impulse_a,
                impulse_b
            );

            world.set_velocity(id, va + impulse_a)?;
            world.set_position(id, new_a)?;
            world.send_signal(
                id,
                Signal::Impulse {
                    vector: impulse_a,
                    hit: HitTarget::Object(kind_b),
                },
            );

            world.set_velocity(bid, vb + impulse_b)?;
            world.set_position(bid, new_b)?;
            world.send_signal(
                bid,
                Signal::Impulse {
                    vector: impulse_b,
                    hit: HitTarget::Object(kind_a),
                },
            );
        }
        Other::Tile { cell, kind } => {
            let (impulse_a, new_a) = if is_rect {
                (
                    -n * n * va * (1.0 + k),
                    pos_a + n.as_ivec2() * (d.abs() + IVec2::ONE),
                )
            } else {
                (-(va.dot(n) * (1.0 + k)) * n, pos_a - d + rint(n))
            };

            log::debug!(
                "{:?} vs tile {} ({}): normal {}, depth {}, impulse {}",
                id,
                cell,
                kind.name(),
                n,
                d,
                impulse_a
            );

            world.set_velocity(id, va + impulse_a)?;
            world.set_position(id, new_a)?;
            world.send_signal(
                id,
                Signal::Impulse {
                    vector: impulse_a,
                    hit: HitTarget::Tile(kind),
                },
            );
            world.send_tile_signal(
                layer,
                cell,
                Signal::Impulse {
                    vector: -impulse_a,
                    hit: HitTarget::Object(kind_a),
                },
            );
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::CollisionSettings;
    use crate::sim::map::TileMap;

    fn sweep() -> Sweep {
        Sweep::new(0.01, 1.0)
    }

    fn rect(x1: i32, y1: i32, x2: i32, y2: i32) -> Rect {
        Rect::new(IVec2::new(x1, y1), IVec2::new(x2, y2))
    }

    fn line(x1: i32, y1: i32, x2: i32, y2: i32) -> Line {
        Line::new(IVec2::new(x1, y1), IVec2::new(x2, y2))
    }

    fn world_with_floor() -> World {
        let settings = CollisionSettings::default();
        let mut map = TileMap::new(settings.tile_size);
        map.add_layer(IVec2::new(20, 10));
        map.fill(0, IVec2::new(0, 5), IVec2::new(19, 5), TileKind::Plain).unwrap();
        map.place(0, IVec2::new(10, 2), TileKind::Trigger).unwrap();
        World::new(map, settings).unwrap()
    }

    fn spawn(w: &mut World, kind: ObjectKind, pos: IVec2, vel: Vec2) -> EntityId {
        let id = w.spawn(kind, 0, pos, vel).unwrap();
        w.apply_commands();
        id
    }

    #[test]
    fn test_rect_contact_single_axis() {
        // Moving down 4 this step, 2 deep into the top of b
        let c = rect_contact(rect(0, 0, 10, 12), rect(-20, 10, 40, 40), Vec2::new(0.0, 300.0), &sweep());
        assert_eq!(c.normal, Vec2::new(0.0, -1.0));
        assert_eq!(c.depth, IVec2::new(0, 2));
    }

    #[test]
    fn test_rect_contact_negative_direction() {
        // Moving left into the right side of b
        let c = rect_contact(rect(38, 0, 48, 10), rect(0, -20, 40, 40), Vec2::new(-300.0, 0.0), &sweep());
        assert_eq!(c.normal, Vec2::new(1.0, 0.0));
        assert_eq!(c.depth, IVec2::new(-2, 0));
    }

    #[test]
    fn test_rect_contact_tie_break_pinned() {
        // Both axes could have been struck; x travel dominates, t = (6, 4).
        // depth = (5, 1): dy = approx(1 * 4 / 6) = rint(0.67 + 1) = 2,
        // depth.y 1 > 2 is false so x is dropped.
        let c = rect_contact(rect(0, 0, 10, 10), rect(5, 9, 30, 30), Vec2::new(500.0, 300.0), &sweep());
        assert_eq!(c.depth, IVec2::new(5, 1));
        assert_eq!(c.normal, Vec2::new(0.0, -1.0));

        // depth = (5, 3): dy is still 2, depth.y 3 > 2 so y is dropped.
        let c = rect_contact(rect(0, 0, 10, 10), rect(5, 7, 30, 30), Vec2::new(500.0, 300.0), &sweep());
        assert_eq!(c.depth, IVec2::new(5, 3));
        assert_eq!(c.normal, Vec2::new(-1.0, 0.0));

        // depth = (1, 3): dy = approx(5 * 4 / 6) = rint(3.33 + 1) = 4, x dropped
        let c = rect_contact(rect(0, 0, 10, 10), rect(9, 7, 30, 30), Vec2::new(500.0, 300.0), &sweep());
        assert_eq!(c.depth, IVec2::new(1, 3));
        assert_eq!(c.normal, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_rect_contact_y_dominant_tie_break() {
        // t = (4, 6), depth = (1, 5): dx = approx(1 * 4 / 6) = 2,
        // depth.x 1 > 2 is false so y is dropped.
        let c = rect_contact(rect(0, 0, 10, 10), rect(9, 5, 30, 30), Vec2::new(300.0, 500.0), &sweep());
        assert_eq!(c.normal, Vec2::new(-1.0, 0.0));

        // depth = (3, 5): dx is still 2, depth.x 3 > 2 so x is dropped.
        let c = rect_contact(rect(0, 0, 10, 10), rect(7, 5, 30, 30), Vec2::new(300.0, 500.0), &sweep());
        assert_eq!(c.normal, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_line_contact_moving_endpoint() {
        // Bottom edge fell from y = 35 to 40 through a floor at 38
        let c = line_contact(
            line(40, 40, 0, 40),
            line(-100, 38, 100, 38),
            Some(SweptEndpoint::MovingFirst),
            Vec2::new(0.0, 400.0),
            &sweep(),
        );
        assert_eq!(c.depth, IVec2::new(0, 2));
        assert_eq!(c.normal, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_line_contact_stationary_first() {
        let c = line_contact(
            line(100, 40, 0, 40),
            line(40, 38, 60, 38),
            Some(SweptEndpoint::StationaryFirst),
            Vec2::new(0.0, 400.0),
            &sweep(),
        );
        assert_eq!(c.depth, IVec2::new(0, 2));
    }

    #[test]
    fn test_line_contact_stationary_second_uses_y_delta_for_x() {
        let c = line_contact(
            line(100, 40, 0, 40),
            line(40, 38, 60, 38),
            Some(SweptEndpoint::StationarySecond),
            Vec2::new(0.0, 400.0),
            &sweep(),
        );
        assert_eq!(c.depth, IVec2::new(2, 0));
    }

    #[test]
    fn test_line_contact_without_endpoint_has_no_depth() {
        let c = line_contact(
            line(40, 40, 0, 40),
            line(-100, 38, 100, 38),
            None,
            Vec2::new(0.0, 400.0),
            &sweep(),
        );
        assert_eq!(c.depth, IVec2::ZERO);
    }

    #[test]
    fn test_find_solid_collision_skips_non_solid() {
        let mut w = world_with_floor();
        let sensor = spawn(&mut w, ObjectKind::Sensor, IVec2::new(100, 100), Vec2::Y);
        let bullet = spawn(&mut w, ObjectKind::Bullet, IVec2::new(300, 100), Vec2::Y);

        let trigger = Collision {
            a: Boundary::rect(0, 0, 1, 1),
            b: Boundary::rect(0, 0, 1, 1),
            other: Target::Tile(IVec2::new(10, 2)),
            endpoint: None,
        };
        let floor = Collision {
            other: Target::Tile(IVec2::new(3, 5)),
            ..trigger
        };
        let list = [trigger, floor];

        assert!(find_solid_collision(&w, sensor, &list).is_none());
        assert_eq!(
            find_solid_collision(&w, bullet, &list).map(|c| c.other),
            Some(Target::Tile(IVec2::new(3, 5)))
        );
    }

    #[test]
    fn test_rect_tile_response_stops_and_lifts() {
        let mut w = world_with_floor();
        // Floor top at y = 160; bullet bottom at 162
        let id = spawn(&mut w, ObjectKind::Bullet, IVec2::new(100, 159), Vec2::new(0.0, 300.0));
        let e = w.entity(id).unwrap();
        let collision = Collision {
            a: e.bounds[0].translated(e.top_left()),
            b: Boundary::rect(96, 160, 128, 192),
            other: Target::Tile(IVec2::new(3, 5)),
            endpoint: None,
        };

        assert!(respond(&mut w, id, &collision, &sweep()));
        let e = w.entity(id).unwrap();
        assert_eq!(e.vel, Vec2::ZERO);
        // depth 2, moved up by 3
        assert_eq!(e.pos(), IVec2::new(100, 156));
        match e.signals.iter().next() {
            Some(Signal::Impulse { vector, hit }) => {
                assert_eq!(*vector, Vec2::new(0.0, -300.0));
                assert_eq!(*hit, HitTarget::Tile(TileKind::Plain));
            }
            other => panic!("expected impulse, got {other:?}"),
        }
    }

    #[test]
    fn test_rect_tile_response_negative_direction_moves_out() {
        let mut w = world_with_floor();
        let id = spawn(&mut w, ObjectKind::Bullet, IVec2::new(100, 100), Vec2::new(-300.0, 0.0));
        let collision = Collision {
            a: Boundary::rect(94, 97, 103, 103),
            b: Boundary::rect(64, 64, 96, 128),
            other: Target::Tile(IVec2::new(3, 5)),
            endpoint: None,
        };
        assert!(respond(&mut w, id, &collision, &sweep()));
        // depth -2, pushed right by 3
        assert_eq!(w.entity(id).unwrap().pos(), IVec2::new(103, 100));
    }

    #[test]
    fn test_object_response_conserves_momentum() {
        let mut w = world_with_floor();
        let a = spawn(&mut w, ObjectKind::Baddie, IVec2::new(100, 100), Vec2::new(0.0, 400.0));
        let b = spawn(&mut w, ObjectKind::Baddie, IVec2::new(100, 138), Vec2::new(0.0, -100.0));
        let collision = Collision {
            a: Boundary::line(120, 120, 80, 120),
            b: Boundary::line(80, 118, 120, 118),
            other: Target::Object(b),
            endpoint: Some(SweptEndpoint::MovingFirst),
        };

        let before = w.entity(a).unwrap().vel + w.entity(b).unwrap().vel;
        assert!(respond(&mut w, a, &collision, &sweep()));
        let (ea, eb) = (w.entity(a).unwrap(), w.entity(b).unwrap());
        let after = ea.vel + eb.vel;
        assert!((before - after).length() < 1e-3);
        // Elastic swap of the normal components for equal masses
        assert!((ea.vel.y + 100.0).abs() < 1e-3);
        assert!((eb.vel.y - 400.0).abs() < 1e-3);
        assert_eq!(ea.signals.len(), 1);
        assert_eq!(eb.signals.len(), 1);
    }

    #[test]
    fn test_tile_impulse_reaches_active_tile() {
        let mut w = world_with_floor();
        let id = spawn(&mut w, ObjectKind::Bullet, IVec2::new(330, 70), Vec2::new(0.0, 300.0));
        let collision = Collision {
            a: Boundary::rect(326, 67, 335, 73),
            b: Boundary::rect(320, 64, 352, 96),
            other: Target::Tile(IVec2::new(10, 2)),
            endpoint: None,
        };
        assert!(respond(&mut w, id, &collision, &sweep()));
        let tile = w.map().tile(0, IVec2::new(10, 2)).unwrap();
        assert_eq!(tile.signals.len(), 1);
    }

    #[test]
    fn test_mixed_record_is_ignored() {
        let mut w = world_with_floor();
        let id = spawn(&mut w, ObjectKind::Bullet, IVec2::new(100, 100), Vec2::X);
        let collision = Collision {
            a: Boundary::rect(0, 0, 9, 6),
            b: Boundary::line(0, 0, 10, 0),
            other: Target::Tile(IVec2::new(3, 5)),
            endpoint: None,
        };
        assert!(!respond(&mut w, id, &collision, &sweep()));
        assert_eq!(w.entity(id).unwrap().pos(), IVec2::new(100, 100));
    }
}
