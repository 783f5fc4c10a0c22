//! Movable objects

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::boundary::{Body, Boundary};
use super::kinds::{KindState, ObjectKind};
use super::signal::{Command, Signal, SignalQueue};

/// Stable entity handle. Ids are handed out in increasing order and never
/// reused, so iterating by id is iterating by creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// An object living on one layer of the world
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub kind: ObjectKind,
    layer: usize,
    /// Center, in real coordinates. Only the world moves it so that sector
    /// membership stays in step.
    pos: IVec2,
    /// Sub-unit movement not yet applied to `pos`, in thousandths
    pub fine: IVec2,
    pub vel: Vec2,
    pub mass: i32,
    pub size: IVec2,
    pub elasticity: f32,
    pub solid: bool,
    pub bounds: Vec<Boundary>,
    pub signals: SignalQueue<Signal>,
    /// Set once a kill has been requested
    pub dead: bool,
    pub state: KindState,
}

impl Entity {
    /// New entity of `kind` with the kind's static properties
    pub fn new(id: EntityId, kind: ObjectKind, layer: usize, pos: IVec2, vel: Vec2) -> Self {
        let def = kind.def();
        Self {
            id,
            kind,
            layer,
            pos,
            fine: IVec2::ZERO,
            vel,
            mass: def.mass,
            size: def.size,
            elasticity: def.elasticity,
            solid: def.solid,
            bounds: def.bounds.to_vec(),
            signals: SignalQueue::new(),
            dead: false,
            state: kind.initial_state(),
        }
    }

    #[inline]
    pub fn layer(&self) -> usize {
        self.layer
    }

    #[inline]
    pub fn pos(&self) -> IVec2 {
        self.pos
    }

    /// Only for the world, which keeps the sector grid in step
    pub(crate) fn set_pos_unchecked(&mut self, pos: IVec2) {
        self.pos = pos;
    }

    #[inline]
    pub fn top_left(&self) -> IVec2 {
        self.pos - self.size / 2
    }

    #[inline]
    pub fn bottom_right(&self) -> IVec2 {
        self.pos + self.size / 2
    }

    /// This entity's boundaries placed at its current position
    pub fn body(&self) -> Body<'_> {
        Body::new(&self.bounds, self.top_left(), self.vel)
    }

    /// Queue a signal for this entity's next think
    pub fn send(&mut self, signal: Signal) {
        self.signals.push(signal);
    }

    /// Request removal at the next commit. Only the first request counts.
    pub fn kill(&mut self, commands: &mut SignalQueue<Command>) {
        if !self.dead {
            self.dead = true;
            commands.push(Command::Kill(self.id));
        }
    }
}
