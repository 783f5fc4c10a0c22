//! Deferred signals
//!
//! Collision side effects are never applied while the detector is running.
//! Hits and impulses are queued on the receiving entity or tile and drained
//! during its own think; spawns and kills are queued on the world and applied
//! once every entity has acted.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};
use super::kinds::{ObjectKind, TileKind};

/// What the receiver ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitTarget {
    Object(ObjectKind),
    Tile(TileKind),
}

/// Per-receiver notification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Signal {
    /// A collision occurred with something
    Hit(HitTarget),
    /// A collision was resolved and changed the receiver's velocity by `vector`
    Impulse { vector: Vec2, hit: HitTarget },
}

/// Structural change to the entity set, applied at commit time
#[derive(Debug, Clone)]
pub enum Command {
    /// Insert an entity whose id was already allocated
    Spawn(Box<Entity>),
    Kill(EntityId),
}

/// First in, first out queue
#[derive(Debug, Clone)]
pub struct SignalQueue<T> {
    items: VecDeque<T>,
}

impl<T> Default for SignalQueue<T> {
    fn default() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }
}

impl<T> SignalQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the back
    #[inline]
    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Take from the front, `None` when empty
    #[inline]
    pub fn poll(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Drop everything still queued
    pub fn flush(&mut self) {
        self.items.clear();
    }

    /// Take everything queued so far, oldest first. Items pushed while the
    /// returned iterator is alive go to the (now empty) queue.
    pub fn drain(&mut self) -> std::collections::vec_deque::IntoIter<T> {
        std::mem::take(&mut self.items).into_iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut q = SignalQueue::new();
        q.push(Signal::Hit(HitTarget::Tile(TileKind::Plain)));
        q.push(Signal::Hit(HitTarget::Object(ObjectKind::Bullet)));
        q.push(Signal::Impulse {
            vector: Vec2::new(1.0, 0.0),
            hit: HitTarget::Object(ObjectKind::Baddie),
        });

        assert_eq!(q.len(), 3);
        assert_eq!(q.poll(), Some(Signal::Hit(HitTarget::Tile(TileKind::Plain))));
        assert_eq!(
            q.poll(),
            Some(Signal::Hit(HitTarget::Object(ObjectKind::Bullet)))
        );
        assert!(matches!(q.poll(), Some(Signal::Impulse { .. })));
        assert_eq!(q.poll(), None);
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut q = SignalQueue::new();
        q.push(1);
        q.push(2);
        let drained: Vec<_> = q.drain().collect();
        assert_eq!(drained, vec![1, 2]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_flush() {
        let mut q = SignalQueue::new();
        q.push(Command::Kill(EntityId(3)));
        q.flush();
        assert!(q.poll().is_none());
    }
}
