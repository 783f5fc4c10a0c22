//! Sector grid for bounded-cost neighbor queries
//!
//! Sectors are not part of the level: they only organize entities so that a
//! query scans a handful of nearby cells instead of the whole layer. Each
//! entity lives in exactly one cell, `floor(position / cell_size)`, clamped to
//! the grid.

use std::collections::VecDeque;

use glam::IVec2;

use super::entity::EntityId;

/// One layer's grid of sectors
#[derive(Debug, Clone)]
pub struct SectorGrid {
    cell_size: IVec2,
    /// Width and height in cells
    dims: IVec2,
    /// Row-major cells, each a non-owning list of entity ids (newest first)
    cells: Vec<VecDeque<EntityId>>,
}

impl SectorGrid {
    /// Build a grid covering `extent` world units. Partial cells at the far
    /// edges are rounded up so every in-bounds position has a cell.
    pub fn new(extent: IVec2, cell_size: IVec2) -> Self {
        let cell_size = cell_size.max(IVec2::ONE);
        let dims = IVec2::new(
            ceil_div(extent.x.max(1), cell_size.x),
            ceil_div(extent.y.max(1), cell_size.y),
        );
        let count = (dims.x * dims.y) as usize;
        Self {
            cell_size,
            dims,
            cells: vec![VecDeque::new(); count],
        }
    }

    #[inline]
    pub fn dims(&self) -> IVec2 {
        self.dims
    }

    #[inline]
    pub fn cell_size(&self) -> IVec2 {
        self.cell_size
    }

    /// Cell containing a world position, clamped into the grid
    #[inline]
    pub fn cell_of(&self, pos: IVec2) -> IVec2 {
        pos.div_euclid(self.cell_size)
            .clamp(IVec2::ZERO, self.dims - IVec2::ONE)
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        if cell.x < 0 || cell.y < 0 || cell.x >= self.dims.x || cell.y >= self.dims.y {
            return None;
        }
        Some((cell.y * self.dims.x + cell.x) as usize)
    }

    /// Add an entity at the front of its cell's list
    pub fn insert(&mut self, id: EntityId, pos: IVec2) {
        let cell = self.cell_of(pos);
        if let Some(i) = self.index(cell) {
            self.cells[i].push_front(id);
        }
    }

    /// Unlink an entity from the cell `pos` maps to. Returns false if it was
    /// not there.
    pub fn remove(&mut self, id: EntityId, pos: IVec2) -> bool {
        let cell = self.cell_of(pos);
        let Some(i) = self.index(cell) else {
            return false;
        };
        let list = &mut self.cells[i];
        match list.iter().position(|&other| other == id) {
            Some(at) => {
                list.remove(at);
                true
            }
            None => false,
        }
    }

    /// Keep membership in step with a position change. Only touches the
    /// lists when the cell actually changes; returns whether it did.
    pub fn relocate(&mut self, id: EntityId, old: IVec2, new: IVec2) -> bool {
        if self.cell_of(old) == self.cell_of(new) {
            return false;
        }
        if !self.remove(id, old) {
            log::warn!("{id:?} was not in the sector for {old}; reinserting anyway");
        }
        self.insert(id, new);
        true
    }

    /// Entities registered in one cell, newest first. Out-of-range cells
    /// are empty.
    pub fn entities_in(&self, cell: IVec2) -> impl Iterator<Item = EntityId> + '_ {
        self.index(cell)
            .map(|i| self.cells[i].iter().copied())
            .into_iter()
            .flatten()
    }

    /// Cells within `range` of `center` on each axis, clamped to the grid,
    /// rows first. Requests that fall outside are truncated, never wrapped.
    pub fn neighborhood(&self, center: IVec2, range: IVec2) -> impl Iterator<Item = IVec2> + use<> {
        let lo = (center - range).max(IVec2::ZERO);
        let hi = (center + range).min(self.dims - IVec2::ONE);
        (lo.y..=hi.y).flat_map(move |y| (lo.x..=hi.x).map(move |x| IVec2::new(x, y)))
    }

    /// Every entity within `range` sectors of `pos`
    pub fn query_around(&self, pos: IVec2, range: IVec2) -> Vec<EntityId> {
        self.neighborhood(self.cell_of(pos), range)
            .flat_map(|cell| self.entities_in(cell))
            .collect()
    }

    /// Total registered entities
    pub fn len(&self) -> usize {
        self.cells.iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(VecDeque::is_empty)
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }
}

#[inline]
fn ceil_div(a: i32, b: i32) -> i32 {
    (a + b - 1) / b
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> SectorGrid {
        // 2000 x 600 world, 300 x 150 sectors -> 7 x 4
        SectorGrid::new(IVec2::new(2000, 600), IVec2::new(300, 150))
    }

    #[test]
    fn test_dims_round_up() {
        assert_eq!(grid().dims(), IVec2::new(7, 4));
    }

    #[test]
    fn test_cell_of_floor_and_clamp() {
        let g = grid();
        assert_eq!(g.cell_of(IVec2::new(299, 149)), IVec2::new(0, 0));
        assert_eq!(g.cell_of(IVec2::new(300, 150)), IVec2::new(1, 1));
        assert_eq!(g.cell_of(IVec2::new(-5, -5)), IVec2::new(0, 0));
        assert_eq!(g.cell_of(IVec2::new(99_999, 99_999)), IVec2::new(6, 3));
    }

    #[test]
    fn test_insert_prepends() {
        let mut g = grid();
        g.insert(EntityId(1), IVec2::new(10, 10));
        g.insert(EntityId(2), IVec2::new(20, 20));
        let ids: Vec<_> = g.entities_in(IVec2::ZERO).collect();
        assert_eq!(ids, vec![EntityId(2), EntityId(1)]);
    }

    #[test]
    fn test_remove() {
        let mut g = grid();
        g.insert(EntityId(1), IVec2::new(10, 10));
        g.insert(EntityId(2), IVec2::new(20, 20));
        assert!(g.remove(EntityId(1), IVec2::new(10, 10)));
        assert!(!g.remove(EntityId(1), IVec2::new(10, 10)));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_relocate_across_boundary() {
        let mut g = grid();
        let id = EntityId(7);
        let old = IVec2::new(290, 10);
        let new = IVec2::new(310, 10);
        g.insert(id, old);

        assert!(g.relocate(id, old, new));
        assert!(g.entities_in(IVec2::new(1, 0)).any(|e| e == id));
        assert!(!g.entities_in(IVec2::new(0, 0)).any(|e| e == id));
        assert_eq!(g.len(), 1);

        // Moving within a cell leaves the lists alone
        assert!(!g.relocate(id, new, IVec2::new(320, 20)));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_neighborhood_clamps() {
        let g = grid();
        let cells: Vec<_> = g.neighborhood(IVec2::ZERO, IVec2::new(2, 2)).collect();
        // x 0..=2, y 0..=2
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0], IVec2::ZERO);

        let cells: Vec<_> = g.neighborhood(IVec2::new(6, 3), IVec2::new(2, 2)).collect();
        // x 4..=6, y 1..=3
        assert_eq!(cells.len(), 9);
        assert!(cells.iter().all(|c| c.x >= 4 && c.y >= 1 && c.x <= 6 && c.y <= 3));
    }

    #[test]
    fn test_entities_in_out_of_range_is_empty() {
        let g = grid();
        assert_eq!(g.entities_in(IVec2::new(-1, 0)).count(), 0);
        assert_eq!(g.entities_in(IVec2::new(7, 0)).count(), 0);
    }

    #[test]
    fn test_query_around() {
        let mut g = grid();
        g.insert(EntityId(1), IVec2::new(10, 10));
        g.insert(EntityId(2), IVec2::new(1900, 10));
        let near = g.query_around(IVec2::new(50, 50), IVec2::new(2, 2));
        assert_eq!(near, vec![EntityId(1)]);
    }
}
