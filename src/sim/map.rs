//! Tile map: layers of optional tiles
//!
//! Built programmatically; there is no level file format. Tiles are addressed
//! by layer index and cell (map coordinates); world positions are real
//! coordinates, `cell * tile_size`.

use glam::IVec2;

use super::boundary::Boundary;
use super::kinds::{TileKind, TileState};
use super::signal::{Signal, SignalQueue};
use crate::error::WorldError;

/// A static piece of scenery that can still receive signals
#[derive(Debug, Clone)]
pub struct Tile {
    pub kind: TileKind,
    /// Local-space boundaries, origin at the tile's top left corner
    pub bounds: Vec<Boundary>,
    pub solid: bool,
    /// Active tiles receive signals and think
    pub active: bool,
    pub signals: SignalQueue<Signal>,
    pub state: TileState,
}

impl Tile {
    /// Tile of `kind` with explicit boundaries
    pub fn new(kind: TileKind, bounds: Vec<Boundary>) -> Self {
        let def = kind.def();
        Self {
            kind,
            bounds,
            solid: def.solid,
            active: def.active,
            signals: SignalQueue::new(),
            state: kind.initial_state(),
        }
    }

    /// Tile of `kind` whose only boundary is its full square
    pub fn filled(kind: TileKind, tile_size: IVec2) -> Self {
        Self::new(kind, vec![Boundary::rect(0, 0, tile_size.x, tile_size.y)])
    }
}

/// One layer of the map
#[derive(Debug, Clone)]
pub struct Layer {
    /// Size in tiles
    size: IVec2,
    /// Row-major
    tiles: Vec<Option<Tile>>,
}

impl Layer {
    fn new(size: IVec2) -> Self {
        let size = size.max(IVec2::ONE);
        Self {
            size,
            tiles: vec![None; (size.x * size.y) as usize],
        }
    }

    /// Size in tiles
    pub fn size(&self) -> IVec2 {
        self.size
    }

    #[inline]
    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.size.x && cell.y < self.size.y
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        self.contains(cell)
            .then(|| (cell.y * self.size.x + cell.x) as usize)
    }

    pub fn tile(&self, cell: IVec2) -> Option<&Tile> {
        self.index(cell).and_then(|i| self.tiles[i].as_ref())
    }

    pub fn tile_mut(&mut self, cell: IVec2) -> Option<&mut Tile> {
        self.index(cell).and_then(|i| self.tiles[i].as_mut())
    }

    /// Cells that hold a tile, row by row
    pub fn occupied(&self) -> impl Iterator<Item = (IVec2, &Tile)> {
        let w = self.size.x;
        self.tiles.iter().enumerate().filter_map(move |(i, t)| {
            t.as_ref()
                .map(|t| (IVec2::new(i as i32 % w, i as i32 / w), t))
        })
    }
}

/// The whole level
#[derive(Debug, Clone)]
pub struct TileMap {
    tile_size: IVec2,
    layers: Vec<Layer>,
}

impl TileMap {
    pub fn new(tile_size: IVec2) -> Self {
        Self {
            tile_size: tile_size.max(IVec2::ONE),
            layers: Vec::new(),
        }
    }

    /// Append an empty layer of `size` tiles; returns its index
    pub fn add_layer(&mut self, size: IVec2) -> usize {
        self.layers.push(Layer::new(size));
        self.layers.len() - 1
    }

    pub fn tile_size(&self) -> IVec2 {
        self.tile_size
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, layer: usize) -> Option<&Layer> {
        self.layers.get(layer)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    fn layer_or_err(&self, layer: usize) -> Result<&Layer, WorldError> {
        self.layers.get(layer).ok_or(WorldError::LayerOutOfRange {
            layer,
            count: self.layers.len(),
        })
    }

    /// Top left corner of a cell in real coordinates
    #[inline]
    pub fn map_to_real(&self, cell: IVec2) -> IVec2 {
        cell * self.tile_size
    }

    /// Cell containing a real position
    #[inline]
    pub fn real_to_map(&self, pos: IVec2) -> IVec2 {
        pos.div_euclid(self.tile_size)
    }

    /// Layer size in real coordinates
    pub fn real_extent(&self, layer: usize) -> Option<IVec2> {
        self.layers.get(layer).map(|l| self.map_to_real(l.size))
    }

    /// Put `tile` at `cell`, replacing whatever was there
    pub fn place_tile(&mut self, layer: usize, cell: IVec2, tile: Tile) -> Result<(), WorldError> {
        let count = self.layers.len();
        let l = self
            .layers
            .get_mut(layer)
            .ok_or(WorldError::LayerOutOfRange { layer, count })?;
        let Some(i) = l.index(cell) else {
            return Err(WorldError::OutOfBounds {
                what: "cell",
                pos: cell,
                layer,
                extent: l.size,
            });
        };
        l.tiles[i] = Some(tile);
        Ok(())
    }

    /// Put a filled tile of `kind` at `cell`
    pub fn place(&mut self, layer: usize, cell: IVec2, kind: TileKind) -> Result<(), WorldError> {
        self.place_tile(layer, cell, Tile::filled(kind, self.tile_size))
    }

    /// Fill the inclusive cell range `from..=to` with `kind`
    pub fn fill(&mut self, layer: usize, from: IVec2, to: IVec2, kind: TileKind) -> Result<(), WorldError> {
        self.layer_or_err(layer)?;
        let (lo, hi) = (from.min(to), from.max(to));
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                self.place(layer, IVec2::new(x, y), kind)?;
            }
        }
        Ok(())
    }

    pub fn tile(&self, layer: usize, cell: IVec2) -> Option<&Tile> {
        self.layers.get(layer)?.tile(cell)
    }

    pub fn tile_mut(&mut self, layer: usize, cell: IVec2) -> Option<&mut Tile> {
        self.layers.get_mut(layer)?.tile_mut(cell)
    }

    /// Queue a signal on a tile. Only active tiles accept signals; returns
    /// whether it was queued.
    pub fn send_signal(&mut self, layer: usize, cell: IVec2, signal: Signal) -> bool {
        match self.tile_mut(layer, cell) {
            Some(tile) if tile.active => {
                tile.signals.push(signal);
                true
            }
            _ => false,
        }
    }

    /// Every active tile in every layer, by layer then row
    pub fn active_tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.layers
            .iter_mut()
            .flat_map(|l| l.tiles.iter_mut().flatten())
            .filter(|t| t.active)
    }
}
