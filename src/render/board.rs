use crate::game::{Position, Tile, TileSink};

/// Persistent picture of the board, updated one tile at a time
///
/// The engine only reports tiles that change, so this buffer is what the
/// renderer draws from.
#[derive(Debug, Clone)]
pub struct TileBuffer {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::Empty; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile at `pos`; anything off the board reads as empty
    pub fn get(&self, pos: Position) -> Tile {
        self.index(pos).map_or(Tile::Empty, |i| self.tiles[i])
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let in_bounds = pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height;
        in_bounds.then(|| pos.y as usize * self.width + pos.x as usize)
    }
}

impl TileSink for TileBuffer {
    fn draw_tile(&mut self, pos: Position, tile: Tile) {
        if let Some(i) = self.index(pos) {
            self.tiles[i] = tile;
        }
    }
}
