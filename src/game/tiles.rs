//! Tile deltas emitted by the simulation for the presentation layer

use super::state::Position;

/// What a tile shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tile {
    #[default]
    Empty,
    Snake,
    Apple,
}

/// A single tile change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileDelta {
    pub pos: Position,
    pub tile: Tile,
}

/// Receiver of tile changes
///
/// The engine calls `draw_tile` once per changed tile and the session calls
/// `present` once per tick.
pub trait TileSink {
    fn draw_tile(&mut self, pos: Position, tile: Tile);

    fn present(&mut self) {}
}

/// Collects deltas in order
impl TileSink for Vec<TileDelta> {
    fn draw_tile(&mut self, pos: Position, tile: Tile) {
        self.push(TileDelta { pos, tile });
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TileSink for NullSink {
    fn draw_tile(&mut self, _pos: Position, _tile: Tile) {}
}
