use super::state::Position;

/// Which tiles are covered by the snake
///
/// Stored row-major in a flat vector. The apple is tracked separately and is
/// never marked here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    tiles: Vec<bool>,
}

impl OccupancyGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Check if a position is within the grid bounds
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.y as usize * self.width + pos.x as usize)
    }

    /// Whether the snake covers `pos`; out-of-bounds positions are not occupied
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.index(pos).is_some_and(|i| self.tiles[i])
    }

    /// A move onto `pos` would be fatal: off the grid or onto the snake
    pub fn is_blocked(&self, pos: Position) -> bool {
        match self.index(pos) {
            Some(i) => self.tiles[i],
            None => true,
        }
    }

    /// Mark `pos` occupied. Returns false if `pos` is out of bounds.
    pub fn set(&mut self, pos: Position) -> bool {
        self.write(pos, true)
    }

    /// Mark `pos` free. Returns false if `pos` is out of bounds.
    pub fn clear(&mut self, pos: Position) -> bool {
        self.write(pos, false)
    }

    fn write(&mut self, pos: Position, value: bool) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.tiles[i] = value;
                true
            }
            None => false,
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.tiles.iter().filter(|&&t| t).count()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Every position on the grid, row by row
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| Position::new(x as i32, y as i32))
        })
    }
}
