//! Course grid: terrain tiles plus a parallel slope layer
//!
//! The grid is a fixed 16x32 matrix addressed by `Position`. Positions are
//! signed so neighbour candidates that fall off the edge can still be
//! expressed; callers filter them with `Grid::in_bounds`.

use serde::{Deserialize, Serialize};

use crate::consts::{GRID_HEIGHT, GRID_WIDTH};

/// Terrain kind of a single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Rough,
    Fairway,
    Sand,
    Water,
    Tree,
    Tee,
    Hole,
    Green,
}

impl Tile {
    /// Display colour used by the renderer (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            Tile::Rough => 0x0e875b,
            Tile::Fairway => 0x02b543,
            Tile::Sand => 0xffc9a5,
            Tile::Water => 0x29adff,
            // Trees sit on rough-coloured ground
            Tile::Tree => 0x0e875b,
            Tile::Tee => 0xff6b6b,
            Tile::Hole => 0xffd700,
            Tile::Green => 0x90ee90,
        }
    }

    /// Single-character glyph for text dumps
    pub fn glyph(&self) -> char {
        match self {
            Tile::Rough => '.',
            Tile::Fairway => '=',
            Tile::Sand => ':',
            Tile::Water => '~',
            Tile::Tree => 'T',
            Tile::Tee => 'S',
            Tile::Hole => 'O',
            Tile::Green => 'g',
        }
    }

    /// Ball can never come to rest here
    pub fn is_hazard(&self) -> bool {
        matches!(self, Tile::Tree | Tile::Water)
    }
}

/// A grid coordinate. Only `0 <= x < 16`, `0 <= y < 32` addresses a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset by a delta
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan(self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Max of the axis distances (number of king moves)
    pub fn chebyshev(self, other: Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

/// Unit offsets of the 8 neighbours, in scan order (NW, N, NE, W, E, SW, S, SE)
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Compass direction a sloped tile pushes the ball. North is -y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlopeDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl SlopeDirection {
    pub const ALL: [SlopeDirection; 8] = [
        SlopeDirection::North,
        SlopeDirection::NorthEast,
        SlopeDirection::East,
        SlopeDirection::SouthEast,
        SlopeDirection::South,
        SlopeDirection::SouthWest,
        SlopeDirection::West,
        SlopeDirection::NorthWest,
    ];

    pub fn delta(&self) -> (i32, i32) {
        match self {
            SlopeDirection::North => (0, -1),
            SlopeDirection::NorthEast => (1, -1),
            SlopeDirection::East => (1, 0),
            SlopeDirection::SouthEast => (1, 1),
            SlopeDirection::South => (0, 1),
            SlopeDirection::SouthWest => (-1, 1),
            SlopeDirection::West => (-1, 0),
            SlopeDirection::NorthWest => (-1, -1),
        }
    }

    pub fn arrow(&self) -> char {
        match self {
            SlopeDirection::North => '↑',
            SlopeDirection::NorthEast => '↗',
            SlopeDirection::East => '→',
            SlopeDirection::SouthEast => '↘',
            SlopeDirection::South => '↓',
            SlopeDirection::SouthWest => '↙',
            SlopeDirection::West => '←',
            SlopeDirection::NorthWest => '↖',
        }
    }

    /// Cell one step downhill from `pos`
    pub fn step(&self, pos: Position) -> Position {
        let (dx, dy) = self.delta();
        pos.offset(dx, dy)
    }
}

/// Tile matrix with a parallel optional-slope matrix, stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    tiles: Vec<Tile>,
    slopes: Vec<Option<SlopeDirection>>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub const WIDTH: i32 = GRID_WIDTH;
    pub const HEIGHT: i32 = GRID_HEIGHT;

    /// All-rough grid with no slopes
    pub fn new() -> Self {
        let len = (Self::WIDTH * Self::HEIGHT) as usize;
        Self {
            tiles: vec![Tile::Rough; len],
            slopes: vec![None; len],
        }
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < Self::WIDTH && pos.y >= 0 && pos.y < Self::HEIGHT
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        assert!(self.in_bounds(pos), "position {:?} out of bounds", pos);
        (pos.y * Self::WIDTH + pos.x) as usize
    }

    /// Tile at `pos`. Panics when `pos` is outside the grid; use `try_get`
    /// for positions that may be off it.
    pub fn get(&self, pos: Position) -> Tile {
        self.tiles[self.index(pos)]
    }

    /// Tile at `pos`, or `None` off the grid
    pub fn try_get(&self, pos: Position) -> Option<Tile> {
        self.in_bounds(pos).then(|| self.get(pos))
    }

    pub fn set(&mut self, pos: Position, tile: Tile) {
        let idx = self.index(pos);
        self.tiles[idx] = tile;
    }

    pub fn slope(&self, pos: Position) -> Option<SlopeDirection> {
        self.slopes[self.index(pos)]
    }

    pub fn set_slope(&mut self, pos: Position, slope: SlopeDirection) {
        let idx = self.index(pos);
        self.slopes[idx] = Some(slope);
    }

    /// The 8 surrounding candidates (not bounds-checked)
    pub fn neighbors8(pos: Position) -> [Position; 8] {
        NEIGHBOR_OFFSETS.map(|(dx, dy)| pos.offset(dx, dy))
    }

    /// In-bounds neighbours of `pos` that are still rough
    pub fn rough_neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        Self::neighbors8(pos)
            .into_iter()
            .filter(|&n| self.in_bounds(n) && self.get(n) == Tile::Rough)
    }

    /// Every position in row-major order
    pub fn positions() -> impl Iterator<Item = Position> {
        (0..Self::HEIGHT).flat_map(|y| (0..Self::WIDTH).map(move |x| Position::new(x, y)))
    }

    /// Positions holding `tile`, row-major
    pub fn positions_of(&self, tile: Tile) -> Vec<Position> {
        Self::positions().filter(|&p| self.get(p) == tile).collect()
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    pub fn slope_count(&self) -> usize {
        self.slopes.iter().filter(|s| s.is_some()).count()
    }

    /// Row-major tile slice
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Row-major slope slice
    pub fn slopes(&self) -> &[Option<SlopeDirection>] {
        &self.slopes
    }

    /// Text rendering, one line per row. Slopes on plain tiles show as arrows.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(((Self::WIDTH + 1) * Self::HEIGHT) as usize * 3);
        for y in 0..Self::HEIGHT {
            for x in 0..Self::WIDTH {
                let pos = Position::new(x, y);
                let tile = self.get(pos);
                match self.slope(pos) {
                    Some(slope) if matches!(tile, Tile::Rough | Tile::Fairway) => {
                        out.push(slope.arrow())
                    }
                    _ => out.push(tile.glyph()),
                }
            }
            out.push('\n');
        }
        out
    }
}
