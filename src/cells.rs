use smallvec::SmallVec;
use std::convert::From;
use std::fmt;

/// One grid position, row-major: `row` counts down from the top edge,
/// `col` counts right from the left edge.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

pub type CellSmallVec = SmallVec<[Cell; 4]>;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

/// Fixed probe order for neighbour queries, which keeps neighbour sets
/// deterministic for a given sequence of random draws.
pub const COMPASS: [Direction; 4] =
    [Direction::North, Direction::South, Direction::East, Direction::West];

impl Cell {
    pub fn new(row: u32, col: u32) -> Cell {
        Cell { row, col }
    }

    /// The coordinate one step away in `dir`, or None when that would leave
    /// the representable quadrant. Grid bounds are checked by the grid, not
    /// here.
    pub fn offset(self, dir: Direction) -> Option<Cell> {
        match dir {
            Direction::North => {
                if self.row > 0 {
                    Some(Cell::new(self.row - 1, self.col))
                } else {
                    None
                }
            }
            Direction::South => Some(Cell::new(self.row + 1, self.col)),
            Direction::East => Some(Cell::new(self.row, self.col + 1)),
            Direction::West => {
                if self.col > 0 {
                    Some(Cell::new(self.row, self.col - 1))
                } else {
                    None
                }
            }
        }
    }

    /// True when `other` is exactly one step away horizontally or vertically.
    pub fn is_adjacent_to(self, other: Cell) -> bool {
        let row_gap = if self.row > other.row { self.row - other.row } else { other.row - self.row };
        let col_gap = if self.col > other.col { self.col - other.col } else { other.col - self.col };
        row_gap + col_gap == 1
    }
}

impl From<(u32, u32)> for Cell {
    fn from(row_col_pair: (u32, u32)) -> Cell {
        Cell::new(row_col_pair.0, row_col_pair.1)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
