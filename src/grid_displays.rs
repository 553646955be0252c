use crate::cells::{Cell, CellSmallVec};
use crate::grid::Grid;
use crate::utils::FnvHashSet;

use std::fmt;

/// Renders the three character body of one cell when a grid is printed.
/// Injected into a grid by the host to overlay routes or markers on the
/// text output.
pub trait GridDisplay {
    fn render_cell_body(&self, cell: Cell) -> String;
}

/// Marks the cells of a route with dots.
#[derive(Debug)]
pub struct PathDisplay {
    on_path: FnvHashSet<Cell>,
}

impl PathDisplay {
    pub fn new(path: &[Cell]) -> PathDisplay {
        PathDisplay { on_path: path.iter().cloned().collect() }
    }
}

impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, cell: Cell) -> String {
        if self.on_path.contains(&cell) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}

/// Marks route endpoints with S and E.
#[derive(Debug)]
pub struct StartEndPointsDisplay {
    starts: CellSmallVec,
    ends: CellSmallVec,
}

impl StartEndPointsDisplay {
    pub fn new(starts: CellSmallVec, ends: CellSmallVec) -> StartEndPointsDisplay {
        StartEndPointsDisplay { starts, ends }
    }
}

impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, cell: Cell) -> String {
        if self.starts.iter().any(|&c| c == cell) {
            String::from(" S ")
        } else if self.ends.iter().any(|&c| c == cell) {
            String::from(" E ")
        } else {
            String::from("   ")
        }
    }
}

// Box drawing pieces for a wall junction, indexed by which of the four
// segments around the junction are present: left, right, up, down.
const JUNCTIONS: [&str; 16] = [" ", "╷", "╵", "│", "╶", "┌", "└", "├", "╴", "┐", "┘", "┤", "─",
                               "┬", "┴", "┼"];

fn junction(left: bool, right: bool, up: bool, down: bool) -> &'static str {
    let index =
        ((left as usize) << 3) | ((right as usize) << 2) | ((up as usize) << 1) | (down as usize);
    JUNCTIONS[index]
}

/// Is the horizontal wall segment above cell `(row, col)` drawn? Rows `0`
/// and `height` are the outer boundary and always drawn.
fn hwall_closed(grid: &Grid, row: u32, col: u32) -> bool {
    row == 0 || row == grid.height() ||
    !grid.is_open(Cell::new(row - 1, col), Cell::new(row, col))
}

/// Is the vertical wall segment left of cell `(row, col)` drawn? Columns `0`
/// and `width` are the outer boundary and always drawn.
fn vwall_closed(grid: &Grid, row: u32, col: u32) -> bool {
    col == 0 || col == grid.width() ||
    !grid.is_open(Cell::new(row, col - 1), Cell::new(row, col))
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (width, height) = (self.width(), self.height());
        let mut output = String::new();

        // Alternate wall boundary lines with cell body lines. An uncarved
        // region keeps all its walls closed so it prints as a block of
        // sealed boxes.
        for row in 0..=height {
            for col in 0..=width {
                let up = row > 0 && vwall_closed(self, row - 1, col);
                let down = row < height && vwall_closed(self, row, col);
                let left = col > 0 && hwall_closed(self, row, col - 1);
                let right = col < width && hwall_closed(self, row, col);
                output.push_str(junction(left, right, up, down));

                if col < width {
                    output.push_str(if hwall_closed(self, row, col) { "───" } else { "   " });
                }
            }
            output.push('\n');

            if row < height {
                for col in 0..width {
                    let cell = Cell::new(row, col);
                    output.push_str(if vwall_closed(self, row, col) { "│" } else { " " });
                    match *self.grid_display() {
                        Some(ref displayer) => {
                            output.push_str(displayer.render_cell_body(cell).as_str())
                        }
                        None => output.push_str("   "),
                    }
                }
                output.push('│');
                output.push('\n');
            }
        }

        write!(f, "{}", output)
    }
}
