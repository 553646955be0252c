use crate::cells::Cell;
use crate::grid::Grid;
use crate::utils::{fnv_hashmap, FnvHashMap};

use itertools::Itertools;
use std::fmt;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum PathError {
    InvalidCell,
    NoPathFound,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PathError::InvalidCell => write!(f, "path endpoint is outside the grid"),
            PathError::NoPathFound => write!(f, "no open route between the endpoints"),
        }
    }
}

impl ::std::error::Error for PathError {
    fn description(&self) -> &str {
        match *self {
            PathError::InvalidCell => "path endpoint is outside the grid",
            PathError::NoPathFound => "no open route between the endpoints",
        }
    }
}

/// Steps from a start cell to every cell reachable through open walls.
///
/// Passages are unweighted so a breadth-first frontier sweep assigns each
/// cell its final distance the first time it is touched. The distance map
/// doubles as the visited set.
#[derive(Debug, Clone)]
pub struct Distances {
    start: Cell,
    distances: FnvHashMap<Cell, u32>,
}

impl Distances {
    /// Flood-fill distances over `grid`. None when `start` is out of bounds.
    pub fn for_grid(grid: &Grid, start: Cell) -> Option<Distances> {
        if !grid.is_valid_cell(start) {
            return None;
        }

        let mut distances = fnv_hashmap(grid.size());
        distances.insert(start, 0);

        let mut frontier = vec![start];
        while !frontier.is_empty() {
            let mut next_frontier = Vec::new();
            for &cell in &frontier {
                let steps = distances[&cell];
                for &passage in &*grid.open_neighbours(cell) {
                    if !distances.contains_key(&passage) {
                        distances.insert(passage, steps + 1);
                        next_frontier.push(passage);
                    }
                }
            }
            frontier = next_frontier;
        }

        Some(Distances { start, distances })
    }

    #[inline]
    pub fn start(&self) -> Cell {
        self.start
    }

    #[inline]
    pub fn distance_from_start_to(&self, cell: Cell) -> Option<u32> {
        self.distances.get(&cell).cloned()
    }
}

/// Walk from `end` back towards the start of `distances`, always stepping to
/// an open neighbour strictly closer to the start. None when `end` was never
/// reached by the flood fill.
pub fn shortest_path(grid: &Grid, distances: &Distances, end: Cell) -> Option<Vec<Cell>> {
    distances.distance_from_start_to(end)?;

    let start = distances.start();
    let mut path = vec![end];
    let mut current = end;

    while current != start {
        let steps_here = distances.distance_from_start_to(current)
            .expect("every cell on the walk came from the distance map");

        let closer = grid.open_neighbours(current)
            .iter()
            .filter_map(|&passage| {
                distances.distance_from_start_to(passage).map(|steps| (passage, steps))
            })
            .fold1(|best, candidate| if candidate.1 < best.1 { candidate } else { best });

        match closer {
            Some((cell, steps)) if steps < steps_here => {
                current = cell;
                path.push(current);
            }
            // No neighbour makes progress: the distance data does not belong
            // to this grid any more.
            _ => return None,
        }
    }

    path.reverse();
    Some(path)
}

/// Shortest route between two cells by cell count, using open walls only.
///
/// On a perfect maze the route is the unique simple path between the
/// endpoints; once walls have been broken several routes can exist and ties
/// in length fall to whichever route the sweep reached first.
pub fn find_path(grid: &Grid, start: Cell, end: Cell) -> Result<Vec<Cell>, PathError> {
    if !grid.is_valid_cell(start) || !grid.is_valid_cell(end) {
        return Err(PathError::InvalidCell);
    }
    if start == end {
        return Ok(vec![start]);
    }

    let distances = Distances::for_grid(grid, start).ok_or(PathError::InvalidCell)?;
    shortest_path(grid, &distances, end).ok_or(PathError::NoPathFound)
}
