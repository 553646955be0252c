use crate::cells::Cell;
use crate::grid::Grid;
use crate::utils::{fnv_hashset, FnvHashSet};

use rand::{Rng, XorShiftRng};

/// One unit of generation progress: `to` is newly carved, reached by
/// removing the wall from `from`. The seed cell reports itself as both ends
/// since no wall is removed to reach it.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct CarveEvent {
    pub from: Cell,
    pub to: Cell,
}

impl CarveEvent {
    pub fn is_seed(&self) -> bool {
        self.from == self.to
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
enum CarverState {
    NotStarted,
    Running,
    Done,
}

/// Randomized depth-first carving of a spanning tree over the grid graph,
/// one cell per step.
///
/// The frontier is a stack of `(from, to)` candidate pairs so corridors run
/// deep before backtracking. Stale candidates are tolerated: a pair queued
/// before a competing corridor reached `to` first is simply discarded when
/// popped. Each successful step carves `to` and opens the connecting wall on
/// the grid together, then returns the event so a host can redraw
/// incrementally.
///
/// Resetting the grid mid-run leaves a carver talking about cells that no
/// longer exist; drop it and construct a fresh one.
#[derive(Debug)]
pub struct DfsCarver {
    frontier: Vec<(Cell, Cell)>,
    seen: FnvHashSet<Cell>,
    state: CarverState,
}

impl DfsCarver {
    /// A carver for `grid` that will start at the top left cell.
    pub fn new(grid: &Grid) -> DfsCarver {
        let seed = Cell::new(0, 0);
        DfsCarver {
            frontier: vec![(seed, seed)],
            seen: fnv_hashset(grid.size()),
            state: CarverState::NotStarted,
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == CarverState::Done
    }

    /// Produce the next carve event, applying it to the grid, or None once
    /// every cell is carved. Calling again after exhaustion keeps returning
    /// None and never touches the grid.
    pub fn next_carve(&mut self, grid: &mut Grid, rng: &mut XorShiftRng) -> Option<CarveEvent> {
        if self.state == CarverState::Done {
            return None;
        }
        self.state = CarverState::Running;

        while let Some((from, to)) = self.frontier.pop() {
            if self.seen.contains(&to) {
                continue;
            }
            self.seen.insert(to);

            grid.carve(to);
            grid.open_wall(from, to)
                .expect("frontier only ever holds grid-adjacent cell pairs");

            // Per-expansion shuffling is what makes the spanning tree random
            // rather than a fixed depth-first order.
            let mut candidates: Vec<(Cell, Cell)> = grid.neighbours(to)
                .iter()
                .cloned()
                .filter(|&neighbour| !grid.is_carved(neighbour))
                .map(|neighbour| (to, neighbour))
                .collect();
            rng.shuffle(&mut candidates);
            self.frontier.extend(candidates);

            return Some(CarveEvent { from, to });
        }

        self.state = CarverState::Done;
        None
    }
}

/// Carve a complete maze in one call. Returns the number of carve events,
/// which is always the cell count of the grid.
pub fn recursive_backtracker(grid: &mut Grid, rng: &mut XorShiftRng) -> usize {
    let mut carver = DfsCarver::new(grid);
    let mut events = 0;
    while carver.next_carve(grid, rng).is_some() {
        events += 1;
    }
    events
}

/// Open each currently closed wall with independent probability
/// `probability`, adding loops to a perfect maze.
///
/// Walls already open are never reconsidered, so repeated calls only ever
/// increase openness. Returns the newly connected cell pairs in matrix visit
/// order (vertical walls row by row, then horizontal walls) so a host can
/// redraw just those walls.
pub fn break_walls(grid: &mut Grid, probability: f64, rng: &mut XorShiftRng) -> Vec<(Cell, Cell)> {
    let mut opened = Vec::new();

    for row in 0..grid.height() {
        for col in 1..grid.width() {
            let west = Cell::new(row, col - 1);
            let east = Cell::new(row, col);
            if !grid.is_open(west, east) && rng.next_f64() < probability {
                grid.open_wall(west, east).expect("wall slots are grid-adjacent");
                opened.push((west, east));
            }
        }
    }
    for row in 1..grid.height() {
        for col in 0..grid.width() {
            let north = Cell::new(row - 1, col);
            let south = Cell::new(row, col);
            if !grid.is_open(north, south) && rng.next_f64() < probability {
                grid.open_wall(north, south).expect("wall slots are grid-adjacent");
                opened.push((north, south));
            }
        }
    }

    opened
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::grid::Grid;
    use crate::pathing::Distances;
    use crate::units::{Height, Width};
    use quickcheck::{quickcheck, TestResult};
    use rand::{SeedableRng, XorShiftRng};

    fn grid(w: u32, h: u32) -> Grid {
        Grid::new(Width(w), Height(h)).expect("grid construction failed")
    }

    fn seeded_rng(seed: u32) -> XorShiftRng {
        XorShiftRng::from_seed([seed ^ 0x193a_6754,
                                seed ^ 0xa8a7_d469,
                                seed ^ 0x9783_0e05,
                                seed ^ 0x113b_a7bb])
    }

    fn open_wall_pairs(g: &Grid) -> Vec<(Cell, Cell)> {
        let mut pairs = Vec::new();
        for cell in g.iter() {
            let east = Cell::new(cell.row, cell.col + 1);
            let south = Cell::new(cell.row + 1, cell.col);
            if g.is_open(cell, east) {
                pairs.push((cell, east));
            }
            if g.is_open(cell, south) {
                pairs.push((cell, south));
            }
        }
        pairs
    }

    #[test]
    fn first_event_is_the_seed_cell() {
        let mut g = grid(4, 4);
        let mut rng = seeded_rng(1);
        let mut carver = DfsCarver::new(&g);

        let first = carver.next_carve(&mut g, &mut rng).expect("no first event");
        assert!(first.is_seed());
        assert_eq!(first.to, Cell::new(0, 0));
        assert!(g.is_carved(Cell::new(0, 0)));
        assert_eq!(g.open_walls_count(), 0);
    }

    #[test]
    fn full_run_carves_a_spanning_tree() {
        let mut g = grid(6, 5);
        let mut rng = seeded_rng(2);

        let events = recursive_backtracker(&mut g, &mut rng);
        assert_eq!(events, 30);
        assert_eq!(g.carved_count(), 30);
        // A connected graph on n vertices with n-1 edges is a tree.
        assert_eq!(g.open_walls_count(), 29);

        let distances = Distances::for_grid(&g, Cell::new(0, 0)).expect("bad start cell");
        let reached = g.iter().filter(|&c| distances.distance_from_start_to(c).is_some()).count();
        assert_eq!(reached, 30);
    }

    #[test]
    fn every_event_connects_to_the_carved_region() {
        let mut g = grid(5, 5);
        let mut rng = seeded_rng(3);
        let mut carver = DfsCarver::new(&g);

        let mut carved_so_far = 0;
        while let Some(event) = carver.next_carve(&mut g, &mut rng) {
            if carved_so_far == 0 {
                assert!(event.is_seed());
            } else {
                assert!(g.is_carved(event.from));
                assert!(event.from.is_adjacent_to(event.to));
                assert!(g.is_open(event.from, event.to));
            }
            carved_so_far += 1;
        }
        assert_eq!(carved_so_far, 25);
    }

    #[test]
    fn exhausted_carver_keeps_signalling_exhaustion() {
        let mut g = grid(3, 3);
        let mut rng = seeded_rng(4);
        let mut carver = DfsCarver::new(&g);

        while carver.next_carve(&mut g, &mut rng).is_some() {}
        assert!(carver.is_done());

        let walls_after_done = g.open_walls_count();
        for _ in 0..5 {
            assert!(carver.next_carve(&mut g, &mut rng).is_none());
        }
        assert!(carver.is_done());
        assert_eq!(g.open_walls_count(), walls_after_done);
    }

    #[test]
    fn same_seed_reproduces_the_same_maze() {
        let mut first = grid(8, 8);
        let mut second = grid(8, 8);
        recursive_backtracker(&mut first, &mut seeded_rng(99));
        recursive_backtracker(&mut second, &mut seeded_rng(99));

        assert_eq!(open_wall_pairs(&first), open_wall_pairs(&second));
    }

    #[test]
    fn regeneration_after_reset_is_a_fresh_tree() {
        let mut g = grid(5, 4);
        let mut rng = seeded_rng(5);
        recursive_backtracker(&mut g, &mut rng);

        g.reset();
        assert_eq!(g.carved_count(), 0);
        assert_eq!(g.open_walls_count(), 0);

        recursive_backtracker(&mut g, &mut rng);
        assert_eq!(g.carved_count(), 20);
        assert_eq!(g.open_walls_count(), 19);
    }

    #[test]
    fn single_cell_maze_generates() {
        let mut g = grid(1, 1);
        let mut rng = seeded_rng(6);
        assert_eq!(recursive_backtracker(&mut g, &mut rng), 1);
        assert!(g.is_carved(Cell::new(0, 0)));
        assert_eq!(g.open_walls_count(), 0);
    }

    #[test]
    fn breaking_with_certainty_opens_every_wall() {
        let mut g = grid(5, 4);
        let mut rng = seeded_rng(7);
        recursive_backtracker(&mut g, &mut rng);

        let closed_before = g.wall_slots_count() - g.open_walls_count();
        let opened = break_walls(&mut g, 1.0, &mut rng);
        assert_eq!(opened.len(), closed_before);
        assert_eq!(g.open_walls_count(), g.wall_slots_count());
    }

    #[test]
    fn breaking_with_probability_zero_changes_nothing() {
        let mut g = grid(5, 4);
        let mut rng = seeded_rng(8);
        recursive_backtracker(&mut g, &mut rng);

        let walls_before = g.open_walls_count();
        let opened = break_walls(&mut g, 0.0, &mut rng);
        assert!(opened.is_empty());
        assert_eq!(g.open_walls_count(), walls_before);
    }

    #[test]
    fn breaking_is_monotonic_across_calls() {
        let mut g = grid(6, 6);
        let mut rng = seeded_rng(9);
        recursive_backtracker(&mut g, &mut rng);

        let first_pass = break_walls(&mut g, 0.5, &mut rng);
        let open_after_first = open_wall_pairs(&g);
        assert_eq!(open_after_first.len(), 35 + first_pass.len());

        let second_pass = break_walls(&mut g, 0.5, &mut rng);
        let open_after_second = open_wall_pairs(&g);
        assert_eq!(open_after_second.len(), open_after_first.len() + second_pass.len());
        for pair in &open_after_first {
            assert!(open_after_second.contains(pair));
        }
    }

    #[test]
    fn broken_wall_report_matches_the_grid() {
        let mut g = grid(4, 4);
        let mut rng = seeded_rng(10);
        recursive_backtracker(&mut g, &mut rng);

        let opened = break_walls(&mut g, 0.5, &mut rng);
        for &(a, b) in &opened {
            assert!(a.is_adjacent_to(b));
            assert!(g.is_open(a, b));
        }
    }

    #[test]
    fn quickcheck_generated_mazes_are_perfect() {
        fn prop(w: u8, h: u8, seed: u32) -> TestResult {
            let (w, h) = (u32::from(w % 12) + 1, u32::from(h % 12) + 1);
            let mut g = Grid::new(Width(w), Height(h)).expect("grid construction failed");
            let mut rng = seeded_rng(seed);

            let cells = (w * h) as usize;
            let events = recursive_backtracker(&mut g, &mut rng);
            if events != cells || g.carved_count() != cells {
                return TestResult::failed();
            }
            if g.open_walls_count() != cells - 1 {
                return TestResult::failed();
            }

            let distances = match Distances::for_grid(&g, Cell::new(0, 0)) {
                Some(d) => d,
                None => return TestResult::failed(),
            };
            let all_reached =
                g.iter().all(|c| distances.distance_from_start_to(c).is_some());
            TestResult::from_bool(all_reached)
        }
        quickcheck(prop as fn(u8, u8, u32) -> TestResult);
    }
}
