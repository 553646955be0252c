#![cfg_attr(feature="clippy", feature(plugin))]
#![cfg_attr(feature="clippy", plugin(clippy))]

use docopt::Docopt;
use labyrinth::{
    cells::Cell,
    config::Config,
    generators::{self, DfsCarver},
    grid::Grid,
    grid_displays::{PathDisplay, StartEndPointsDisplay},
    pathing::{self, PathError},
    units::{Height, Width},
};
use rand::{SeedableRng, XorShiftRng};
use serde_derive::Deserialize;
use std::{
    fs::File,
    io,
    io::prelude::*,
    path::Path,
    rc::Rc
};

const USAGE: &str = "Labyrinth

Usage:
    labyrinth_driver -h | --help
    labyrinth_driver [--config=<path>] [--grid-width=<w>] [--grid-height=<h>] [--seed=<n>] [--immediate] [--break-walls=<p>] [--find-path] [--start-row=<r1> --start-col=<c1>] [--end-row=<r2> --end-col=<c2>] [--text-out=<path>]

Options:
    -h --help            Show this screen.
    --config=<path>      TOML configuration file. Without this flag a custom_config.toml in the working directory is used when present.
    --grid-width=<w>     Cells per row, overriding the configuration.
    --grid-height=<h>    Cells per column, overriding the configuration.
    --seed=<n>           Fixed random seed for a reproducible maze.
    --immediate          Generate in one burst rather than paced slices.
    --break-walls=<p>    Probability per closed wall of knocking it through after generation, adding loops.
    --find-path          Find a route and draw it on the maze.
    --start-row=<r1>     Row of the route start. The top left cell when omitted.
    --start-col=<c1>     Column of the route start.
    --end-row=<r2>       Row of the route end. The bottom right cell when omitted.
    --end-col=<c2>       Column of the route end.
    --text-out=<path>    Write the text rendering to a file instead of stdout.
";

#[derive(Debug, Deserialize)]
struct DriverArgs {
    flag_config: Option<String>,
    flag_grid_width: Option<u32>,
    flag_grid_height: Option<u32>,
    flag_seed: Option<u32>,
    flag_immediate: bool,
    flag_break_walls: Option<f64>,
    flag_find_path: bool,
    flag_start_row: Option<u32>,
    flag_start_col: Option<u32>,
    flag_end_row: Option<u32>,
    flag_end_col: Option<u32>,
    flag_text_out: String,
}

// Everything the driver can fail on funnels through one error chain so the
// process reports a message instead of crashing.
mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    let args: DriverArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;
    let config = resolve_config(&args)?;

    let mut grid = Grid::new(Width(config.maze_width), Height(config.maze_height))
        .chain_err(|| "constructing the maze grid")?;
    let mut rng = make_rng(config.seed);

    if config.immediate {
        generators::recursive_backtracker(&mut grid, &mut rng);
    } else {
        run_paced_generation(&mut grid, &config, &mut rng);
    }

    if config.wall_break_probability > 0.0 {
        generators::break_walls(&mut grid, config.wall_break_probability, &mut rng);
    }

    if config.pathfinding {
        set_route_display(&mut grid, &args)?;
    }

    let rendering = format!("{}", grid);
    if args.flag_text_out.is_empty() {
        print!("{}", rendering);
    } else {
        write_text_to_file(&rendering, &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    Ok(())
}

/// Defaults, overlaid by the optional TOML file, overlaid by command line
/// flags.
fn resolve_config(args: &DriverArgs) -> Result<Config> {
    let mut config = match args.flag_config {
            Some(ref path) => Config::load(Path::new(path)),
            None => Config::load_or_default(Path::new("custom_config.toml")),
        }
        .chain_err(|| "loading configuration")?;

    if let Some(width) = args.flag_grid_width {
        config.maze_width = width;
    }
    if let Some(height) = args.flag_grid_height {
        config.maze_height = height;
    }
    if let Some(seed) = args.flag_seed {
        config.seed = Some(seed);
    }
    if args.flag_immediate {
        config.immediate = true;
    }
    if let Some(probability) = args.flag_break_walls {
        config.wall_break_probability = probability;
    }
    if args.flag_find_path {
        config.pathfinding = true;
    }

    Ok(config)
}

fn make_rng(seed: Option<u32>) -> XorShiftRng {
    match seed {
        Some(s) => {
            XorShiftRng::from_seed([s ^ 0x193a_6754,
                                    s ^ 0xa8a7_d469,
                                    s ^ 0x9783_0e05,
                                    s ^ 0x113b_a7bb])
        }
        None => rand::weak_rng(),
    }
}

/// Apply carve events in tick sized slices, the way a render loop host
/// would. The terminal driver has nothing to draw between slices so they
/// run back to back, but the slicing itself is what keeps any single tick
/// bounded.
fn run_paced_generation(grid: &mut Grid, config: &Config, rng: &mut XorShiftRng) {
    let events_per_tick = config.events_per_tick();
    let mut carver = DfsCarver::new(grid);

    while !carver.is_done() {
        for _ in 0..events_per_tick {
            if carver.next_carve(grid, rng).is_none() {
                break;
            }
        }
    }
}

fn set_route_display(grid: &mut Grid, args: &DriverArgs) -> Result<()> {
    let start = Cell::new(args.flag_start_row.unwrap_or(0),
                          args.flag_start_col.unwrap_or(0));
    let end = Cell::new(args.flag_end_row.unwrap_or(grid.height() - 1),
                        args.flag_end_col.unwrap_or(grid.width() - 1));

    match pathing::find_path(grid, start, end) {
        Ok(path) => {
            grid.set_grid_display(Some(Rc::new(PathDisplay::new(&path))));
        }
        Err(PathError::NoPathFound) => {
            // Nothing to draw between disconnected endpoints, so at least
            // show where they are.
            let starts = [start].iter().cloned().collect();
            let ends = [end].iter().cloned().collect();
            grid.set_grid_display(Some(Rc::new(StartEndPointsDisplay::new(starts, ends))));
        }
        Err(e) => return Err(e).chain_err(|| "route finding"),
    }

    Ok(())
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
