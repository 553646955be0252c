use serde_derive::Deserialize;

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Host configuration for the maze engine, built once at startup and passed
/// into whatever needs it. None of these knobs affect algorithmic
/// correctness, only sizing and pacing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cells per row.
    pub maze_width: u32,
    /// Cells per column.
    pub maze_height: u32,
    /// Wall clock budget in seconds for a stepped generation run, used only
    /// to derive how many carve events each tick should apply.
    pub max_generation_time: f64,
    /// Host tick rate the pacing calculation assumes.
    pub ticks_per_second: u32,
    /// Drain the whole generation in one call instead of paced slices.
    pub immediate: bool,
    /// Chance per closed wall of being opened by a wall breaking pass.
    pub wall_break_probability: f64,
    /// Route finding after generation. Off unless asked for.
    pub pathfinding: bool,
    /// Fixed random seed for reproducible mazes. Absent means fresh entropy
    /// per run.
    pub seed: Option<u32>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            maze_width: 20,
            maze_height: 20,
            max_generation_time: 5.0,
            ticks_per_second: 60,
            immediate: false,
            wall_break_probability: 0.0,
            pathfinding: false,
            seed: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConfigError::Io(ref e) => write!(f, "config file unreadable: {}", e),
            ConfigError::Parse(ref e) => write!(f, "config file malformed: {}", e),
        }
    }
}

impl ::std::error::Error for ConfigError {
    fn description(&self) -> &str {
        match *self {
            ConfigError::Io(_) => "config file unreadable",
            ConfigError::Parse(_) => "config file malformed",
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> ConfigError {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> ConfigError {
        ConfigError::Parse(e)
    }
}

impl Config {
    /// Read a TOML override file. Keys that are absent keep their defaults.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let mut text = String::new();
        File::open(path)?.read_to_string(&mut text)?;
        Ok(toml::from_str(&text)?)
    }

    /// Like `load` but a missing file is not an error, it just means the
    /// defaults apply.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        match File::open(path) {
            Ok(mut file) => {
                let mut text = String::new();
                file.read_to_string(&mut text)?;
                Ok(toml::from_str(&text)?)
            }
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(ConfigError::Io(e)),
        }
    }

    /// Carve events a stepped host should apply per tick so the whole maze
    /// lands inside the generation time budget. Never less than one.
    pub fn events_per_tick(&self) -> usize {
        let cells = f64::from(self.maze_width) * f64::from(self.maze_height);
        let tick_budget = f64::from(self.ticks_per_second) * self.max_generation_time;
        if tick_budget <= 0.0 {
            return cells as usize;
        }
        let per_tick = (cells / tick_budget).ceil() as usize;
        ::std::cmp::max(per_tick, 1)
    }
}
