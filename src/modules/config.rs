//! Run configuration, read from a TOML file.
//!
//! Every section and field is optional; anything left out falls back to the
//! default shown here.
//!
//! ```toml
//! [world]
//! width = 25
//! height = 25
//! # seed = 42
//!
//! [snake]
//! x = 4
//! y = 1
//! size = 4
//!
//! [run]
//! # ticks = 500
//! tick_rate = 10.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::modules::error::{Result, SimError};

pub const DEFAULT_CONFIG_FILE: &str = "snakesim.toml";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: i32,
    pub height: i32,
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 25,
            height: 25,
            seed: None,
        }
    }
}

/// Placement of the first snake. It is laid out horizontally with its head
/// at `(x, y)` and the body trailing toward smaller `x`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SnakeConfig {
    pub x: i32,
    pub y: i32,
    pub size: usize,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self { x: 4, y: 1, size: 4 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Stop after this many ticks; run until interrupted when unset.
    pub ticks: Option<u64>,
    /// Ticks per second. Zero disables pacing.
    pub tick_rate: f64,
}

impl RunConfig {
    /// Pause between ticks. Zero when pacing is disabled.
    pub fn tick_delay(&self) -> Result<Duration> {
        if !self.tick_rate.is_finite() || self.tick_rate < 0.0 {
            return Err(SimError::invalid_config(format!(
                "tick_rate must be a non-negative number (got {})",
                self.tick_rate
            )));
        }
        if self.tick_rate == 0.0 {
            return Ok(Duration::ZERO);
        }
        Duration::try_from_secs_f64(1.0 / self.tick_rate).map_err(|_| {
            SimError::invalid_config(format!(
                "tick_rate {} is too small to pace ticks",
                self.tick_rate
            ))
        })
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticks: None,
            tick_rate: 10.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub snake: SnakeConfig,
    pub run: RunConfig,
}

impl SimConfig {
    /// Reads `path`, or returns the defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_toml_string()?)?;
        Ok(path.to_path_buf())
    }

    /// Rejects settings that cannot produce a world with the first snake
    /// fully on the grid.
    pub fn validate(&self) -> Result<()> {
        let WorldConfig { width, height, .. } = self.world;
        let SnakeConfig { x, y, size } = self.snake;

        if width <= 0 || height <= 0 {
            return Err(SimError::invalid_config(format!(
                "grid must be at least 1x1 (got {}x{})",
                width, height
            )));
        }
        if size == 0 {
            return Err(SimError::invalid_config("snake size must be at least 1"));
        }
        if x < 0 || x >= width || y < 0 || y >= height {
            return Err(SimError::invalid_config(format!(
                "snake head ({}, {}) is outside the {}x{} grid",
                x, y, width, height
            )));
        }
        let tail_x = i64::from(x) - (size as i64 - 1);
        if tail_x < 0 {
            return Err(SimError::invalid_config(format!(
                "snake of size {} does not fit left of x = {}",
                size, x
            )));
        }
        self.run.tick_delay()?;
        Ok(())
    }
}
