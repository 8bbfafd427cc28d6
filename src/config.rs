use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Runtime settings for the simulator. Bounds checking of requested
/// floors belongs to the dispatcher, not the queue, so the serviced range
/// lives here.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lowest_floor: i32,
    pub highest_floor: i32,
    /// Simulated time to travel between adjacent floors, in milliseconds.
    pub floor_travel_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            lowest_floor: 1,
            highest_floor: 10,
            floor_travel_ms: 500,
        }
    }
}

impl Config {
    /// Loads settings from a TOML file, falling back to the defaults when
    /// the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Config::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config =
            toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))?;
        anyhow::ensure!(
            config.lowest_floor < config.highest_floor,
            "lowest_floor must be below highest_floor"
        );
        Ok(config)
    }

    pub fn floor_travel(&self) -> Duration {
        Duration::from_millis(self.floor_travel_ms)
    }
}
