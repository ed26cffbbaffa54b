//! Configuration of the game.

use semver::Version;

pub const APP_NAME: &str = env!("CARGO_CRATE_NAME", "binary must be compiled by Cargo");

const APP_VERSION_STR: &str = env!("CARGO_PKG_VERSION", "binary must be compiled by Cargo");

/// This struct represents general configuration of the game.
#[derive(Debug, Clone)]
pub struct Config {
    name: String,
    version: Version,
    frames: u64,
    view_distance: i32,
    max_entities: usize,
}

impl Config {
    pub fn new(
        name: String,
        version: Version,
        frames: u64,
        view_distance: i32,
        max_entities: usize,
    ) -> Self {
        Self {
            name,
            version,
            frames,
            view_distance,
            max_entities,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Count of frames to simulate before exit.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Radius of loaded area around the camera, in chunks.
    pub fn view_distance(&self) -> i32 {
        self.view_distance
    }

    /// Limit of live entities of the world.
    pub fn max_entities(&self) -> usize {
        self.max_entities
    }
}

impl Default for Config {
    fn default() -> Self {
        let version = Version::parse(APP_VERSION_STR).unwrap_or_else(|_| Version::new(0, 0, 0));
        Self::new(APP_NAME.to_string(), version, 1000, 4, 5000)
    }
}
