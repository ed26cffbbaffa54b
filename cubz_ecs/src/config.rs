//! Configuration utilities for the ECS.

use semver::Version;

/// Maximum count of distinct component types, which is also the width of a
/// [`Signature`](crate::Signature).
pub const MAX_COMPONENTS: usize = 64;

/// Maximum count of live entities supported by the entity registry.
///
/// Larger limits are clamped to this value.
///
pub const MAX_ENTITIES: usize = (u32::MAX - 1) as usize;

/// Count of live entities allowed by [`Config::default`].
pub const DEFAULT_MAX_ENTITIES: usize = 5000;

/// Name of the ECS crate.
pub const ECS_NAME: &str = env!("CARGO_CRATE_NAME", "library must be compiled by Cargo");

const ECS_VERSION_STR: &str = env!("CARGO_PKG_VERSION", "library must be compiled by Cargo");
lazy_static::lazy_static! {
    /// Semantic version of the ECS crate.
    pub static ref ECS_VERSION: Version = Version::parse(ECS_VERSION_STR)
        .unwrap_or_else(|_| Version::new(0, 0, 0));
}

/// This struct represents configuration of the [`World`](crate::World).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    max_entities: usize,
}

impl Config {
    /// Creates new configuration with given limit of live entities.
    ///
    /// The limit is clamped to [`MAX_ENTITIES`].
    ///
    pub const fn new(max_entities: usize) -> Self {
        let max_entities = if max_entities > MAX_ENTITIES {
            MAX_ENTITIES
        } else {
            max_entities
        };
        Self { max_entities }
    }

    /// Maximum count of entities which can be alive at the same time.
    pub const fn max_entities(&self) -> usize {
        self.max_entities
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTITIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_identity() {
        assert_eq!(ECS_NAME, "cubz_ecs");
        assert_eq!(ECS_VERSION.to_string(), ECS_VERSION_STR);
    }

    #[test]
    fn test_max_entities_clamp() {
        assert_eq!(Config::new(usize::MAX).max_entities(), MAX_ENTITIES);
        assert_eq!(Config::new(MAX_ENTITIES).max_entities(), MAX_ENTITIES);
        assert_eq!(Config::default().max_entities(), DEFAULT_MAX_ENTITIES);
    }
}
