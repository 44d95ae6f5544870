//! Treasures the agent hunts for

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A treasure placed on the terrain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treasure {
    /// Display name
    pub name: String,
    /// World position
    pub position: Vec3,
    /// Whether the agent has a return leg planned after reaching it
    pub home: bool,
    /// Whether it has been tagged
    opened: bool,
}

impl Treasure {
    /// Create an unopened treasure
    #[must_use]
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            home: false,
            opened: false,
        }
    }

    /// Mark this treasure as the home treasure
    #[must_use]
    pub fn with_home(mut self, home: bool) -> Self {
        self.home = home;
        self
    }

    /// Check if the treasure has been tagged
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.opened
    }

    /// Tag the treasure. Returns `true` only the first time.
    pub fn open(&mut self) -> bool {
        !std::mem::replace(&mut self.opened, true)
    }
}

/// Index of the first unopened treasure strictly within `radius` of `position`
#[must_use]
pub fn first_untagged_within(treasures: &[Treasure], position: Vec3, radius: f32) -> Option<usize> {
    treasures
        .iter()
        .position(|t| !t.is_open() && t.position.distance(position) < radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_is_idempotent() {
        let mut treasure = Treasure::new("Treasure_1", Vec3::ZERO);
        assert!(!treasure.is_open());
        assert!(treasure.open());
        assert!(!treasure.open());
        assert!(treasure.is_open());
    }

    #[test]
    fn test_detection_skips_open_and_far_treasures() {
        let mut treasures = vec![
            Treasure::new("far", Vec3::new(5000.0, 0.0, 0.0)),
            Treasure::new("open", Vec3::new(10.0, 0.0, 0.0)),
            Treasure::new("near", Vec3::new(0.0, 0.0, 3999.0)),
        ];
        treasures[1].open();

        assert_eq!(first_untagged_within(&treasures, Vec3::ZERO, 4000.0), Some(2));
        assert_eq!(first_untagged_within(&treasures, Vec3::ZERO, 3999.0), None);
    }
}
