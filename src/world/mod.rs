//! World collaborators
//!
//! Terrain height field, obstacle occupancy and treasures.

mod terrain;
mod treasure;

pub use terrain::{OUT_OF_RANGE_ELEVATION, Obstacle, Occupancy, Terrain, TerrainGrid};
pub use treasure::{Treasure, first_untagged_within};
