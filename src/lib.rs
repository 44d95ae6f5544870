//! Grid navigation for a terrain-walking agent
//!
//! This crate provides:
//! - A* pathfinding over an 8-connected terrain grid
//! - Paths with once, ping-pong and cyclic traversal
//! - A controller that sweeps the terrain and detours to nearby treasures

pub mod ai;
pub mod core;
pub mod world;

// Re-exports for convenience
pub use glam;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::ai::{
        Agent, Cell, NavMode, NavNode, NavStatus, NavigationController, NodeKind, Path,
        Pathfinder, TraversalMode, Walker,
    };
    pub use crate::core::{ConfigError, Diagnostics, NavConfig, SearchStats, SweepConfig};
    pub use crate::world::{Obstacle, Occupancy, Terrain, TerrainGrid, Treasure};
    pub use glam::{Quat, Vec3};
}
