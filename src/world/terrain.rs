//! Terrain and occupancy oracles
//!
//! The planner only asks two questions of the world: how high is the ground
//! at a grid cell, and is a world position blocked. [`TerrainGrid`] is the
//! in-crate answer to both: a square height field with blocked cells and
//! spherical obstacles.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::ai::{Cell, planar_distance};

/// Elevation returned for cells outside the terrain
pub const OUT_OF_RANGE_ELEVATION: f32 = 0.0;

/// Surface elevation lookup over integer grid cells
pub trait Terrain {
    /// Number of cells per side; valid indices are `0..range`
    fn range(&self) -> i32;

    /// Elevation at a cell, [`OUT_OF_RANGE_ELEVATION`] outside the terrain
    fn surface_elevation(&self, x: i32, z: i32) -> f32;

    /// Check if a cell lies inside the terrain
    fn in_range(&self, x: i32, z: i32) -> bool {
        let range = self.range();
        x >= 0 && x < range && z >= 0 && z < range
    }
}

/// Collision predicate supplied by the spatial index of obstacles
pub trait Occupancy {
    /// Whether a world position collides with anything
    fn is_occupied(&self, position: Vec3) -> bool;
}

/// A spherical obstacle, tested on the X-Z plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// World-space center
    pub center: Vec3,
    /// Radius in world units
    pub radius: f32,
}

impl Obstacle {
    /// Create an obstacle
    #[must_use]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if a point is inside the obstacle's footprint
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        planar_distance(self.center, point) < self.radius
    }
}

/// A square height field with occupancy
#[derive(Debug, Clone)]
pub struct TerrainGrid {
    /// Cells per side
    range: i32,
    /// Cell spacing in world units
    spacing: f32,
    /// Elevation per cell, row-major in Z
    heights: Vec<f32>,
    /// Blocked cells (true = blocked)
    blocked: Vec<bool>,
    /// Spherical obstacles
    obstacles: Vec<Obstacle>,
}

impl TerrainGrid {
    /// Create a flat grid (all cells walkable, elevation zero)
    #[must_use]
    pub fn new(range: i32, spacing: f32) -> Self {
        let cells = (range.max(0) as usize).pow(2);
        Self {
            range: range.max(0),
            spacing,
            heights: vec![0.0; cells],
            blocked: vec![false; cells],
            obstacles: Vec::new(),
        }
    }

    /// Create a grid whose heights come from a function of the cell
    #[must_use]
    pub fn from_fn<F>(range: i32, spacing: f32, mut height: F) -> Self
    where
        F: FnMut(i32, i32) -> f32,
    {
        let mut grid = Self::new(range, spacing);
        for z in 0..grid.range {
            for x in 0..grid.range {
                let slot = grid.slot(x, z);
                grid.heights[slot] = height(x, z);
            }
        }
        grid
    }

    /// Cell spacing in world units
    #[must_use]
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Set a cell's elevation
    pub fn set_elevation(&mut self, x: i32, z: i32, elevation: f32) {
        if self.in_range(x, z) {
            let slot = self.slot(x, z);
            self.heights[slot] = elevation;
        }
    }

    /// Block or unblock a cell
    pub fn set_blocked(&mut self, x: i32, z: i32, blocked: bool) {
        if self.in_range(x, z) {
            let slot = self.slot(x, z);
            self.blocked[slot] = blocked;
        }
    }

    /// Check whether a cell is blocked; out-of-range cells count as blocked
    #[must_use]
    pub fn is_blocked(&self, x: i32, z: i32) -> bool {
        if !self.in_range(x, z) {
            return true;
        }
        self.blocked[self.slot(x, z)]
    }

    /// Add a spherical obstacle
    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// All spherical obstacles
    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// World position of a cell corner on the surface
    #[must_use]
    pub fn surface_point(&self, cell: Cell) -> Vec3 {
        cell.to_world(self.spacing, self.surface_elevation(cell.x, cell.z))
    }

    /// Elevation under an arbitrary world position (cell lookup, no blending)
    #[must_use]
    pub fn elevation_at(&self, position: Vec3) -> f32 {
        let cell = Cell::from_world(position, self.spacing);
        self.surface_elevation(cell.x, cell.z)
    }

    fn slot(&self, x: i32, z: i32) -> usize {
        z as usize * self.range as usize + x as usize
    }
}

impl Terrain for TerrainGrid {
    fn range(&self) -> i32 {
        self.range
    }

    fn surface_elevation(&self, x: i32, z: i32) -> f32 {
        if !self.in_range(x, z) {
            return OUT_OF_RANGE_ELEVATION;
        }
        self.heights[self.slot(x, z)]
    }
}

impl Occupancy for TerrainGrid {
    fn is_occupied(&self, position: Vec3) -> bool {
        let cell = Cell::from_world(position, self.spacing);
        if self.in_range(cell.x, cell.z) && self.blocked[self.slot(cell.x, cell.z)] {
            return true;
        }
        self.obstacles.iter().any(|o| o.contains(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_sentinel() {
        let grid = TerrainGrid::from_fn(4, 150.0, |x, z| (x + z) as f32);

        assert_eq!(grid.surface_elevation(3, 3), 6.0);
        assert_eq!(grid.surface_elevation(-1, 0), OUT_OF_RANGE_ELEVATION);
        assert_eq!(grid.surface_elevation(0, 4), OUT_OF_RANGE_ELEVATION);
        assert!(!grid.in_range(4, 0));
        assert!(grid.in_range(0, 0));
    }

    #[test]
    fn test_blocked_cells_are_occupied() {
        let mut grid = TerrainGrid::new(8, 150.0);
        grid.set_blocked(2, 3, true);

        assert!(grid.is_occupied(Vec3::new(300.0, 0.0, 450.0)));
        assert!(grid.is_occupied(Vec3::new(449.0, 0.0, 599.0)));
        assert!(!grid.is_occupied(Vec3::new(450.0, 0.0, 450.0)));
        assert!(grid.is_blocked(-1, 0));
    }

    #[test]
    fn test_obstacle_footprint_ignores_height() {
        let mut grid = TerrainGrid::new(8, 150.0);
        grid.add_obstacle(Obstacle::new(Vec3::new(600.0, 0.0, 600.0), 200.0));

        assert!(grid.is_occupied(Vec3::new(600.0, 900.0, 450.0)));
        assert!(!grid.is_occupied(Vec3::new(300.0, 0.0, 300.0)));
    }

    #[test]
    fn test_surface_point_uses_cell_corner() {
        let mut grid = TerrainGrid::new(8, 150.0);
        grid.set_elevation(2, 5, 42.0);

        let point = grid.surface_point(Cell::new(2, 5));
        assert_eq!(point, Vec3::new(300.0, 42.0, 750.0));
        assert_eq!(grid.elevation_at(Vec3::new(310.0, 0.0, 760.0)), 42.0);
    }
}
