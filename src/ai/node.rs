//! Navigation nodes and grid cells
//!
//! A [`NavNode`] is both a vertex of the A* search graph and a checkpoint on
//! a produced [`Path`](super::Path). Planning happens on the X-Z plane; the Y
//! component of a node's position is the terrain elevation and is carried
//! along for the agent and the visualizer only.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Index of a node inside a search arena.
pub type NodeId = u32;

/// Quantized X-Z grid coordinate.
///
/// Obtained by dividing a world position by the grid spacing and truncating
/// toward zero, never flooring or rounding: a position at `x = -10.0` lands
/// in cell `0`, exactly like a position at `x = 10.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    /// Column index (world X / spacing)
    pub x: i32,
    /// Row index (world Z / spacing)
    pub z: i32,
}

impl Cell {
    /// Create a cell from raw grid indices
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Quantize a world position to its cell
    #[must_use]
    pub fn from_world(position: Vec3, spacing: f32) -> Self {
        // `as i32` truncates toward zero
        Self {
            x: (position.x / spacing) as i32,
            z: (position.z / spacing) as i32,
        }
    }

    /// Manhattan distance in cells
    #[must_use]
    pub fn manhattan(self, other: Self) -> i32 {
        (self.x - other.x).abs() + (self.z - other.z).abs()
    }

    /// Chebyshev distance in cells
    #[must_use]
    pub fn chebyshev(self, other: Self) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    /// World position of the cell corner at the given elevation
    #[must_use]
    pub fn to_world(self, spacing: f32, elevation: f32) -> Vec3 {
        Vec3::new(self.x as f32 * spacing, elevation, self.z as f32 * spacing)
    }

    /// Offset by a delta
    #[must_use]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }
}

/// Descriptive classification of a node.
///
/// Drives none of the planning decisions; consumed only by whoever draws
/// the nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NodeKind {
    /// A terrain vertex
    #[default]
    TerrainVertex,
    /// A hand-placed or sweep waypoint
    PathWaypoint,
    /// A node in an A* open or closed set
    SearchFrontier,
    /// A node on a found path
    ResolvedPath,
    /// An obstacle marker
    Obstacle,
}

impl NodeKind {
    /// Marker color used by the visualizer (RGB, 0..1)
    #[must_use]
    pub fn color(self) -> Vec3 {
        match self {
            Self::TerrainVertex => Vec3::new(1.0, 1.0, 0.0),
            Self::PathWaypoint => Vec3::new(0.0, 0.5, 0.0),
            Self::SearchFrontier => Vec3::new(0.0, 0.0, 1.0),
            Self::ResolvedPath => Vec3::ONE,
            Self::Obstacle => Vec3::new(0.5, 1.0, 0.83),
        }
    }
}

/// A node in the search graph, or a checkpoint on a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavNode {
    /// World position (Y is elevation)
    pub position: Vec3,
    /// Accumulated cost from the search origin (g)
    pub cost_from_start: f64,
    /// Heuristic estimate to the goal (h)
    pub cost_to_goal: f64,
    /// `cost_from_start + cost_to_goal` (f), the priority key
    pub total_cost: f64,
    /// Predecessor in the search arena, `None` for the start node
    #[serde(skip)]
    pub parent: Option<NodeId>,
    /// Visualizer tag
    pub kind: NodeKind,
}

impl NavNode {
    /// Create a node with zeroed costs and no parent
    #[must_use]
    pub fn new(position: Vec3, kind: NodeKind) -> Self {
        Self {
            position,
            cost_from_start: 0.0,
            cost_to_goal: 0.0,
            total_cost: 0.0,
            parent: None,
            kind,
        }
    }

    /// Grid cell this node quantizes to
    #[must_use]
    pub fn cell(&self, spacing: f32) -> Cell {
        Cell::from_world(self.position, spacing)
    }

    /// Whether two nodes fall in the same grid cell
    #[must_use]
    pub fn same_cell(&self, other: &Self, spacing: f32) -> bool {
        self.cell(spacing) == other.cell(spacing)
    }

    /// Set g and h and recompute f
    pub fn set_costs(&mut self, cost_from_start: f64, cost_to_goal: f64) {
        self.cost_from_start = cost_from_start;
        self.cost_to_goal = cost_to_goal;
        self.total_cost = cost_from_start + cost_to_goal;
    }

    /// Distance to a point measured on the X-Z plane only
    #[must_use]
    pub fn planar_distance(&self, point: Vec3) -> f32 {
        planar_distance(self.position, point)
    }
}

/// Distance between two points ignoring elevation
#[must_use]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_truncates_toward_zero() {
        assert_eq!(Cell::from_world(Vec3::new(149.9, 0.0, 150.0), 150.0), Cell::new(0, 1));
        assert_eq!(Cell::from_world(Vec3::new(299.0, 7.0, 451.0), 150.0), Cell::new(1, 3));
        // Negative positions truncate, they do not floor
        assert_eq!(Cell::from_world(Vec3::new(-10.0, 0.0, -149.0), 150.0), Cell::new(0, 0));
        assert_eq!(Cell::from_world(Vec3::new(-151.0, 0.0, 0.0), 150.0), Cell::new(-1, 0));
    }

    #[test]
    fn test_cell_distances() {
        let a = Cell::new(1, 1);
        let b = Cell::new(4, 3);
        assert_eq!(a.manhattan(b), 5);
        assert_eq!(a.chebyshev(b), 3);
    }

    #[test]
    fn test_set_costs_keeps_total_in_sync() {
        let mut node = NavNode::new(Vec3::ZERO, NodeKind::SearchFrontier);
        node.set_costs(150.0, 300.0);
        assert_eq!(node.total_cost, 450.0);
    }

    #[test]
    fn test_same_cell_ignores_elevation() {
        let a = NavNode::new(Vec3::new(10.0, 500.0, 20.0), NodeKind::TerrainVertex);
        let b = NavNode::new(Vec3::new(140.0, 0.0, 1.0), NodeKind::PathWaypoint);
        assert!(a.same_cell(&b, 150.0));
        assert!((a.planar_distance(Vec3::new(10.0, -3.0, 20.0))).abs() < 1e-6);
    }
}
