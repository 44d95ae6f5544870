//! Exploration sweep planning
//!
//! The agent covers the terrain with a serpentine sweep between two columns
//! near the left and right edges, moving one lane down in Z per pass:
//!
//! ```text
//!   near column                 far column
//!        x1 <-------------------- x0   (start)
//!        |
//!        x2 --------------------> x3
//!                                 |
//!        x5 <-------------------- x4
//! ```
//!
//! Each pair of consecutive sweep waypoints becomes one A* leg.

use std::collections::VecDeque;

use super::node::{Cell, NodeKind};
use super::path::{Path, TraversalMode};
use super::pathfinding::Pathfinder;
use crate::core::SweepConfig;
use crate::world::{Occupancy, Terrain};

/// Sweep waypoints for a terrain of `range` cells per side, in visiting order
#[must_use]
pub fn sweep_waypoints(range: i32, sweep: SweepConfig) -> Vec<Cell> {
    let near = sweep.margin;
    let far = range - sweep.margin;
    let last_lane = range - 1;

    if sweep.lane_spacing <= 0 || near > last_lane || far < 0 || sweep.margin > last_lane {
        return Vec::new();
    }

    let mut waypoints = vec![Cell::new(far, near)];
    let mut column = far;
    let mut z = near + sweep.lane_spacing;

    while z <= last_lane {
        let other = if column == far { near } else { far };
        waypoints.push(Cell::new(column, z));
        waypoints.push(Cell::new(other, z));
        column = other;
        z += sweep.lane_spacing;
    }

    waypoints
}

/// Plan one `Once` leg between each pair of consecutive waypoints.
///
/// Unreachable waypoints are skipped; the next leg then starts from the last
/// waypoint a leg actually ended on.
pub fn plan_legs<W>(planner: &mut Pathfinder, world: &W, waypoints: &[Cell]) -> VecDeque<Path>
where
    W: Terrain + Occupancy + ?Sized,
{
    let spacing = planner.spacing();
    let mut legs = VecDeque::with_capacity(waypoints.len().saturating_sub(1));
    let Some((&first, rest)) = waypoints.split_first() else {
        return legs;
    };

    let mut from = first;
    for &to in rest {
        let start = from.to_world(spacing, world.surface_elevation(from.x, from.z));
        let goal = to.to_world(spacing, world.surface_elevation(to.x, to.z));

        let nodes = planner.find_path(world, start, goal, NodeKind::PathWaypoint);
        if nodes.is_empty() {
            log::warn!("Skipping unreachable exploration waypoint {to:?} (from {from:?})");
            continue;
        }
        legs.push_back(Path::new(nodes, TraversalMode::Once));
        from = to;
    }

    log::info!("Planned {} of {} exploration legs", legs.len(), rest.len());
    legs
}

/// Single-node path to the first sweep waypoint
#[must_use]
pub fn initial_leg<T>(world: &T, spacing: f32, waypoints: &[Cell]) -> Path
where
    T: Terrain + ?Sized,
{
    let nodes = waypoints
        .first()
        .map(|c| c.to_world(spacing, world.surface_elevation(c.x, c.z)));
    Path::from_waypoints(nodes, NodeKind::TerrainVertex, TraversalMode::Once)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::TerrainGrid;

    #[test]
    fn test_default_sweep_matches_full_map_pattern() {
        let waypoints = sweep_waypoints(512, SweepConfig::default());

        assert_eq!(waypoints.len(), 19);
        assert_eq!(waypoints[0], Cell::new(486, 26));
        assert_eq!(waypoints[1], Cell::new(486, 78));
        assert_eq!(waypoints[2], Cell::new(26, 78));
        assert_eq!(waypoints[3], Cell::new(26, 130));
        assert_eq!(waypoints[4], Cell::new(486, 130));
        assert_eq!(waypoints[17], Cell::new(486, 494));
        assert_eq!(waypoints[18], Cell::new(26, 494));
    }

    #[test]
    fn test_small_sweep() {
        let sweep = SweepConfig {
            margin: 1,
            lane_spacing: 3,
        };
        let waypoints = sweep_waypoints(8, sweep);

        assert_eq!(
            waypoints,
            vec![
                Cell::new(7, 1),
                Cell::new(7, 4),
                Cell::new(1, 4),
                Cell::new(1, 7),
                Cell::new(7, 7),
            ]
        );
    }

    #[test]
    fn test_degenerate_sweep_is_empty() {
        let sweep = SweepConfig {
            margin: 10,
            lane_spacing: 3,
        };
        assert!(sweep_waypoints(8, sweep).is_empty());
    }

    #[test]
    fn test_plan_legs_skips_unreachable() {
        let mut grid = TerrainGrid::new(8, 150.0);
        // Wall off the cell of the third waypoint
        grid.set_blocked(1, 7, true);
        let mut planner = Pathfinder::new(150.0);

        let waypoints = vec![Cell::new(6, 1), Cell::new(6, 4), Cell::new(1, 7), Cell::new(6, 6)];
        let legs = plan_legs(&mut planner, &grid, &waypoints);

        assert_eq!(legs.len(), 2);
        assert!(legs.iter().all(|p| p.mode() == TraversalMode::Once));
        let first = &legs[0];
        assert_eq!(first.nodes()[0].cell(150.0), Cell::new(6, 1));
        assert_eq!(first.nodes().last().map(|n| n.cell(150.0)), Some(Cell::new(6, 4)));
        assert!(first.nodes().iter().all(|n| n.kind == NodeKind::PathWaypoint));

        // The leg after the skipped waypoint resumes where the first one ended
        let second = &legs[1];
        assert_eq!(second.nodes()[0].cell(150.0), Cell::new(6, 4));
        assert_eq!(second.nodes().last().map(|n| n.cell(150.0)), Some(Cell::new(6, 6)));
    }

    #[test]
    fn test_initial_leg() {
        let grid = TerrainGrid::from_fn(8, 150.0, |_, _| 7.0);
        let leg = initial_leg(&grid, 150.0, &[Cell::new(6, 1), Cell::new(6, 4)]);

        assert_eq!(leg.len(), 1);
        assert_eq!(leg.nodes()[0].position, glam::Vec3::new(900.0, 7.0, 150.0));
    }
}
