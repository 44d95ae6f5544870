//! A* pathfinding on the terrain grid
//!
//! Searches the 8-connected grid of terrain cells. Axis moves cost one grid
//! spacing, diagonal moves cost `spacing * sqrt(2)`, and the heuristic is the
//! Manhattan cell distance scaled by the spacing. The heuristic overestimates
//! on diagonals, so results favour diagonal progress but are not guaranteed
//! to be shortest.
//!
//! Closed cells are never reopened, even if a cheaper route to them turns up
//! later. Open cells whose cost improves are re-sifted in the open set.

use std::f64::consts::SQRT_2;

use glam::Vec3;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::node::{Cell, NavNode, NodeId, NodeKind};
use super::queue::{HeapItem, PriorityQueue};
use crate::core::SearchStats;
use crate::world::{Occupancy, Terrain};

/// Neighbor offsets in expansion order: left, right, up, down, then the
/// four diagonals.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// Open set entry: the node's cell, its arena slot and a copy of its f cost
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    cell: Cell,
    id: NodeId,
    total_cost: f64,
}

impl HeapItem for OpenEntry {
    type Key = Cell;

    fn key(&self) -> Cell {
        self.cell
    }

    fn priority(&self) -> f64 {
        self.total_cost
    }
}

/// Grid A* planner
#[derive(Debug, Clone)]
pub struct Pathfinder {
    /// Cell spacing in world units
    spacing: f32,
    /// Work counters
    stats: SearchStats,
}

impl Pathfinder {
    /// Create a planner for a grid with the given spacing
    #[must_use]
    pub fn new(spacing: f32) -> Self {
        Self {
            spacing,
            stats: SearchStats::default(),
        }
    }

    /// Cell spacing in world units
    #[must_use]
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Counters accumulated over every search
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Quantize a world position to its grid cell
    #[must_use]
    pub fn cell_of(&self, position: Vec3) -> Cell {
        Cell::from_world(position, self.spacing)
    }

    /// Snap a world position to its cell corner on the surface
    #[must_use]
    pub fn snap_to_grid<W>(&self, world: &W, position: Vec3) -> Vec3
    where
        W: Terrain + ?Sized,
    {
        let cell = self.cell_of(position);
        cell.to_world(self.spacing, world.surface_elevation(cell.x, cell.z))
    }

    /// Movement cost between two adjacent cells
    #[must_use]
    pub fn step_cost(&self, from: Cell, to: Cell) -> f64 {
        let spacing = f64::from(self.spacing);
        if from.manhattan(to) == 2 {
            spacing * SQRT_2
        } else {
            spacing
        }
    }

    /// Heuristic cost from a cell to the goal cell
    #[must_use]
    pub fn heuristic(&self, from: Cell, goal: Cell) -> f64 {
        f64::from(self.spacing) * f64::from(from.manhattan(goal))
    }

    /// Whether a cell is inside the terrain and not occupied at its surface
    #[must_use]
    pub fn is_walkable<W>(&self, world: &W, cell: Cell) -> bool
    where
        W: Terrain + Occupancy + ?Sized,
    {
        if !world.in_range(cell.x, cell.z) {
            return false;
        }
        let surface = cell.to_world(self.spacing, world.surface_elevation(cell.x, cell.z));
        !world.is_occupied(surface)
    }

    /// Walkable neighbors of a cell, in expansion order
    #[must_use]
    pub fn neighbors<W>(&self, world: &W, cell: Cell) -> SmallVec<[Cell; 8]>
    where
        W: Terrain + Occupancy + ?Sized,
    {
        NEIGHBOR_OFFSETS
            .iter()
            .map(|&(dx, dz)| cell.offset(dx, dz))
            .filter(|&n| self.is_walkable(world, n))
            .collect()
    }

    /// Find a path from `start` to `goal`.
    ///
    /// Returns the nodes from the start cell to the goal cell inclusive, each
    /// tagged with `tag`. Every node, the first included, sits on its cell
    /// corner at surface elevation. An empty vector means the goal cell
    /// cannot be reached.
    pub fn find_path<W>(&mut self, world: &W, start: Vec3, goal: Vec3, tag: NodeKind) -> Vec<NavNode>
    where
        W: Terrain + Occupancy + ?Sized,
    {
        let start_cell = self.cell_of(start);
        let goal_cell = self.cell_of(goal);

        // An unwalkable goal cell is never admitted as a neighbor, so the
        // search could only fail after draining everything reachable.
        if start_cell != goal_cell && !self.is_walkable(world, goal_cell) {
            log::debug!("Goal cell {goal_cell:?} is not walkable");
            self.stats.record_search(0, 0);
            return Vec::new();
        }

        let origin = start_cell.to_world(
            self.spacing,
            world.surface_elevation(start_cell.x, start_cell.z),
        );
        let mut arena: Vec<NavNode> = vec![NavNode::new(origin, NodeKind::SearchFrontier)];
        let mut open: PriorityQueue<OpenEntry> = PriorityQueue::new();
        let mut closed: FxHashSet<Cell> = FxHashSet::default();
        let mut expanded = 0;

        open.insert(OpenEntry {
            cell: start_cell,
            id: 0,
            total_cost: 0.0,
        });

        while let Some(current) = open.extract_min() {
            closed.insert(current.cell);
            expanded += 1;

            if current.cell == goal_cell {
                let path = reconstruct(arena, current.id, tag);
                log::debug!(
                    "Path {start_cell:?} -> {goal_cell:?}: {} nodes, {expanded} expanded",
                    path.len()
                );
                self.stats.record_search(expanded, path.len());
                return path;
            }

            let current_g = arena[current.id as usize].cost_from_start;

            for neighbor in self.neighbors(world, current.cell) {
                if closed.contains(&neighbor) {
                    continue;
                }

                let g = current_g + self.step_cost(current.cell, neighbor);

                match open.get(&neighbor).copied() {
                    None => {
                        let elevation = world.surface_elevation(neighbor.x, neighbor.z);
                        let mut node = NavNode::new(
                            neighbor.to_world(self.spacing, elevation),
                            NodeKind::SearchFrontier,
                        );
                        node.parent = Some(current.id);
                        node.set_costs(g, self.heuristic(neighbor, goal_cell));

                        let id = arena.len() as NodeId;
                        open.insert(OpenEntry {
                            cell: neighbor,
                            id,
                            total_cost: node.total_cost,
                        });
                        arena.push(node);
                    }
                    Some(entry) => {
                        let node = &mut arena[entry.id as usize];
                        if g < node.cost_from_start {
                            node.parent = Some(current.id);
                            let h = node.cost_to_goal;
                            node.set_costs(g, h);
                            let total_cost = node.total_cost;
                            open.update(&neighbor, |e| e.total_cost = total_cost);
                        }
                    }
                }
            }
        }

        log::debug!("No path {start_cell:?} -> {goal_cell:?} after {expanded} expansions");
        self.stats.record_search(expanded, 0);
        Vec::new()
    }
}

/// Walk parent links back from `last` and return the nodes start-first
fn reconstruct(mut arena: Vec<NavNode>, last: NodeId, tag: NodeKind) -> Vec<NavNode> {
    let mut ids = Vec::new();
    let mut cursor = Some(last);
    while let Some(id) = cursor {
        ids.push(id);
        cursor = arena[id as usize].parent;
    }

    // Parent links are rewritten to index the returned sequence
    ids.iter()
        .rev()
        .enumerate()
        .map(|(slot, &id)| {
            let mut node = std::mem::replace(
                &mut arena[id as usize],
                NavNode::new(Vec3::ZERO, NodeKind::SearchFrontier),
            );
            node.kind = tag;
            node.parent = slot.checked_sub(1).map(|p| p as NodeId);
            node
        })
        .collect()
}

/// Sum of planar distances between consecutive nodes
#[must_use]
pub fn path_length(nodes: &[NavNode]) -> f32 {
    nodes
        .windows(2)
        .map(|pair| pair[0].planar_distance(pair[1].position))
        .sum()
}
