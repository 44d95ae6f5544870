//! AI and navigation module
//!
//! Provides grid A* pathfinding, path traversal, agent steering, exploration
//! planning and the navigation controller that ties them together.

mod controller;
mod exploration;
mod node;
mod path;
mod pathfinding;
mod queue;
mod steering;

pub use controller::{NavMode, NavStatus, NavigationController};
pub use exploration::{initial_leg, plan_legs, sweep_waypoints};
pub use node::{Cell, NavNode, NodeId, NodeKind, planar_distance};
pub use path::{Path, PathId, TraversalMode};
pub use pathfinding::{Pathfinder, path_length};
pub use queue::{HeapItem, PriorityQueue};
pub use steering::{Agent, Walker, turn_to_face};
