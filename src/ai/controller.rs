//! Navigation controller
//!
//! Drives one agent across the terrain. The controller owns two FIFO queues
//! of paths: exploration legs and treasure legs. Every tick it
//!
//! 1. checks for an untagged treasure within the detection radius and, if
//!    one is found, plans a leg to it and switches to treasure hunting,
//! 2. hands out the next checkpoint once the agent is close enough to the
//!    current one, switching paths when the active path is done,
//! 3. advances the agent one step unless navigation has finished.
//!
//! An exploration path interrupted by a treasure is put aside together with
//! its pending checkpoint and resumed, cursor intact, once the treasure
//! queue drains.

use std::collections::VecDeque;

use glam::Vec3;

use super::node::{Cell, NodeKind, planar_distance};
use super::path::{Path, TraversalMode};
use super::pathfinding::Pathfinder;
use super::steering::{Agent, turn_to_face};
use crate::core::{Diagnostics, NavConfig, SearchStats};
use crate::world::{Occupancy, Terrain, Treasure, first_untagged_within};

// ============================================================================
// Modes
// ============================================================================

/// Which queue the controller is working through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavMode {
    /// Following exploration legs
    Exploring,
    /// Following treasure legs
    TreasureHunting,
}

/// Externally visible controller status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavStatus {
    /// Following exploration legs
    Exploring,
    /// Following treasure legs
    TreasureHunting,
    /// Nothing left to do; the agent no longer moves
    Stopped,
}

/// An exploration path put aside while a treasure is hunted
#[derive(Debug, Clone)]
struct SavedRoute {
    path: Path,
    goal: Option<Vec3>,
}

// ============================================================================
// Controller
// ============================================================================

/// Mode switching and path following for a single agent
#[derive(Debug, Clone)]
pub struct NavigationController {
    config: NavConfig,
    planner: Pathfinder,
    mode: NavMode,
    active: Option<Path>,
    next_goal: Option<Vec3>,
    exploration: VecDeque<Path>,
    treasure_legs: VecDeque<Path>,
    saved: Option<SavedRoute>,
    finished: bool,
    tagged: usize,
    diagnostics: Diagnostics,
}

impl NavigationController {
    /// Create a controller that starts exploring along `initial`.
    ///
    /// The first checkpoint is handed out on the first tick.
    #[must_use]
    pub fn new(config: NavConfig, initial: Path) -> Self {
        let planner = Pathfinder::new(config.spacing);
        Self {
            config,
            planner,
            mode: NavMode::Exploring,
            active: Some(initial),
            next_goal: None,
            exploration: VecDeque::new(),
            treasure_legs: VecDeque::new(),
            saved: None,
            finished: false,
            tagged: 0,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Queue exploration legs to follow after the initial path
    #[must_use]
    pub fn with_exploration(mut self, legs: VecDeque<Path>) -> Self {
        self.exploration.extend(legs);
        self
    }

    /// Current mode
    #[must_use]
    pub fn mode(&self) -> NavMode {
        self.mode
    }

    /// Current status
    #[must_use]
    pub fn status(&self) -> NavStatus {
        match (self.finished, self.mode) {
            (true, _) => NavStatus::Stopped,
            (false, NavMode::Exploring) => NavStatus::Exploring,
            (false, NavMode::TreasureHunting) => NavStatus::TreasureHunting,
        }
    }

    /// Whether every queue has been exhausted
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of treasures tagged so far
    #[must_use]
    pub fn tagged_treasures(&self) -> usize {
        self.tagged
    }

    /// Checkpoint the agent is walking toward
    #[must_use]
    pub fn next_goal(&self) -> Option<Vec3> {
        self.next_goal
    }

    /// Path being followed
    #[must_use]
    pub fn active_path(&self) -> Option<&Path> {
        self.active.as_ref()
    }

    /// Exploration legs still queued
    #[must_use]
    pub fn exploration_queue_len(&self) -> usize {
        self.exploration.len()
    }

    /// Treasure legs still queued
    #[must_use]
    pub fn treasure_queue_len(&self) -> usize {
        self.treasure_legs.len()
    }

    /// Whether an interrupted exploration path is waiting to resume
    #[must_use]
    pub fn has_saved_path(&self) -> bool {
        self.saved.is_some()
    }

    /// Recent warnings and events
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Planner work counters
    #[must_use]
    pub fn search_stats(&self) -> &SearchStats {
        self.planner.stats()
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Run one navigation step for `agent`
    pub fn tick<W, A>(&mut self, world: &W, agent: &mut A, treasures: &mut [Treasure])
    where
        W: Terrain + Occupancy + ?Sized,
        A: Agent + ?Sized,
    {
        let position = agent.position();
        if let Some(index) = first_untagged_within(treasures, position, self.config.detect_radius) {
            let treasure = &mut treasures[index];
            if treasure.open() {
                self.tagged += 1;
                log::info!(
                    "Tagged {} ({} so far) at distance {:.1}",
                    treasure.name,
                    self.tagged,
                    treasure.position.distance(position)
                );
                self.diagnostics
                    .add_line(format!("tagged {} ({})", treasure.name, self.tagged));
                self.hunt(world, agent, treasure);
            }
        }

        if self.finished {
            return;
        }

        if self.next_goal.is_none() {
            self.take_checkpoint(agent);
            if self.next_goal.is_none() {
                self.on_path_done(agent);
            }
        }

        if let Some(goal) = self.next_goal {
            if planar_distance(agent.position(), goal) <= self.config.snap_distance {
                self.take_checkpoint(agent);
                if self.active.as_ref().is_none_or(Path::is_done) {
                    self.on_path_done(agent);
                }
            }
        }

        if !self.finished {
            agent.advance();
        }
    }

    /// Plan the legs to a freshly tagged treasure and switch to hunting
    fn hunt<W, A>(&mut self, world: &W, agent: &mut A, treasure: &Treasure)
    where
        W: Terrain + Occupancy + ?Sized,
        A: Agent + ?Sized,
    {
        let start = self.planner.snap_to_grid(world, agent.position());
        let goal = self.planner.snap_to_grid(world, treasure.position);

        let forward = self
            .planner
            .find_path(world, start, goal, NodeKind::ResolvedPath);
        if forward.is_empty() {
            log::warn!("No route to {}, staying {:?}", treasure.name, self.mode);
            self.diagnostics
                .add_line(format!("unreachable {}", treasure.name));
            return;
        }
        self.treasure_legs
            .push_back(Path::new(forward, TraversalMode::Once));

        if self.is_home(treasure, goal) {
            let back = self
                .planner
                .find_path(world, goal, start, NodeKind::ResolvedPath);
            if back.is_empty() {
                log::warn!("No return route from {}", treasure.name);
            } else {
                self.treasure_legs
                    .push_back(Path::new(back, TraversalMode::Once));
            }
        }

        if self.mode == NavMode::Exploring {
            if let Some(path) = self.active.take_if(|p| !p.is_done()) {
                log::debug!("Setting aside exploration path {:?}", path.id());
                self.saved = Some(SavedRoute {
                    path,
                    goal: self.next_goal,
                });
            }
        }

        self.mode = NavMode::TreasureHunting;
        self.finished = false;
        self.active = self.treasure_legs.pop_front();
        self.take_checkpoint(agent);
    }

    fn is_home(&self, treasure: &Treasure, goal: Vec3) -> bool {
        treasure.home
            || self
                .config
                .home_treasure
                .is_some_and(|(x, z)| self.planner.cell_of(goal) == Cell::new(x, z))
    }

    /// Switch paths after the active one is done
    fn on_path_done<A>(&mut self, agent: &mut A)
    where
        A: Agent + ?Sized,
    {
        if self.mode == NavMode::TreasureHunting {
            if let Some(next) = self.treasure_legs.pop_front() {
                self.active = Some(next);
                self.take_checkpoint(agent);
                return;
            }

            log::info!("Treasure queue empty, back to exploring");
            self.mode = NavMode::Exploring;

            if let Some(saved) = self.saved.take().filter(|s| !s.path.is_done()) {
                log::debug!("Resuming exploration path {:?}", saved.path.id());
                self.active = Some(saved.path);
                self.next_goal = saved.goal;
                match saved.goal {
                    Some(goal) => self.face(agent, goal),
                    None => self.take_checkpoint(agent),
                }
                return;
            }
        }

        match self.exploration.pop_front() {
            Some(next) => {
                self.active = Some(next);
                self.take_checkpoint(agent);
            }
            None => {
                log::info!("Exploration queue empty, navigation finished");
                self.diagnostics.add_line("finished");
                self.next_goal = None;
                self.finished = true;
            }
        }
    }

    /// Pull the next checkpoint from the active path and face it
    fn take_checkpoint<A>(&mut self, agent: &mut A)
    where
        A: Agent + ?Sized,
    {
        self.next_goal = self
            .active
            .as_mut()
            .and_then(Path::next_checkpoint)
            .map(|node| node.position);

        if let Some(goal) = self.next_goal {
            self.face(agent, goal);
        }
    }

    fn face<A>(&mut self, agent: &mut A, target: Vec3)
    where
        A: Agent + ?Sized,
    {
        match turn_to_face(agent.position(), agent.forward(), target) {
            Some(yaw) => agent.turn(yaw),
            None => {
                log::warn!("Cannot face {target} from {}", agent.position());
                self.diagnostics.add_line(format!("no heading to {target}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::steering::Walker;
    use crate::world::TerrainGrid;

    fn config() -> NavConfig {
        NavConfig::default()
            .with_spacing(10.0)
            .with_range(32)
            .with_snap_distance(1.0)
            .with_step_size(1.0)
            .with_detect_radius(25.0)
            .with_home_treasure(None)
    }

    fn line(xs: &[f32]) -> Path {
        Path::from_waypoints(
            xs.iter().map(|&x| Vec3::new(x, 0.0, 0.0)),
            NodeKind::PathWaypoint,
            TraversalMode::Once,
        )
    }

    fn run_until<F>(
        nav: &mut NavigationController,
        grid: &TerrainGrid,
        walker: &mut Walker,
        treasures: &mut [Treasure],
        mut done: F,
    ) -> bool
    where
        F: FnMut(&NavigationController) -> bool,
    {
        for _ in 0..5000 {
            nav.tick(grid, walker, treasures);
            if done(nav) {
                return true;
            }
        }
        false
    }

    #[test]
    fn test_single_node_path_finishes_and_stays_stopped() {
        let grid = TerrainGrid::new(32, 10.0);
        let mut walker = Walker::new(Vec3::ZERO, 1.0);
        let mut nav = NavigationController::new(config(), line(&[0.0]));

        nav.tick(&grid, &mut walker, &mut []);

        assert!(nav.is_finished());
        assert_eq!(nav.status(), NavStatus::Stopped);
        assert_eq!(walker.steps(), 0);
        // Standing on the checkpoint leaves no heading
        assert!(nav.diagnostics().lines().any(|l| l.starts_with("no heading")));

        for _ in 0..10 {
            nav.tick(&grid, &mut walker, &mut []);
        }
        assert!(nav.is_finished());
        assert_eq!(walker.position, Vec3::ZERO);
    }

    #[test]
    fn test_follows_exploration_legs_in_order() {
        let grid = TerrainGrid::new(32, 10.0);
        let mut walker = Walker::new(Vec3::ZERO, 1.0);
        let legs = VecDeque::from(vec![line(&[0.0, 20.0]), line(&[20.0, 40.0])]);
        let mut nav = NavigationController::new(config(), line(&[0.0])).with_exploration(legs);
        assert_eq!(nav.exploration_queue_len(), 2);

        assert!(run_until(&mut nav, &grid, &mut walker, &mut [], |n| n.is_finished()));

        // Handing out a leg's last checkpoint completes it, so the second
        // leg ends as soon as its first checkpoint is reached
        assert_eq!(nav.exploration_queue_len(), 0);
        assert_eq!(nav.next_goal(), None);
        assert!((walker.position - Vec3::new(20.0, 0.0, 0.0)).length() <= 1.0);
    }

    #[test]
    fn test_treasure_interrupts_and_exploration_resumes() {
        let grid = TerrainGrid::new(32, 10.0);
        let mut walker = Walker::new(Vec3::ZERO, 1.0);
        let mut treasures = vec![Treasure::new("Treasure_1", Vec3::new(150.0, 0.0, 20.0))];

        let exploration = line(&[0.0, 100.0, 200.0, 300.0]);
        let exploration_id = exploration.id();
        let mut nav = NavigationController::new(config(), exploration);

        assert!(run_until(&mut nav, &grid, &mut walker, &mut treasures, |n| {
            n.mode() == NavMode::TreasureHunting
        }));
        assert_eq!(nav.tagged_treasures(), 1);
        assert!(treasures[0].is_open());
        assert!(nav.has_saved_path());
        assert_ne!(nav.active_path().map(Path::id), Some(exploration_id));

        assert!(run_until(&mut nav, &grid, &mut walker, &mut treasures, |n| {
            n.mode() == NavMode::Exploring
        }));
        let resumed = nav.active_path().unwrap();
        assert_eq!(resumed.id(), exploration_id);
        assert_eq!(resumed.cursor(), 3);
        assert_eq!(nav.next_goal(), Some(Vec3::new(200.0, 0.0, 0.0)));
        assert!(!nav.has_saved_path());

        assert!(run_until(&mut nav, &grid, &mut walker, &mut treasures, |n| n.is_finished()));
        assert_eq!(nav.tagged_treasures(), 1);
    }

    #[test]
    fn test_home_treasure_queues_return_leg() {
        let grid = TerrainGrid::new(32, 10.0);
        let mut walker = Walker::new(Vec3::ZERO, 1.0);
        let mut treasures = vec![Treasure::new("home", Vec3::new(20.0, 0.0, 0.0)).with_home(true)];
        let mut nav = NavigationController::new(config(), line(&[0.0, 100.0]));

        nav.tick(&grid, &mut walker, &mut treasures);

        assert_eq!(nav.mode(), NavMode::TreasureHunting);
        assert_eq!(nav.treasure_queue_len(), 1);
        let first = nav.active_path().map(Path::id);

        assert!(run_until(&mut nav, &grid, &mut walker, &mut treasures, |n| {
            n.treasure_queue_len() == 0
        }));
        assert_eq!(nav.mode(), NavMode::TreasureHunting);
        assert_ne!(nav.active_path().map(Path::id), first);
    }

    #[test]
    fn test_home_treasure_by_configured_cell() {
        let grid = TerrainGrid::new(32, 10.0);
        let mut walker = Walker::new(Vec3::ZERO, 1.0);
        let mut treasures = vec![Treasure::new("home", Vec3::new(20.0, 0.0, 10.0))];
        let config = config().with_home_treasure(Some((2, 1)));
        let mut nav = NavigationController::new(config, line(&[0.0, 100.0]));

        nav.tick(&grid, &mut walker, &mut treasures);
        assert_eq!(nav.treasure_queue_len(), 1);
    }

    #[test]
    fn test_detection_is_idempotent() {
        let grid = TerrainGrid::new(32, 10.0);
        let mut walker = Walker::new(Vec3::ZERO, 1.0);
        let mut treasures = vec![Treasure::new("t", Vec3::new(20.0, 0.0, 0.0))];
        let mut nav = NavigationController::new(config(), line(&[0.0, 100.0]));

        for _ in 0..20 {
            nav.tick(&grid, &mut walker, &mut treasures);
        }

        assert_eq!(nav.tagged_treasures(), 1);
        assert_eq!(nav.search_stats().searches, 1);
    }

    #[test]
    fn test_unreachable_treasure_keeps_exploring() {
        let mut grid = TerrainGrid::new(32, 10.0);
        grid.set_blocked(2, 0, true);
        let mut walker = Walker::new(Vec3::new(0.0, 0.0, 5.0), 1.0);
        let mut treasures = vec![Treasure::new("walled", Vec3::new(20.0, 0.0, 0.0))];

        let exploration = line(&[0.0, 0.0]);
        let exploration_id = exploration.id();
        let mut nav = NavigationController::new(config(), exploration);

        nav.tick(&grid, &mut walker, &mut treasures);

        assert!(treasures[0].is_open());
        assert_eq!(nav.tagged_treasures(), 1);
        assert_eq!(nav.mode(), NavMode::Exploring);
        assert_eq!(nav.active_path().map(Path::id), Some(exploration_id));
        assert_eq!(nav.diagnostics().lines().filter(|l| l.starts_with("unreachable")).count(), 1);
    }

    #[test]
    fn test_clone_carries_progress() {
        let grid = TerrainGrid::new(32, 10.0);
        let mut walker = Walker::new(Vec3::ZERO, 1.0);
        let mut nav = NavigationController::new(config(), line(&[0.0]));
        nav.tick(&grid, &mut walker, &mut []);

        let copy = nav.clone();
        assert!(copy.is_finished());
        assert_eq!(copy.diagnostics().total(), nav.diagnostics().total());
        assert_eq!(copy.active_path().map(Path::id), nav.active_path().map(Path::id));
    }

    #[test]
    fn test_treasure_after_finish_revives() {
        let grid = TerrainGrid::new(32, 10.0);
        let mut walker = Walker::new(Vec3::ZERO, 1.0);
        let mut nav = NavigationController::new(config(), line(&[0.0]));

        nav.tick(&grid, &mut walker, &mut []);
        assert!(nav.is_finished());

        let mut treasures = vec![Treasure::new("late", Vec3::new(20.0, 0.0, 0.0))];
        nav.tick(&grid, &mut walker, &mut treasures);

        assert!(!nav.is_finished());
        assert_eq!(nav.status(), NavStatus::TreasureHunting);
        assert!(!nav.has_saved_path());

        assert!(run_until(&mut nav, &grid, &mut walker, &mut treasures, |n| n.is_finished()));
    }
}
