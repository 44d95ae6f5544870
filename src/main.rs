//! Headless demo: an agent sweeps a generated terrain and tags treasures

use wayfarer::ai::{initial_leg, path_length, plan_legs, sweep_waypoints};
use wayfarer::prelude::*;

/// Upper bound on simulated ticks
const MAX_TICKS: u64 = 500_000;

/// Ticks between progress reports
const REPORT_EVERY: u64 = 10_000;

/// Treasure cells; the first is the home treasure
const TREASURE_CELLS: [(i32, i32); 5] = [(298, 451), (291, 174), (182, 449), (358, 460), (200, 200)];

/// Landmark cells that block the way
const LANDMARK_CELLS: [(i32, i32); 3] = [(445, 227), (350, 227), (200, 227)];

/// Cell the agent starts on
const START_CELL: (i32, i32) = (480, 26);

fn build_terrain(config: &NavConfig) -> TerrainGrid {
    let mut grid = TerrainGrid::from_fn(config.range, config.spacing, |x, z| {
        let (x, z) = (x as f32, z as f32);
        40.0 * (x * 0.02).sin() * (z * 0.015).cos() + 15.0 * (x * 0.11 + z * 0.07).sin()
    });

    for (x, z) in LANDMARK_CELLS {
        let center = grid.surface_point(Cell::new(x, z));
        grid.add_obstacle(Obstacle::new(center, config.spacing * 2.0));
    }
    grid
}

fn place_treasures(grid: &TerrainGrid, config: &NavConfig) -> Vec<Treasure> {
    TREASURE_CELLS
        .iter()
        .enumerate()
        .map(|(i, &(x, z))| {
            let position = grid.surface_point(Cell::new(x, z));
            Treasure::new(format!("Treasure_{}", i + 1), position)
                .with_home(config.home_treasure == Some((x, z)))
        })
        .collect()
}

fn run(config: NavConfig) {
    let grid = build_terrain(&config);
    let mut treasures = place_treasures(&grid, &config);

    let start = grid.surface_point(Cell::new(START_CELL.0, START_CELL.1));
    let mut walker = Walker::new(start, config.step_size);

    let waypoints = sweep_waypoints(config.range, config.sweep);
    let mut planner = Pathfinder::new(config.spacing);
    let legs = plan_legs(&mut planner, &grid, &waypoints);
    let sweep_length: f32 = legs.iter().map(|p| path_length(p.nodes())).sum();
    log::info!(
        "Sweep: {} waypoints, {} legs, {:.0} units; {}",
        waypoints.len(),
        legs.len(),
        sweep_length,
        planner.stats().format_stats()
    );

    let initial = initial_leg(&grid, config.spacing, &waypoints);
    let mut nav = NavigationController::new(config, initial).with_exploration(legs);

    let mut ticks = 0;
    while ticks < MAX_TICKS && !nav.is_finished() {
        nav.tick(&grid, &mut walker, &mut treasures);
        walker.position.y = grid.elevation_at(walker.position);
        ticks += 1;

        if ticks % REPORT_EVERY == 0 {
            log::info!(
                "tick {ticks}: {:?} at {:.0}, {} legs left, {} tagged",
                nav.status(),
                walker.position,
                nav.exploration_queue_len(),
                nav.tagged_treasures()
            );
        }
    }

    log::info!(
        "Stopped after {ticks} ticks ({} steps) with status {:?}",
        walker.steps(),
        nav.status()
    );
    log::info!(
        "Tagged {}/{} treasures; {}",
        nav.tagged_treasures(),
        treasures.len(),
        nav.search_stats().format_stats()
    );
    for line in nav.diagnostics().lines() {
        log::debug!("{line}");
    }
}

fn main() {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match NavConfig::load_ron(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Config error: {}", e);
                return;
            }
        },
        None => NavConfig::default(),
    };

    run(config);
}
