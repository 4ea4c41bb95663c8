//! Fuzzes the pathfinding system on many random weighted grids: a path is found exactly when the
//! goal shares a connected component with the start, and its cost matches an exhaustive search
//! for every heuristic.
use rand::prelude::*;
use weighted_grid_pathing::{
    AstarSolver, Command, Heuristic, PathingGrid, Planner, PlannerConfig, Point,
};

fn random_grid(w: usize, h: usize, rng: &mut StdRng, density: f64) -> PathingGrid {
    let mut pathing_grid = PathingGrid::random(w, h, rng);
    for x in 0..w as i32 {
        for y in 0..h as i32 {
            pathing_grid
                .set_obstacle(Point::new(x, y), rng.gen_bool(density))
                .unwrap();
        }
    }
    pathing_grid.generate_components();
    pathing_grid
}

fn visualize_grid(grid: &PathingGrid, start: &Point, end: &Point) {
    for cell in grid.cells() {
        let p = cell.position;
        if *start == p {
            print!("S");
        } else if *end == p {
            print!("G");
        } else if cell.is_obstacle {
            print!("#");
        } else {
            print!("{}", cell.cost);
        }
        if p.x as usize == grid.width() - 1 {
            println!();
        }
    }
}

/// Cheapest summed cell cost over all simple paths, with branch and bound.
fn brute_force_cost(grid: &PathingGrid, start: Point, goal: Point) -> Option<u32> {
    fn visit(
        grid: &PathingGrid,
        node: Point,
        goal: Point,
        cost: u32,
        visited: &mut Vec<bool>,
        best: &mut Option<u32>,
    ) {
        let cost = cost + u32::from(grid.get(node).unwrap().cost);
        if best.is_some_and(|b| cost >= b) {
            return;
        }
        if node == goal {
            *best = Some(cost);
            return;
        }
        let ix = node.y as usize * grid.width() + node.x as usize;
        visited[ix] = true;
        for n in grid.neighbours(node).collect::<Vec<_>>() {
            let n_ix = n.y as usize * grid.width() + n.x as usize;
            if !visited[n_ix] && !grid.get(n).unwrap().is_obstacle {
                visit(grid, n, goal, cost, visited, best);
            }
        }
        visited[ix] = false;
    }
    let mut best = None;
    let mut visited = vec![false; grid.width() * grid.height()];
    visit(grid, start, goal, 0, &mut visited, &mut best);
    best
}

#[test]
fn fuzz() {
    const N: usize = 10;
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(0);
    let start = Point::new(0, 0);
    let end = Point::new(N as i32 - 1, N as i32 - 1);
    for heuristic in Heuristic::ALL {
        let mut solver = AstarSolver::with_heuristic(heuristic);
        for _ in 0..N_GRIDS {
            let mut random_grid = random_grid(N, N, &mut rng, 0.4);
            random_grid.set_obstacle(start, false).unwrap();
            random_grid.set_obstacle(end, false).unwrap();
            random_grid.update();
            let reachable = random_grid.reachable(&start, &end);
            // Bypass the component shortcut so the search itself has to agree.
            random_grid.components_dirty = true;
            let path = solver
                .get_path_single_goal(&random_grid, start, end)
                .unwrap();
            // Show the grid if a path is not found
            if path.is_empty() == reachable {
                visualize_grid(&random_grid, &start, &end);
            }
            assert!(path.is_empty() != reachable);
        }
    }
}

#[test]
fn fuzz_distance() {
    const N: usize = 6;
    const N_GRIDS: usize = 1000;
    let mut rng = StdRng::seed_from_u64(0);
    let mut solvers = Heuristic::ALL.map(AstarSolver::with_heuristic);
    for _ in 0..N_GRIDS {
        let mut random_grid = random_grid(N, N, &mut rng, 0.35);
        let start = Point::new(rng.gen_range(0..N as i32), rng.gen_range(0..N as i32));
        let end = Point::new(rng.gen_range(0..N as i32), rng.gen_range(0..N as i32));
        random_grid.set_obstacle(start, false).unwrap();
        random_grid.set_obstacle(end, false).unwrap();
        random_grid.update();
        let optimal = brute_force_cost(&random_grid, start, end);
        for solver in &mut solvers {
            let path = solver
                .get_path_single_goal(&random_grid, start, end)
                .unwrap();
            let cost = (!path.is_empty()).then(|| path.cost());
            if cost != optimal {
                println!(
                    "{}: found {cost:?}, optimal {optimal:?}\n{path}",
                    solver.heuristic
                );
                visualize_grid(&random_grid, &start, &end);
            }
            assert_eq!(cost, optimal);
        }
    }
}

/// Random edits between ticks never leave the planner with a path that disagrees with a fresh
/// search on the same grid.
#[test]
fn fuzz_planner() {
    const N_STEPS: usize = 3000;
    let mut rng = StdRng::seed_from_u64(0);
    let config = PlannerConfig {
        width: 12,
        height: 9,
        obstacles: 30,
        speed: 2,
        seed: Some(0),
        ..PlannerConfig::default()
    };
    let mut planner = Planner::random(config).unwrap();
    planner.set_moving(true);
    let mut solver = AstarSolver::new();
    for _ in 0..N_STEPS {
        let p = Point::new(rng.gen_range(0..12), rng.gen_range(0..9));
        let command = match rng.gen_range(0..20) {
            0..=5 => Command::EditObstacle(p, true),
            6..=8 => Command::EditObstacle(p, false),
            9..=11 => Command::EditCost(p, rng.gen_range(1..=3)),
            12 => Command::SetEnd(p),
            13 => Command::SetStart(p),
            14 => Command::SelectHeuristic(Heuristic::ALL[rng.gen_range(0..3)]),
            15 => Command::ClearObstacles,
            _ => Command::SetMoving(true),
        };
        planner.apply(command).unwrap();
        planner.tick().unwrap();
        assert!(!planner.is_dirty());
        let grid = planner.grid();
        assert!(!grid.get(planner.start()).unwrap().is_obstacle);
        assert!(!grid.get(planner.end()).unwrap().is_obstacle);
        let path = planner.path();
        if let Some(head) = path.first() {
            assert_eq!(*head, planner.agent());
            assert_eq!(path.last(), Some(&planner.end()));
        }
        solver.heuristic = planner.heuristic();
        let fresh = solver
            .get_path_single_goal(grid, planner.start(), planner.end())
            .unwrap();
        if !path.is_empty() {
            assert_eq!(fresh.cost(), planner.remaining_cost());
        }
    }
}
