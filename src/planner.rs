use crate::error::GridError;
use crate::heuristic::Heuristic;
use crate::pathing_grid::{Cell, PathingGrid};
use crate::solver::{AstarSolver, Path};
use crate::{AGENT_SPEED, COLS, DEFAULT_OBSTACLES, MAX_GENERATION_ATTEMPTS, ROWS};
use grid_util::Point;
use log::{debug, info};
use rand::prelude::*;
use std::time::{Duration, Instant};

/// Settings for a [Planner] session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannerConfig {
    pub width: usize,
    pub height: usize,
    /// Ticks spent on a cost 1 cell; a cell of cost `c` takes `c * speed` ticks to cross.
    pub speed: u32,
    /// Obstacle placements attempted by [Planner::random] and [Command::Randomize].
    pub obstacles: usize,
    pub max_generation_attempts: usize,
    /// Forwarded to [AstarSolver::max_expansions].
    pub max_expansions: Option<usize>,
    pub heuristic: Heuristic,
    /// Seed for cost and obstacle generation. Drawn from the OS when [None].
    pub seed: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            width: COLS,
            height: ROWS,
            speed: AGENT_SPEED,
            obstacles: DEFAULT_OBSTACLES,
            max_generation_attempts: MAX_GENERATION_ATTEMPTS,
            max_expansions: None,
            heuristic: Heuristic::default(),
            seed: None,
        }
    }
}

impl PlannerConfig {
    /// A grid covering a map of the given pixel size with square cells of `cell_size` pixels.
    pub fn from_map(map_width: usize, map_height: usize, cell_size: usize) -> Self {
        let cell_size = cell_size.max(1);
        PlannerConfig {
            width: map_width / cell_size,
            height: map_height / cell_size,
            ..PlannerConfig::default()
        }
    }
}

/// The edits and switches an input layer can send to a [Planner].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    EditObstacle(Point, bool),
    EditCost(Point, u8),
    SetStart(Point),
    SetEnd(Point),
    SelectHeuristic(Heuristic),
    SetMoving(bool),
    RegenerateObstacles(usize),
    /// Regenerates with the configured obstacle count.
    Randomize,
    ClearObstacles,
    ClearAll,
}

/// Keeps a path between a start and an end cell up to date while the grid is edited, and walks
/// an agent along it.
///
/// Edits only mark the planner dirty; the search runs on the next [tick](Self::tick), so a burst
/// of edits costs a single search. The agent always stands on the start cell: walking moves the
/// start, which makes later replans continue from wherever the agent is.
#[derive(Clone, Debug)]
pub struct Planner {
    grid: PathingGrid,
    solver: AstarSolver,
    start: Point,
    end: Point,
    last_path: Path,
    route: Vec<Point>,
    head: usize,
    elapsed: Duration,
    dirty: bool,
    moving: bool,
    ticks: u32,
    speed: u32,
    obstacles: usize,
    max_generation_attempts: usize,
    rng: StdRng,
}

impl Planner {
    /// Wraps an existing grid. Start and end are cleared of obstacles; the first path is
    /// computed on the first tick.
    pub fn new(
        mut grid: PathingGrid,
        start: Point,
        end: Point,
        config: PlannerConfig,
    ) -> Result<Planner, GridError> {
        grid.set_obstacle(start, false)?;
        grid.set_obstacle(end, false)?;
        let mut solver = AstarSolver::with_heuristic(config.heuristic);
        solver.max_expansions = config.max_expansions;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Planner {
            grid,
            solver,
            start,
            end,
            last_path: Path::default(),
            route: Vec::new(),
            head: 0,
            elapsed: Duration::ZERO,
            dirty: true,
            moving: false,
            ticks: 0,
            speed: config.speed.max(1),
            obstacles: config.obstacles,
            max_generation_attempts: config.max_generation_attempts,
            rng,
        })
    }

    /// A fresh session: random cell costs, the agent in the top left corner, a random goal and
    /// a random obstacle layout that leaves the goal reachable.
    pub fn random(config: PlannerConfig) -> Result<Planner, GridError> {
        let obstacles = config.obstacles;
        let origin = Point::new(0, 0);
        let mut planner = Planner::new(
            PathingGrid::new(config.width, config.height),
            origin,
            origin,
            config,
        )?;
        planner.grid.randomize_costs(&mut planner.rng);
        planner.regenerate_obstacles(obstacles)?;
        Ok(planner)
    }

    /// Applies one command from the input layer.
    pub fn apply(&mut self, command: Command) -> Result<(), GridError> {
        match command {
            Command::EditObstacle(pos, blocked) => self.edit_obstacle(pos, blocked),
            Command::EditCost(pos, cost) => self.edit_cost(pos, cost),
            Command::SetStart(pos) => self.set_start(pos),
            Command::SetEnd(pos) => self.set_end(pos),
            Command::SelectHeuristic(heuristic) => self.select_heuristic(heuristic),
            Command::SetMoving(moving) => {
                self.set_moving(moving);
                Ok(())
            }
            Command::RegenerateObstacles(count) => self.regenerate_obstacles(count),
            Command::Randomize => self.regenerate_obstacles(self.obstacles),
            Command::ClearObstacles => {
                self.clear_obstacles();
                Ok(())
            }
            Command::ClearAll => {
                self.clear_all();
                Ok(())
            }
        }
    }

    /// Blocks or unblocks a cell. Blocking the start or the end is ignored.
    pub fn edit_obstacle(&mut self, pos: Point, blocked: bool) -> Result<(), GridError> {
        let is_obstacle = self.grid.get(pos)?.is_obstacle;
        if blocked && (pos == self.start || pos == self.end) {
            debug!("Ignoring obstacle on endpoint {}", pos);
            return Ok(());
        }
        if is_obstacle != blocked {
            self.grid.set_obstacle(pos, blocked)?;
            self.dirty = true;
        }
        Ok(())
    }

    /// Sets the cost of a cell, turning it into open ground if it was an obstacle.
    pub fn edit_cost(&mut self, pos: Point, cost: u8) -> Result<(), GridError> {
        self.grid.set_cost(pos, cost)?;
        self.grid.set_obstacle(pos, false)?;
        self.dirty = true;
        Ok(())
    }

    /// Moves the start (and with it the agent), clearing any obstacle there.
    pub fn set_start(&mut self, pos: Point) -> Result<(), GridError> {
        self.grid.set_obstacle(pos, false)?;
        self.start = pos;
        self.dirty = true;
        Ok(())
    }

    /// Moves the end, clearing any obstacle there.
    pub fn set_end(&mut self, pos: Point) -> Result<(), GridError> {
        self.grid.set_obstacle(pos, false)?;
        self.end = pos;
        self.dirty = true;
        Ok(())
    }

    /// Switches heuristic and replans right away.
    pub fn select_heuristic(&mut self, heuristic: Heuristic) -> Result<(), GridError> {
        self.solver.heuristic = heuristic;
        self.replan()
    }

    pub fn set_moving(&mut self, moving: bool) {
        self.moving = moving;
    }

    /// Removes every obstacle, keeping cell costs.
    pub fn clear_obstacles(&mut self) {
        self.grid.clear_obstacles();
        self.drop_path();
        self.dirty = true;
    }

    /// Removes every obstacle and resets every cell cost to 1.
    pub fn clear_all(&mut self) {
        self.grid.clear_obstacles();
        self.grid.reset_costs();
        self.drop_path();
        self.dirty = true;
    }

    /// Draws new obstacle layouts until one leaves the goal reachable: the start goes back to
    /// the top left corner, the end moves to a random cell and `count` random cells other than
    /// those two are blocked. Fails after the configured number of attempts.
    pub fn regenerate_obstacles(&mut self, count: usize) -> Result<(), GridError> {
        let width = self.grid.width() as i32;
        let height = self.grid.height() as i32;
        for attempt in 1..=self.max_generation_attempts {
            self.start = Point::new(0, 0);
            self.end = Point::new(
                self.rng.gen_range(0..width),
                self.rng.gen_range(0..height),
            );
            self.grid.clear_obstacles();
            for _ in 0..count {
                let p = Point::new(
                    self.rng.gen_range(0..width),
                    self.rng.gen_range(0..height),
                );
                if p == self.start || p == self.end {
                    continue;
                }
                self.grid.set_obstacle(p, true)?;
            }
            self.replan()?;
            if !self.last_path.is_empty() {
                info!(
                    "Generated {} obstacles in {} attempt(s), goal at {}",
                    self.grid.obstacle_count(),
                    attempt,
                    self.end
                );
                return Ok(());
            }
            debug!("Goal {} unreachable in layout {}, retrying", self.end, attempt);
        }
        Err(GridError::GenerationExhausted {
            attempts: self.max_generation_attempts,
            obstacles: count,
        })
    }

    /// Advances the session by one step: replans if anything changed since the last search,
    /// then moves the agent if it has spent long enough on its current cell.
    pub fn tick(&mut self) -> Result<(), GridError> {
        self.ticks = self.ticks.saturating_add(1);
        if self.dirty {
            self.replan()?;
        }
        if self.moving {
            self.advance();
        }
        Ok(())
    }

    /// Searches a new path from the start to the end, replacing the previous one even when no
    /// path exists.
    pub fn replan(&mut self) -> Result<(), GridError> {
        self.dirty = false;
        self.grid.update();
        let timer = Instant::now();
        let path = self
            .solver
            .get_path_single_goal(&self.grid, self.start, self.end)?;
        self.elapsed = timer.elapsed();
        debug!(
            "Replanned with {} in {:?}: {} cells, cost {}",
            self.solver.heuristic,
            self.elapsed,
            path.len(),
            path.cost()
        );
        self.route = path.points().to_vec();
        self.head = 0;
        self.last_path = path;
        Ok(())
    }

    fn advance(&mut self) {
        let Some(current) = self.route.get(self.head) else {
            return;
        };
        let cost = u32::from(self.grid.cell(*current).cost);
        if (self.ticks / cost) / self.speed >= 1 {
            self.ticks = 0;
            self.head += 1;
            if let Some(next) = self.route.get(self.head) {
                self.start = *next;
            }
        }
    }

    fn drop_path(&mut self) {
        self.route.clear();
        self.head = 0;
        self.last_path = Path::default();
    }

    /// The part of the current path the agent has not left yet, starting with its own cell.
    pub fn path(&self) -> &[Point] {
        &self.route[self.head..]
    }

    /// The full result of the last search.
    pub fn last_path(&self) -> &Path {
        &self.last_path
    }

    /// Total cost of the last search's path, 0 when there is none.
    pub fn path_cost(&self) -> u32 {
        self.last_path.cost()
    }

    /// Cost of the part of the path still ahead, the agent's cell included.
    pub fn remaining_cost(&self) -> u32 {
        AstarSolver::get_path_cost(&self.grid, self.path())
    }

    /// Wall-clock duration of the last search.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn agent(&self) -> Point {
        self.start
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn heuristic(&self) -> Heuristic {
        self.solver.heuristic
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn grid(&self) -> &PathingGrid {
        &self.grid
    }

    /// The solver, for reading the scores of the last search.
    pub fn solver(&self) -> &AstarSolver {
        &self.solver
    }

    /// Columns and rows of the grid.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.grid.width(), self.grid.height())
    }

    pub fn snapshot(&self) -> Vec<Cell> {
        self.grid.snapshot()
    }
}
