use crate::astar::SearchContext;
use crate::error::GridError;
use crate::heuristic::Heuristic;
use crate::pathing_grid::PathingGrid;
use core::fmt;
use grid_util::Point;
use itertools::Itertools;
use log::info;

/// An ordered route from start to goal, both included, together with its total cost: the sum of
/// the costs of every cell on it. An empty path means no route exists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    points: Vec<Point>,
    cost: u32,
}

impl Path {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Point> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "no path");
        }
        write!(
            f,
            "{} (cost {})",
            self.points
                .iter()
                .map(|p| format!("({}, {})", p.x, p.y))
                .join(" -> "),
            self.cost
        )
    }
}

/// A* on a [PathingGrid] with 4-directional movement. Moving out of a cell is charged that
/// cell's cost, so the route minimising the summed cost of all its cells is returned.
#[derive(Clone, Debug)]
pub struct AstarSolver {
    pub heuristic: Heuristic,
    /// Nodes expanded before a search gives up and reports no path. Unlimited when [None].
    pub max_expansions: Option<usize>,
    context: SearchContext<Point, u32>,
}

impl Default for AstarSolver {
    fn default() -> Self {
        AstarSolver::new()
    }
}

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver::with_heuristic(Heuristic::default())
    }

    pub fn with_heuristic(heuristic: Heuristic) -> AstarSolver {
        AstarSolver {
            heuristic,
            max_expansions: None,
            context: SearchContext::new(),
        }
    }

    /// Computes the cheapest path from start to goal. Endpoints outside the grid are rejected;
    /// an unreachable goal yields an empty [Path].
    pub fn get_path_single_goal(
        &mut self,
        grid: &PathingGrid,
        start: Point,
        goal: Point,
    ) -> Result<Path, GridError> {
        let start_cell = grid.get(start)?;
        grid.get(goal)?;
        // Components only describe open cells and are stale while dirty.
        if !grid.components_dirty && !start_cell.is_obstacle && grid.unreachable(&start, &goal) {
            info!("{} is not reachable from {}", goal, start);
            self.reset_search_state();
            return Ok(Path::default());
        }
        let heuristic = self.heuristic;
        let result = self.context.astar(
            &start,
            move |node: &Point| {
                let cost = u32::from(grid.cell(*node).cost);
                grid.neighbours(*node)
                    .filter(move |n| !grid.cell(*n).is_obstacle)
                    .map(move |n| (n, cost))
            },
            |node| heuristic.estimate(node, &goal),
            |node| *node == goal,
            self.max_expansions,
        );
        Ok(match result {
            Some((points, _)) => Path {
                cost: Self::get_path_cost(grid, &points),
                points,
            },
            None => Path::default(),
        })
    }

    /// Sums the costs of every cell on the path, start and goal included.
    pub fn get_path_cost(grid: &PathingGrid, path: &[Point]) -> u32 {
        path.iter()
            .filter_map(|p| grid.get(*p).ok())
            .map(|c| u32::from(c.cost))
            .sum()
    }

    /// Forgets the scores of the last search. Every search starts with this.
    pub fn reset_search_state(&mut self) {
        self.context.reset();
    }

    /// Number of nodes the last search expanded.
    pub fn expansions(&self) -> usize {
        self.context.expansions()
    }

    /// Cost of the cheapest route to a cell found by the last search, excluding the cell's own
    /// cost. [None] for cells the search never reached.
    pub fn g_score(&self, point: &Point) -> Option<u32> {
        self.context.scratch(point).map(|s| s.g)
    }
}
