//! # weighted_grid_pathing
//!
//! Shortest-cost pathfinding on a weighted 4-connected grid whose obstacles and cell costs can be
//! edited at runtime. The search is [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) with
//! an interchangeable [Heuristic]. A [Planner] sits on top of the grid: edits mark it dirty, the
//! next [tick](Planner::tick) replans, and an agent walks the most recent path at a pace that
//! slows down on expensive cells.
//!
//! Entering the grid from a cell is charged that cell's cost, so a path's cost is the sum of the
//! costs of the cells it leaves. The reported [Path::cost] additionally counts the goal cell.
//! Like the grid itself, connected components are tracked with a
//! [union-find](https://en.wikipedia.org/wiki/Disjoint-set_data_structure) structure so that
//! searches towards a walled-off goal return immediately instead of flood-filling the grid.
mod astar;
pub mod error;
pub mod heuristic;
pub mod pathing_grid;
pub mod planner;
pub mod solver;

pub use error::GridError;
pub use grid_util::Point;
pub use heuristic::Heuristic;
pub use pathing_grid::{Cell, PathingGrid};
pub use planner::{Command, Planner, PlannerConfig};
pub use solver::{AstarSolver, Path};

/// Width of the map in pixels.
pub const MAP_WIDTH: usize = 800;
/// Height of the map in pixels.
pub const MAP_HEIGHT: usize = 600;
/// Side of a single cell in pixels.
pub const CELL_SIZE: usize = 20;
/// Number of columns of the default grid.
pub const COLS: usize = MAP_WIDTH / CELL_SIZE;
/// Number of rows of the default grid.
pub const ROWS: usize = MAP_HEIGHT / CELL_SIZE;

/// Cheapest cell cost.
pub const MIN_COST: u8 = 1;
/// Most expensive cell cost.
pub const MAX_COST: u8 = 3;

/// Ticks the agent spends on a cost 1 cell before moving on.
pub const AGENT_SPEED: u32 = 50;
/// Obstacle placements attempted by a regeneration when no count is given.
pub const DEFAULT_OBSTACLES: usize = 250;
/// Regenerations attempted before giving up on finding a layout with a path.
pub const MAX_GENERATION_ATTEMPTS: usize = 1000;

/// Orthogonal offsets in the order neighbours are expanded: up, right, down, left.
/// The order decides which of several equally good routes the search returns.
pub const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
