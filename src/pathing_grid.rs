use crate::error::GridError;
use crate::{DIRECTIONS, MAX_COST, MIN_COST};
use core::fmt;
use grid_util::Point;
use log::info;
use petgraph::unionfind::UnionFind;
use rand::Rng;

/// The persistent state of one grid cell. Search bookkeeping is kept out of here and lives in the
/// search context for the duration of a single search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub position: Point,
    /// Charged when a path leaves this cell.
    pub cost: u8,
    pub is_obstacle: bool,
}

/// [PathingGrid] owns one [Cell] per position and maintains information about connected
/// components using a [UnionFind] structure, so that unreachable goals can be rejected without
/// searching.
#[derive(Clone, Debug)]
pub struct PathingGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Default for PathingGrid {
    fn default() -> PathingGrid {
        PathingGrid::new(crate::COLS, crate::ROWS)
    }
}

impl PathingGrid {
    /// Creates an obstacle-free grid in which every cell costs 1.
    pub fn new(width: usize, height: usize) -> PathingGrid {
        let cells = (0..height)
            .flat_map(|y| {
                (0..width).map(move |x| Cell {
                    position: Point::new(x as i32, y as i32),
                    cost: MIN_COST,
                    is_obstacle: false,
                })
            })
            .collect();
        let mut grid = PathingGrid {
            width,
            height,
            cells,
            components: UnionFind::new(width * height),
            components_dirty: false,
        };
        grid.generate_components();
        grid
    }

    /// Creates an obstacle-free grid with randomized cell costs, see
    /// [randomize_costs](Self::randomize_costs).
    pub fn random<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> PathingGrid {
        let mut grid = PathingGrid::new(width, height);
        grid.randomize_costs(rng);
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Point) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    fn get_ix(&self, pos: Point) -> Result<usize, GridError> {
        if self.in_bounds(pos) {
            Ok(self.get_ix_unchecked(pos))
        } else {
            Err(GridError::OutOfBounds {
                position: pos,
                width: self.width,
                height: self.height,
            })
        }
    }

    fn get_ix_unchecked(&self, pos: Point) -> usize {
        pos.y as usize * self.width + pos.x as usize
    }

    /// Looks up the cell at a position.
    pub fn get(&self, pos: Point) -> Result<&Cell, GridError> {
        let ix = self.get_ix(pos)?;
        Ok(&self.cells[ix])
    }

    /// Looks up a cell for a position already known to be in bounds, such as one yielded by
    /// [neighbours](Self::neighbours).
    pub(crate) fn cell(&self, pos: Point) -> &Cell {
        &self.cells[self.get_ix_unchecked(pos)]
    }

    /// All cells in row-major order, for rendering.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Alias of [cells](Self::cells) for collaborators that copy the grid state out.
    pub fn snapshot(&self) -> Vec<Cell> {
        self.cells.clone()
    }

    /// Blocks or unblocks a cell. Joins newly connected components and flags the components as
    /// dirty if they are (potentially) broken apart into multiple.
    pub fn set_obstacle(&mut self, pos: Point, blocked: bool) -> Result<(), GridError> {
        let ix = self.get_ix(pos)?;
        let was_blocked = self.cells[ix].is_obstacle;
        self.cells[ix].is_obstacle = blocked;
        if blocked {
            if !was_blocked {
                self.components_dirty = true;
            }
        } else {
            let open = self
                .neighbours(pos)
                .filter(|n| !self.cell(*n).is_obstacle)
                .map(|n| self.get_ix_unchecked(n))
                .collect::<Vec<usize>>();
            for n_ix in open {
                self.components.union(ix, n_ix);
            }
        }
        Ok(())
    }

    /// Sets the cost of leaving a cell; only costs in `MIN_COST..=MAX_COST` are accepted.
    pub fn set_cost(&mut self, pos: Point, cost: u8) -> Result<(), GridError> {
        let ix = self.get_ix(pos)?;
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(GridError::InvalidCost(cost));
        }
        self.cells[ix].cost = cost;
        Ok(())
    }

    /// The in-bounds orthogonal neighbours of a position, in the order up, right, down, left.
    /// Obstacles are included; it is up to the caller to skip them.
    pub fn neighbours(&self, pos: Point) -> impl Iterator<Item = Point> + '_ {
        DIRECTIONS
            .into_iter()
            .map(move |(dx, dy)| Point::new(pos.x + dx, pos.y + dy))
            .filter(move |p| self.in_bounds(*p))
    }

    /// Draws a fresh cost for every cell: 1 with probability 0.8, 2 and 3 with probability 0.1
    /// each.
    pub fn randomize_costs<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for cell in &mut self.cells {
            cell.cost = match rng.gen_range(1..=10) {
                1..=8 => 1,
                9 => 2,
                _ => 3,
            };
        }
    }

    /// Removes every obstacle. Costs are kept.
    pub fn clear_obstacles(&mut self) {
        for cell in &mut self.cells {
            cell.is_obstacle = false;
        }
        self.generate_components();
    }

    /// Sets every cell cost back to 1.
    pub fn reset_costs(&mut self) {
        for cell in &mut self.cells {
            cell.cost = MIN_COST;
        }
    }

    /// Number of cells currently blocked.
    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_obstacle).count()
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> Result<usize, GridError> {
        Ok(self.components.find(self.get_ix(*point)?))
    }

    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component. Out of bounds positions are
    /// unreachable.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        match (self.get_ix(*start), self.get_ix(*goal)) {
            (Ok(start_ix), Ok(goal_ix)) => !self.components.equiv(start_ix, goal_ix),
            _ => true,
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up open grid neighbours to the same
    /// components.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.width * self.height);
        self.components_dirty = false;
        for ix in 0..self.cells.len() {
            let cell = self.cells[ix];
            if cell.is_obstacle {
                continue;
            }
            // Linking right and down covers every orthogonal pair once.
            let p = cell.position;
            for n in [Point::new(p.x + 1, p.y), Point::new(p.x, p.y + 1)] {
                if self.in_bounds(n) && !self.cell(n).is_obstacle {
                    let n_ix = self.get_ix_unchecked(n);
                    self.components.union(ix, n_ix);
                }
            }
        }
    }
}

impl fmt::Display for PathingGrid {
    /// One line per row; `#` marks an obstacle, otherwise the cell cost is printed.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            for cell in row {
                if cell.is_obstacle {
                    write!(f, "#")?;
                } else {
                    write!(f, "{}", cell.cost)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
